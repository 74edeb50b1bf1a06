//! In-memory tracing sink for unit tests.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// One event or span with its fields rendered as text.
#[derive(Debug, Clone, Default)]
pub(crate) struct Record {
    pub name: String,
    pub fields: Vec<(String, String)>,
}

impl Record {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl Visit for Record {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.fields
            .push((field.name().to_string(), format!("{:?}", value)));
    }
}

/// Layer collecting every event and new span it sees.
#[derive(Clone, Default)]
pub(crate) struct Captured {
    events: Arc<Mutex<Vec<Record>>>,
    spans: Arc<Mutex<Vec<Record>>>,
}

impl Captured {
    /// Route this thread's tracing output here until the guard drops.
    pub fn install(&self) -> DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    pub fn events(&self) -> Vec<Record> {
        self.events.lock().unwrap().clone()
    }

    pub fn spans(&self) -> Vec<Record> {
        self.spans.lock().unwrap().clone()
    }

    /// The first event whose message is `message`.
    pub fn event(&self, message: &str) -> Option<Record> {
        self.events()
            .into_iter()
            .find(|record| record.field("message") == Some(message))
    }
}

impl<S: Subscriber> Layer<S> for Captured {
    fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
        let mut record = Record::named(attrs.metadata().name());
        attrs.record(&mut record);
        self.spans.lock().unwrap().push(record);
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut record = Record::named(event.metadata().name());
        event.record(&mut record);
        self.events.lock().unwrap().push(record);
    }
}
