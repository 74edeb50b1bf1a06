//! Echo/chain node used as the downstream (or upstream) peer of the sidecar.
//!
//! Static endpoints plus `/next`, which calls a configured next hop and
//! relays its body so nodes can be chained through sidecars.

pub mod server;

pub use server::{resolve_id, NanoService};
