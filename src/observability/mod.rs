//! Observability subsystem.
//!
//! All subsystems emit `tracing` events with structured fields; transfers
//! run inside a span carrying a `transfer_id`. Key material is never a
//! field.

pub mod logging;
