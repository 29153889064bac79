//! Dealer-system booking reconciliation.
//!
//! [`orchestrator::BookingImporter`] pulls a day (or range) of bookings from
//! the dealer diary and reconciles each one into a customer, a vehicle, and
//! an inspection. Collaborators are injected as trait objects so the whole
//! run can be driven against in-memory fakes.

pub mod best_effort;
pub mod collaborators;
pub mod config;
pub mod customer_matcher;
pub mod error;
pub mod inspection_creator;
pub mod orchestrator;
pub mod pg_store;
pub mod recorder;
pub mod scheduler;
pub mod store;
pub mod vehicle_matcher;

pub use orchestrator::{BookingImporter, RunImportOptions};
