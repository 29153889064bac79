//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus the DTOs the repositories accept for inserts and
//! partial updates.

pub mod customer;
pub mod dms_settings;
pub mod import_batch;
pub mod inspection;
pub mod usage_counter;
pub mod vehicle;
