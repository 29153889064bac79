//! Domain types and pure logic for the dealer-system booking import.
//!
//! Nothing in this crate touches the database or performs I/O.

pub mod booking;
pub mod dms_import;
pub mod error;
pub mod import_result;
pub mod normalize;
pub mod paging;
pub mod types;
