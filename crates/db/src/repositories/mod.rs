//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Every query is scoped by
//! `organization_id`.

pub mod customer_repo;
pub mod dms_settings_repo;
pub mod import_batch_repo;
pub mod inspection_repo;
pub mod inspection_template_repo;
pub mod site_repo;
pub mod usage_counter_repo;
pub mod vehicle_repo;

pub use customer_repo::CustomerRepo;
pub use dms_settings_repo::DmsSettingsRepo;
pub use import_batch_repo::ImportBatchRepo;
pub use inspection_repo::InspectionRepo;
pub use inspection_template_repo::InspectionTemplateRepo;
pub use site_repo::SiteRepo;
pub use usage_counter_repo::UsageCounterRepo;
pub use vehicle_repo::VehicleRepo;
