//! In-memory collaborators for driving the importer without a database or a
//! dealer system.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use vhc_core::booking::{Booking, BookingCustomer, BookingVehicle};
use vhc_core::dms_import::{DateRange, ImportBatchStatus};
use vhc_core::types::DbId;
use vhc_db::models::customer::{CreateCustomer, Customer, CustomerBackfill};
use vhc_db::models::import_batch::{CreateImportBatch, FinalizeImportBatch};
use vhc_db::models::inspection::CreateInspection;
use vhc_db::models::vehicle::{AttachVehicle, CreateVehicle, Vehicle, VehicleBackfill};
use vhc_importer::collaborators::{
    CredentialError, CredentialProvider, DefaultsResolver, DiaryFetcher, DmsCredentials,
    FetchError,
};
use vhc_importer::config::ImporterConfig;
use vhc_importer::error::StoreError;
use vhc_importer::store::{ImportFilters, ImportStore, InsertOutcome};
use vhc_importer::BookingImporter;

pub const ORG: DbId = 1;
pub const SITE: DbId = 10;
pub const TEMPLATE: DbId = 20;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StoredBatch {
    pub input: CreateImportBatch,
    pub finalized: Option<FinalizeImportBatch>,
}

#[derive(Debug, Clone)]
pub struct StoredInspection {
    pub id: DbId,
    pub input: CreateInspection,
}

#[derive(Debug, Default)]
pub struct MemoryState {
    next_id: DbId,
    pub customers: Vec<Customer>,
    pub vehicles: Vec<Vehicle>,
    pub inspections: Vec<StoredInspection>,
    pub batches: HashMap<DbId, StoredBatch>,
    pub last_import: Vec<(DbId, ImportBatchStatus, Option<String>)>,
    pub usage: HashMap<(DbId, NaiveDate), i32>,
    pub filters: ImportFilters,
    pub enabled_organizations: Vec<DbId>,

    pub fail_create_batch: bool,
    pub fail_finalize: bool,
    pub fail_backfill: bool,
    pub fail_usage: bool,
    pub fail_create_vehicle: bool,
    /// Make the next inspection insert lose a race with a concurrent run.
    pub conflict_on_inspection: bool,
    /// Make the next external-id customer lookup miss, as if a concurrent
    /// run inserted the row just after it.
    pub miss_customer_external_lookup: bool,
    /// Same for the next registration lookup.
    pub miss_vehicle_registration_lookup: bool,
    pub backfill_attempts: u32,
}

impl MemoryState {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap()
    }

    pub fn seed_customer(&self, input: CreateCustomer) -> DbId {
        let mut state = self.state();
        let customer = new_customer(&mut state, &input);
        let id = customer.id;
        state.customers.push(customer);
        id
    }

    pub fn seed_vehicle(&self, input: CreateVehicle) -> DbId {
        let mut state = self.state();
        let vehicle = new_vehicle(&mut state, &input);
        let id = vehicle.id;
        state.vehicles.push(vehicle);
        id
    }

    pub fn customer(&self, id: DbId) -> Customer {
        self.state()
            .customers
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .unwrap()
    }

    pub fn vehicle(&self, id: DbId) -> Vehicle {
        self.state()
            .vehicles
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .unwrap()
    }

    pub fn batch(&self, id: DbId) -> StoredBatch {
        self.state().batches.get(&id).cloned().unwrap()
    }
}

fn new_customer(state: &mut MemoryState, input: &CreateCustomer) -> Customer {
    let now = Utc::now();
    Customer {
        id: state.next_id(),
        organization_id: input.organization_id,
        title: input.title.clone(),
        first_name: input.first_name.clone(),
        last_name: input.last_name.clone(),
        email: input.email.clone(),
        mobile: input.mobile.clone(),
        address_line1: input.address_line1.clone(),
        address_line2: input.address_line2.clone(),
        town: input.town.clone(),
        county: input.county.clone(),
        postcode: input.postcode.clone(),
        external_id: input.external_id.clone(),
        external_source: input.external_source.clone(),
        created_at: now,
        updated_at: now,
    }
}

fn new_vehicle(state: &mut MemoryState, input: &CreateVehicle) -> Vehicle {
    let now = Utc::now();
    Vehicle {
        id: state.next_id(),
        organization_id: input.organization_id,
        customer_id: Some(input.customer_id),
        registration: input.registration.clone(),
        vin: input.vin.clone(),
        make: input.make.clone(),
        model: input.model.clone(),
        color: input.color.clone(),
        fuel_type: input.fuel_type.clone(),
        mileage: input.mileage,
        year: None,
        external_id: input.external_id.clone(),
        external_source: input.external_source.clone(),
        created_at: now,
        updated_at: now,
    }
}

fn fill(slot: &mut Option<String>, value: &Option<String>) {
    if slot.is_none() {
        slot.clone_from(value);
    }
}

fn unavailable(_what: &str) -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl ImportStore for MemoryStore {
    async fn create_batch(&self, input: &CreateImportBatch) -> Result<DbId, StoreError> {
        let mut state = self.state();
        if state.fail_create_batch {
            return Err(unavailable("create batch"));
        }
        let id = state.next_id();
        state.batches.insert(
            id,
            StoredBatch {
                input: input.clone(),
                finalized: None,
            },
        );
        Ok(id)
    }

    async fn finalize_batch(
        &self,
        id: DbId,
        input: &FinalizeImportBatch,
    ) -> Result<(), StoreError> {
        let mut state = self.state();
        if state.fail_finalize {
            return Err(unavailable("finalize batch"));
        }
        match state.batches.get_mut(&id) {
            Some(batch) if batch.finalized.is_none() => {
                batch.finalized = Some(input.clone());
                Ok(())
            }
            _ => Err(StoreError::NotFound {
                entity: "running ImportBatch",
                id,
            }),
        }
    }

    async fn record_last_import(
        &self,
        organization_id: DbId,
        status: ImportBatchStatus,
        error: Option<&str>,
    ) -> Result<(), StoreError> {
        self.state()
            .last_import
            .push((organization_id, status, error.map(str::to_string)));
        Ok(())
    }

    async fn increment_usage(
        &self,
        organization_id: DbId,
        period_start: NaiveDate,
        bookings_imported: i32,
    ) -> Result<(), StoreError> {
        let mut state = self.state();
        if state.fail_usage {
            return Err(unavailable("usage increment"));
        }
        *state.usage.entry((organization_id, period_start)).or_default() += bookings_imported;
        Ok(())
    }

    async fn import_filters(&self, _organization_id: DbId) -> Result<ImportFilters, StoreError> {
        Ok(self.state().filters)
    }

    async fn list_enabled_organizations(&self) -> Result<Vec<DbId>, StoreError> {
        Ok(self.state().enabled_organizations.clone())
    }

    async fn find_customer_by_external_id(
        &self,
        organization_id: DbId,
        external_source: &str,
        external_id: &str,
    ) -> Result<Option<Customer>, StoreError> {
        let mut state = self.state();
        if state.miss_customer_external_lookup {
            state.miss_customer_external_lookup = false;
            return Ok(None);
        }
        Ok(state
            .customers
            .iter()
            .find(|c| {
                c.organization_id == organization_id
                    && c.external_source.as_deref() == Some(external_source)
                    && c.external_id.as_deref() == Some(external_id)
            })
            .cloned())
    }

    async fn find_customer_by_email(
        &self,
        organization_id: DbId,
        email: &str,
    ) -> Result<Option<Customer>, StoreError> {
        Ok(self
            .state()
            .customers
            .iter()
            .find(|c| {
                c.organization_id == organization_id
                    && c.email.as_deref().is_some_and(|e| e.eq_ignore_ascii_case(email))
            })
            .cloned())
    }

    async fn find_customer_by_mobile(
        &self,
        organization_id: DbId,
        mobile: &str,
    ) -> Result<Option<Customer>, StoreError> {
        Ok(self
            .state()
            .customers
            .iter()
            .find(|c| {
                c.organization_id == organization_id
                    && c.mobile.as_deref().is_some_and(|m| {
                        m.chars().filter(|ch| !ch.is_whitespace()).collect::<String>() == mobile
                    })
            })
            .cloned())
    }

    async fn create_customer(&self, input: &CreateCustomer) -> Result<Customer, StoreError> {
        let mut state = self.state();
        let duplicate = input.external_id.is_some()
            && state.customers.iter().any(|c| {
                c.organization_id == input.organization_id
                    && c.external_source == input.external_source
                    && c.external_id == input.external_id
            });
        if duplicate {
            return Err(StoreError::Conflict("uq_customers_external".into()));
        }
        let customer = new_customer(&mut state, input);
        state.customers.push(customer.clone());
        Ok(customer)
    }

    async fn backfill_customer(
        &self,
        id: DbId,
        input: &CustomerBackfill,
    ) -> Result<(), StoreError> {
        let mut state = self.state();
        state.backfill_attempts += 1;
        if state.fail_backfill {
            return Err(unavailable("customer backfill"));
        }
        let customer = state
            .customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound {
                entity: "Customer",
                id,
            })?;
        fill(&mut customer.title, &input.title);
        fill(&mut customer.address_line1, &input.address_line1);
        fill(&mut customer.address_line2, &input.address_line2);
        fill(&mut customer.town, &input.town);
        fill(&mut customer.county, &input.county);
        fill(&mut customer.postcode, &input.postcode);
        if customer.external_id.is_none() {
            customer.external_id.clone_from(&input.external_id);
            customer.external_source.clone_from(&input.external_source);
        }
        Ok(())
    }

    async fn find_vehicle_by_external_id(
        &self,
        organization_id: DbId,
        external_source: &str,
        external_id: &str,
    ) -> Result<Option<Vehicle>, StoreError> {
        Ok(self
            .state()
            .vehicles
            .iter()
            .find(|v| {
                v.organization_id == organization_id
                    && v.external_source.as_deref() == Some(external_source)
                    && v.external_id.as_deref() == Some(external_id)
            })
            .cloned())
    }

    async fn find_vehicle_by_registration(
        &self,
        organization_id: DbId,
        registration: &str,
    ) -> Result<Option<Vehicle>, StoreError> {
        let mut state = self.state();
        if state.miss_vehicle_registration_lookup {
            state.miss_vehicle_registration_lookup = false;
            return Ok(None);
        }
        Ok(state
            .vehicles
            .iter()
            .find(|v| v.organization_id == organization_id && v.registration == registration)
            .cloned())
    }

    async fn find_vehicle_by_vin(
        &self,
        organization_id: DbId,
        vin: &str,
    ) -> Result<Option<Vehicle>, StoreError> {
        Ok(self
            .state()
            .vehicles
            .iter()
            .find(|v| {
                v.organization_id == organization_id
                    && v.vin.as_deref().is_some_and(|x| x.eq_ignore_ascii_case(vin))
            })
            .cloned())
    }

    async fn create_vehicle(&self, input: &CreateVehicle) -> Result<Vehicle, StoreError> {
        let mut state = self.state();
        if state.fail_create_vehicle {
            return Err(unavailable("create vehicle"));
        }
        if state
            .vehicles
            .iter()
            .any(|v| v.organization_id == input.organization_id && v.registration == input.registration)
        {
            return Err(StoreError::Conflict("uq_vehicles_registration".into()));
        }
        let vehicle = new_vehicle(&mut state, input);
        state.vehicles.push(vehicle.clone());
        Ok(vehicle)
    }

    async fn backfill_vehicle(&self, id: DbId, input: &VehicleBackfill) -> Result<(), StoreError> {
        let mut state = self.state();
        state.backfill_attempts += 1;
        if state.fail_backfill {
            return Err(unavailable("vehicle backfill"));
        }
        let vehicle = state
            .vehicles
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(StoreError::NotFound {
                entity: "Vehicle",
                id,
            })?;
        vehicle.customer_id = Some(input.customer_id);
        if input.external_id.is_some() {
            vehicle.external_id.clone_from(&input.external_id);
            vehicle.external_source.clone_from(&input.external_source);
        }
        fill(&mut vehicle.vin, &input.vin);
        fill(&mut vehicle.make, &input.make);
        fill(&mut vehicle.model, &input.model);
        fill(&mut vehicle.color, &input.color);
        fill(&mut vehicle.fuel_type, &input.fuel_type);
        if vehicle.mileage.is_none() {
            vehicle.mileage = input.mileage;
        }
        Ok(())
    }

    async fn attach_vehicle(&self, id: DbId, input: &AttachVehicle) -> Result<(), StoreError> {
        let mut state = self.state();
        let vehicle = state
            .vehicles
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(StoreError::NotFound {
                entity: "Vehicle",
                id,
            })?;
        vehicle.customer_id = Some(input.customer_id);
        vehicle.registration.clone_from(&input.registration);
        if input.external_id.is_some() {
            vehicle.external_id.clone_from(&input.external_id);
            vehicle.external_source.clone_from(&input.external_source);
        }
        Ok(())
    }

    async fn inspection_exists(
        &self,
        organization_id: DbId,
        external_source: &str,
        external_id: &str,
    ) -> Result<bool, StoreError> {
        Ok(self.state().inspections.iter().any(|i| {
            i.input.organization_id == organization_id
                && i.input.external_source == external_source
                && i.input.external_id == external_id
        }))
    }

    async fn create_inspection(
        &self,
        input: &CreateInspection,
    ) -> Result<InsertOutcome, StoreError> {
        let mut state = self.state();
        if state.conflict_on_inspection {
            state.conflict_on_inspection = false;
            return Ok(InsertOutcome::AlreadyExists);
        }
        let id = state.next_id();
        state.inspections.push(StoredInspection {
            id,
            input: input.clone(),
        });
        Ok(InsertOutcome::Created(id))
    }
}

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

pub struct StaticDefaults {
    pub template_id: Option<DbId>,
    pub site_id: Option<DbId>,
}

#[async_trait]
impl DefaultsResolver for StaticDefaults {
    async fn default_template(&self, _organization_id: DbId) -> Result<Option<DbId>, StoreError> {
        Ok(self.template_id)
    }

    async fn default_site(&self, _organization_id: DbId) -> Result<Option<DbId>, StoreError> {
        Ok(self.site_id)
    }
}

pub struct StaticCredentials {
    pub configured: bool,
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    async fn get_credentials(
        &self,
        _organization_id: DbId,
    ) -> Result<DmsCredentials, CredentialError> {
        if !self.configured {
            return Err(CredentialError::NotConfigured);
        }
        Ok(DmsCredentials {
            account_id: "ACC-1".into(),
            username: "svc-import".into(),
            password: "secret".into(),
            endpoint: None,
        })
    }
}

/// Serves a fixed booking list and remembers the ranges it was asked for.
#[derive(Default)]
pub struct FakeDiary {
    pub bookings: Mutex<Vec<Booking>>,
    pub fail_with: Mutex<Option<String>>,
    pub requested: Mutex<Vec<DateRange>>,
}

impl FakeDiary {
    pub fn set_bookings(&self, bookings: Vec<Booking>) {
        *self.bookings.lock().unwrap() = bookings;
    }
}

#[async_trait]
impl DiaryFetcher for FakeDiary {
    async fn fetch_bookings(
        &self,
        _credentials: &DmsCredentials,
        range: DateRange,
    ) -> Result<Vec<Booking>, FetchError> {
        self.requested.lock().unwrap().push(range);
        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(FetchError::Transport(message));
        }
        Ok(self.bookings.lock().unwrap().clone())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub diary: Arc<FakeDiary>,
    pub importer: BookingImporter,
}

pub fn harness() -> Harness {
    harness_with(
        StaticDefaults {
            template_id: Some(TEMPLATE),
            site_id: Some(SITE),
        },
        StaticCredentials { configured: true },
    )
}

pub fn harness_with(defaults: StaticDefaults, credentials: StaticCredentials) -> Harness {
    let store = Arc::new(MemoryStore::default());
    let diary = Arc::new(FakeDiary::default());
    let importer = BookingImporter::new(
        store.clone(),
        Arc::new(defaults),
        Arc::new(credentials),
        diary.clone(),
        &ImporterConfig::default(),
    );
    Harness {
        store,
        diary,
        importer,
    }
}

// ---------------------------------------------------------------------------
// Booking builders
// ---------------------------------------------------------------------------

/// A booking with a distinct customer and vehicle derived from `n`.
pub fn booking(n: u32) -> Booking {
    Booking {
        booking_id: format!("BK-{n}"),
        status: Some("Booked".into()),
        date: Some("2026-03-02".into()),
        time: Some("09:00".into()),
        customer: BookingCustomer {
            external_id: Some(format!("CUST-{n}")),
            first_name: Some("Sam".into()),
            last_name: Some(format!("Driver{n}")),
            email: Some(format!("Driver{n}@Example.com")),
            mobile: Some(format!("07700 900 {n:03}")),
            ..Default::default()
        },
        vehicle: BookingVehicle {
            external_id: Some(format!("VEH-{n}")),
            registration: Some(format!("ab{n:02} cde")),
            make: Some("Ford".into()),
            model: Some("Focus".into()),
            mileage: Some(42_000),
            ..Default::default()
        },
        ..Default::default()
    }
}
