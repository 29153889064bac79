//! Resolves a booking's vehicle to an internal vehicle record.
//!
//! A registration is mandatory. Lookup order:
//!
//! 1. external id: returned untouched
//! 2. normalized registration: linked to the booking and gap-filled
//! 3. VIN: linked to the booking and given the booking's registration
//! 4. otherwise created

use vhc_core::booking::BookingVehicle;
use vhc_core::dms_import::REGISTRATION_REQUIRED;
use vhc_core::normalize::{non_blank, normalize_registration, normalize_vin};
use vhc_core::types::DbId;
use vhc_db::models::vehicle::{AttachVehicle, CreateVehicle, Vehicle, VehicleBackfill};

use crate::best_effort::best_effort;
use crate::error::{ImportError, StoreError};
use crate::store::ImportStore;

/// Which key resolved the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleMatchKey {
    ExternalId,
    Registration,
    Vin,
    Created,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleMatch {
    pub vehicle_id: DbId,
    pub created: bool,
    pub matched_by: VehicleMatchKey,
}

impl VehicleMatch {
    fn existing(vehicle: &Vehicle, matched_by: VehicleMatchKey) -> Self {
        Self {
            vehicle_id: vehicle.id,
            created: false,
            matched_by,
        }
    }
}

pub async fn match_vehicle(
    store: &dyn ImportStore,
    organization_id: DbId,
    customer_id: DbId,
    raw: &BookingVehicle,
    external_source: &str,
) -> Result<VehicleMatch, ImportError> {
    let registration = raw
        .registration
        .as_deref()
        .and_then(normalize_registration)
        .ok_or_else(|| ImportError::Validation(REGISTRATION_REQUIRED.to_string()))?;
    let external_id = non_blank(raw.external_id.as_deref());
    let vin = raw.vin.as_deref().and_then(normalize_vin);

    if let Some(ext) = external_id.as_deref() {
        if let Some(found) = store
            .find_vehicle_by_external_id(organization_id, external_source, ext)
            .await?
        {
            return Ok(VehicleMatch::existing(&found, VehicleMatchKey::ExternalId));
        }
    }

    if let Some(found) = store
        .find_vehicle_by_registration(organization_id, &registration)
        .await?
    {
        let input = VehicleBackfill {
            customer_id,
            external_source: external_id.as_ref().map(|_| external_source.to_string()),
            external_id: external_id.clone(),
            vin: gap(&found.vin, &vin),
            make: gap(&found.make, &non_blank(raw.make.as_deref())),
            model: gap(&found.model, &non_blank(raw.model.as_deref())),
            color: gap(&found.color, &non_blank(raw.color.as_deref())),
            fuel_type: gap(&found.fuel_type, &non_blank(raw.fuel_type.as_deref())),
            mileage: found.mileage.is_none().then_some(raw.mileage).flatten(),
        };
        best_effort("vehicle backfill", store.backfill_vehicle(found.id, &input)).await;
        return Ok(VehicleMatch::existing(&found, VehicleMatchKey::Registration));
    }

    if let Some(vin) = vin.as_deref() {
        if let Some(found) = store.find_vehicle_by_vin(organization_id, vin).await? {
            let input = AttachVehicle {
                customer_id,
                registration: registration.clone(),
                external_source: external_id.as_ref().map(|_| external_source.to_string()),
                external_id: external_id.clone(),
            };
            store.attach_vehicle(found.id, &input).await?;
            return Ok(VehicleMatch::existing(&found, VehicleMatchKey::Vin));
        }
    }

    let input = CreateVehicle {
        organization_id,
        customer_id,
        registration,
        vin,
        make: non_blank(raw.make.as_deref()),
        model: non_blank(raw.model.as_deref()),
        color: non_blank(raw.color.as_deref()),
        fuel_type: non_blank(raw.fuel_type.as_deref()),
        mileage: raw.mileage,
        external_source: external_id.as_ref().map(|_| external_source.to_string()),
        external_id,
    };

    match store.create_vehicle(&input).await {
        Ok(vehicle) => {
            tracing::debug!(
                organization_id,
                vehicle_id = vehicle.id,
                registration = %vehicle.registration,
                "Vehicle created"
            );
            Ok(VehicleMatch {
                vehicle_id: vehicle.id,
                created: true,
                matched_by: VehicleMatchKey::Created,
            })
        }
        // Registration is unique per organization, so a conflict means a
        // concurrent run got there first.
        Err(e) if e.is_conflict() => {
            let found = store
                .find_vehicle_by_registration(organization_id, &input.registration)
                .await?
                .ok_or_else(|| {
                    StoreError::Conflict(format!(
                        "vehicle {} conflicted on insert but could not be re-read",
                        input.registration
                    ))
                })?;
            Ok(VehicleMatch::existing(&found, VehicleMatchKey::Registration))
        }
        Err(e) => Err(e.into()),
    }
}

fn gap(stored: &Option<String>, incoming: &Option<String>) -> Option<String> {
    match stored {
        Some(_) => None,
        None => incoming.clone(),
    }
}
