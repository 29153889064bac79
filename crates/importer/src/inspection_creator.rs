//! Turns a reconciled booking into an `awaiting_arrival` inspection.

use vhc_core::booking::Booking;
use vhc_core::dms_import::INSPECTION_STATUS_AWAITING_ARRIVAL;
use vhc_core::normalize::{non_blank, parse_datetime, parse_promise_time};
use vhc_core::types::{DbId, Timestamp};
use vhc_db::models::inspection::CreateInspection;

use crate::error::ImportError;
use crate::store::{ImportStore, InsertOutcome};

/// Batch-wide values stamped onto every inspection in a run.
#[derive(Debug, Clone, Copy)]
pub struct InspectionContext<'a> {
    pub organization_id: DbId,
    pub site_id: DbId,
    pub template_id: DbId,
    pub batch_id: DbId,
    pub external_source: &'a str,
}

/// Build the insert for one booking. Unparseable dates are dropped with a
/// warning rather than failing the booking.
pub fn build_inspection(
    ctx: &InspectionContext<'_>,
    customer_id: DbId,
    vehicle_id: DbId,
    booking: &Booking,
    now: Timestamp,
) -> CreateInspection {
    let promise_time = parse_promise_time(booking.date.as_deref(), booking.time.as_deref());
    if promise_time.is_none() && booking.date.as_deref().is_some_and(|d| !d.trim().is_empty()) {
        tracing::warn!(
            booking_id = %booking.booking_id,
            date = ?booking.date,
            time = ?booking.time,
            "Unparseable booking date, promise time left empty"
        );
    }

    let due_date = booking.due_date_time.as_deref().and_then(|raw| {
        let parsed = parse_datetime(raw);
        if parsed.is_none() && !raw.trim().is_empty() {
            tracing::warn!(
                booking_id = %booking.booking_id,
                due_date_time = raw,
                "Unparseable due date, left empty"
            );
        }
        parsed
    });

    CreateInspection {
        organization_id: ctx.organization_id,
        site_id: ctx.site_id,
        customer_id,
        vehicle_id,
        template_id: ctx.template_id,
        status: INSPECTION_STATUS_AWAITING_ARRIVAL.to_string(),
        external_id: booking.booking_id.clone(),
        external_source: ctx.external_source.to_string(),
        import_batch_id: ctx.batch_id,
        promise_time,
        due_date,
        mileage: booking.vehicle.mileage,
        notes: non_blank(booking.notes.as_deref()),
        customer_waiting: booking.customer_waiting,
        loan_car_required: booking.loan_car_required,
        internal_job: booking.internal_job,
        booked_date: now,
        jobsheet_number: non_blank(booking.jobsheet_number.as_deref()),
        jobsheet_status: non_blank(booking.jobsheet_status.as_deref()),
        pre_booked_repairs: booking.repairs.clone(),
    }
}

pub async fn create_inspection(
    store: &dyn ImportStore,
    ctx: &InspectionContext<'_>,
    customer_id: DbId,
    vehicle_id: DbId,
    booking: &Booking,
    now: Timestamp,
) -> Result<InsertOutcome, ImportError> {
    let input = build_inspection(ctx, customer_id, vehicle_id, booking, now);
    let outcome = store.create_inspection(&input).await?;

    if let InsertOutcome::Created(inspection_id) = outcome {
        tracing::debug!(
            organization_id = ctx.organization_id,
            inspection_id,
            booking_id = %booking.booking_id,
            "Inspection created"
        );
    }
    Ok(outcome)
}
