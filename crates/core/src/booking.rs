//! Booking records as delivered by the dealer-management system.
//!
//! A [`Booking`] only lives for the duration of one import run. Field names
//! follow the camelCase JSON the diary feed produces; every field except the
//! booking id is optional because dealer systems are inconsistent about what
//! they populate.

use serde::{Deserialize, Serialize};

/// Booking statuses that are never imported (compared case-insensitively).
pub const CLOSED_BOOKING_STATUSES: &[&str] = &["cancelled", "completed"];

/// One appointment pulled from the dealer diary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// External booking id; the dedup key for inspections.
    pub booking_id: String,
    #[serde(default)]
    pub status: Option<String>,
    /// Scheduled date (`YYYY-MM-DD` or an RFC 3339 timestamp).
    #[serde(default)]
    pub date: Option<String>,
    /// Scheduled time of day (`HH:MM` or `HH:MM:SS`).
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub due_date_time: Option<String>,
    #[serde(default)]
    pub customer: BookingCustomer,
    #[serde(default)]
    pub vehicle: BookingVehicle,
    #[serde(default)]
    pub repairs: Vec<PreBookedRepair>,
    #[serde(default)]
    pub jobsheet_number: Option<String>,
    #[serde(default)]
    pub jobsheet_status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub customer_waiting: bool,
    #[serde(default)]
    pub loan_car_required: bool,
    #[serde(default)]
    pub internal_job: bool,
}

impl Booking {
    /// True when the booking's status means it should not be imported.
    pub fn is_closed(&self) -> bool {
        self.status
            .as_deref()
            .map(|s| {
                let s = s.trim();
                CLOSED_BOOKING_STATUSES
                    .iter()
                    .any(|closed| s.eq_ignore_ascii_case(closed))
            })
            .unwrap_or(false)
    }
}

/// Raw customer fields attached to a booking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCustomer {
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
}

/// Raw vehicle fields attached to a booking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingVehicle {
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub registration: Option<String>,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub mileage: Option<i32>,
}

/// A repair line booked in advance on the dealer system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreBookedRepair {
    #[serde(default)]
    pub code: Option<String>,
    pub description: String,
    #[serde(default)]
    pub estimated_price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_status(status: Option<&str>) -> Booking {
        Booking {
            booking_id: "B1".to_string(),
            status: status.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn closed_statuses_match_any_case() {
        assert!(with_status(Some("Completed")).is_closed());
        assert!(with_status(Some("CANCELLED")).is_closed());
        assert!(with_status(Some(" cancelled ")).is_closed());
    }

    #[test]
    fn open_and_missing_statuses_are_not_closed() {
        assert!(!with_status(Some("Booked")).is_closed());
        assert!(!with_status(Some("")).is_closed());
        assert!(!with_status(None).is_closed());
    }

    #[test]
    fn deserializes_sparse_camel_case_payload() {
        let json = serde_json::json!({
            "bookingId": "B42",
            "status": "Booked",
            "date": "2026-03-02",
            "time": "09:30",
            "customer": { "externalId": "C9", "email": "A@Example.com" },
            "vehicle": { "registration": "ab12 cde", "mileage": 41000 },
            "repairs": [{ "description": "Front pads" }],
            "customerWaiting": true
        });
        let booking: Booking = serde_json::from_value(json).unwrap();
        assert_eq!(booking.booking_id, "B42");
        assert_eq!(booking.customer.external_id.as_deref(), Some("C9"));
        assert_eq!(booking.vehicle.mileage, Some(41000));
        assert_eq!(booking.repairs.len(), 1);
        assert!(booking.customer_waiting);
        assert!(!booking.loan_car_required);
        assert!(booking.jobsheet_number.is_none());
    }
}
