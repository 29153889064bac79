//! Resolves a booking's customer to an internal customer record.
//!
//! Keys are tried in order and the first hit wins:
//!
//! 1. external id (scoped to organization and source)
//! 2. email, case-insensitive
//! 3. mobile, whitespace-insensitive
//!
//! A hit on email or mobile fills gaps in the stored record; nothing that is
//! already populated is overwritten. With no hit a new customer is created.

use vhc_core::booking::BookingCustomer;
use vhc_core::normalize::{non_blank, normalize_email, normalize_mobile};
use vhc_core::types::DbId;
use vhc_db::models::customer::{CreateCustomer, Customer, CustomerBackfill};

use crate::best_effort::best_effort;
use crate::error::{ImportError, StoreError};
use crate::store::ImportStore;

/// Which key resolved the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerMatchKey {
    ExternalId,
    Email,
    Mobile,
    Created,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomerMatch {
    pub customer_id: DbId,
    pub created: bool,
    pub matched_by: CustomerMatchKey,
}

impl CustomerMatch {
    fn existing(customer: &Customer, matched_by: CustomerMatchKey) -> Self {
        Self {
            customer_id: customer.id,
            created: false,
            matched_by,
        }
    }
}

pub async fn match_customer(
    store: &dyn ImportStore,
    organization_id: DbId,
    raw: &BookingCustomer,
    external_source: &str,
) -> Result<CustomerMatch, ImportError> {
    let external_id = non_blank(raw.external_id.as_deref());

    if let Some(ext) = external_id.as_deref() {
        if let Some(found) = store
            .find_customer_by_external_id(organization_id, external_source, ext)
            .await?
        {
            return Ok(CustomerMatch::existing(&found, CustomerMatchKey::ExternalId));
        }
    }

    let email = raw.email.as_deref().and_then(normalize_email);
    if let Some(email) = email.as_deref() {
        if let Some(found) = store.find_customer_by_email(organization_id, email).await? {
            backfill(store, &found, raw, external_id.as_deref(), external_source).await;
            return Ok(CustomerMatch::existing(&found, CustomerMatchKey::Email));
        }
    }

    let mobile = raw.mobile.as_deref().and_then(normalize_mobile);
    if let Some(mobile) = mobile.as_deref() {
        if let Some(found) = store.find_customer_by_mobile(organization_id, mobile).await? {
            backfill(store, &found, raw, external_id.as_deref(), external_source).await;
            return Ok(CustomerMatch::existing(&found, CustomerMatchKey::Mobile));
        }
    }

    let input = CreateCustomer {
        organization_id,
        title: non_blank(raw.title.as_deref()),
        first_name: non_blank(raw.first_name.as_deref()),
        last_name: non_blank(raw.last_name.as_deref()),
        email,
        mobile,
        address_line1: non_blank(raw.address_line1.as_deref()),
        address_line2: non_blank(raw.address_line2.as_deref()),
        town: non_blank(raw.town.as_deref()),
        county: non_blank(raw.county.as_deref()),
        postcode: non_blank(raw.postcode.as_deref()),
        external_source: external_id.as_ref().map(|_| external_source.to_string()),
        external_id,
    };

    match store.create_customer(&input).await {
        Ok(customer) => {
            tracing::debug!(organization_id, customer_id = customer.id, "Customer created");
            Ok(CustomerMatch {
                customer_id: customer.id,
                created: true,
                matched_by: CustomerMatchKey::Created,
            })
        }
        // A concurrent run created the same external customer between our
        // lookup and insert; take theirs.
        Err(e) if e.is_conflict() => {
            let ext = input.external_id.as_deref().ok_or(e)?;
            let found = store
                .find_customer_by_external_id(organization_id, external_source, ext)
                .await?
                .ok_or_else(|| {
                    StoreError::Conflict(format!(
                        "customer {ext} conflicted on insert but could not be re-read"
                    ))
                })?;
            Ok(CustomerMatch::existing(&found, CustomerMatchKey::ExternalId))
        }
        Err(e) => Err(e.into()),
    }
}

/// Fill gaps on a soft-matched customer. Failure is logged, never raised.
async fn backfill(
    store: &dyn ImportStore,
    existing: &Customer,
    raw: &BookingCustomer,
    external_id: Option<&str>,
    external_source: &str,
) {
    let link_external = existing.external_id.is_none().then_some(external_id).flatten();
    let input = CustomerBackfill {
        title: gap(&existing.title, &raw.title),
        address_line1: gap(&existing.address_line1, &raw.address_line1),
        address_line2: gap(&existing.address_line2, &raw.address_line2),
        town: gap(&existing.town, &raw.town),
        county: gap(&existing.county, &raw.county),
        postcode: gap(&existing.postcode, &raw.postcode),
        external_id: link_external.map(str::to_string),
        external_source: link_external.map(|_| external_source.to_string()),
    };

    if is_empty(&input) {
        return;
    }

    best_effort(
        "customer backfill",
        store.backfill_customer(existing.id, &input),
    )
    .await;
}

/// The incoming value, but only where the stored value is missing.
fn gap(stored: &Option<String>, incoming: &Option<String>) -> Option<String> {
    match stored {
        Some(_) => None,
        None => non_blank(incoming.as_deref()),
    }
}

fn is_empty(input: &CustomerBackfill) -> bool {
    input.title.is_none()
        && input.address_line1.is_none()
        && input.address_line2.is_none()
        && input.town.is_none()
        && input.county.is_none()
        && input.postcode.is_none()
        && input.external_id.is_none()
}
