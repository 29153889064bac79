//! Repository for the `customers` table.

use sqlx::PgPool;
use vhc_core::types::DbId;

use crate::models::customer::{CreateCustomer, Customer, CustomerBackfill};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, organization_id, title, first_name, last_name, email, mobile, \
    address_line1, address_line2, town, county, postcode, external_id, external_source, \
    created_at, updated_at";

/// Lookups and writes used by the booking customer matcher.
pub struct CustomerRepo;

impl CustomerRepo {
    /// Find the customer linked to an external identity.
    pub async fn find_by_external_id(
        pool: &PgPool,
        organization_id: DbId,
        external_source: &str,
        external_id: &str,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM customers
             WHERE organization_id = $1 AND external_source = $2 AND external_id = $3"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(organization_id)
            .bind(external_source)
            .bind(external_id)
            .fetch_optional(pool)
            .await
    }

    /// Find the oldest customer whose email matches case-insensitively.
    ///
    /// `email` must already be lower-cased.
    pub async fn find_by_email(
        pool: &PgPool,
        organization_id: DbId,
        email: &str,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM customers
             WHERE organization_id = $1 AND LOWER(email) = $2
             ORDER BY id ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(organization_id)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find the oldest customer whose mobile matches once whitespace is
    /// ignored on both sides.
    ///
    /// `mobile` must already be stripped of whitespace.
    pub async fn find_by_mobile(
        pool: &PgPool,
        organization_id: DbId,
        mobile: &str,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM customers
             WHERE organization_id = $1
               AND REGEXP_REPLACE(mobile, '\\s', '', 'g') = $2
             ORDER BY id ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(organization_id)
            .bind(mobile)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new customer, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCustomer) -> Result<Customer, sqlx::Error> {
        let query = format!(
            "INSERT INTO customers
                (organization_id, title, first_name, last_name, email, mobile,
                 address_line1, address_line2, town, county, postcode,
                 external_id, external_source)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(input.organization_id)
            .bind(&input.title)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.mobile)
            .bind(&input.address_line1)
            .bind(&input.address_line2)
            .bind(&input.town)
            .bind(&input.county)
            .bind(&input.postcode)
            .bind(&input.external_id)
            .bind(&input.external_source)
            .fetch_one(pool)
            .await
    }

    /// Fill NULL columns from `input`; populated columns are left alone.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn backfill(
        pool: &PgPool,
        id: DbId,
        input: &CustomerBackfill,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!(
            "UPDATE customers SET
                title = COALESCE(title, $2),
                address_line1 = COALESCE(address_line1, $3),
                address_line2 = COALESCE(address_line2, $4),
                town = COALESCE(town, $5),
                county = COALESCE(county, $6),
                postcode = COALESCE(postcode, $7),
                external_id = COALESCE(external_id, $8),
                external_source = CASE WHEN external_id IS NULL THEN $9 ELSE external_source END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.address_line1)
            .bind(&input.address_line2)
            .bind(&input.town)
            .bind(&input.county)
            .bind(&input.postcode)
            .bind(&input.external_id)
            .bind(&input.external_source)
            .fetch_optional(pool)
            .await
    }
}
