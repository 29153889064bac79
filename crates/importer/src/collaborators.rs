//! Interfaces to the systems the importer depends on but does not own.
//!
//! - [`CredentialProvider`]: decrypted dealer-system credentials.
//! - [`DiaryFetcher`]: the dealer-system diary client.
//! - [`DefaultsResolver`]: default inspection template and site.

use std::fmt;

use async_trait::async_trait;
use vhc_core::booking::Booking;
use vhc_core::dms_import::DateRange;
use vhc_core::types::DbId;

use crate::error::StoreError;

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Decrypted credentials for one organization's dealer system.
#[derive(Clone, PartialEq, Eq)]
pub struct DmsCredentials {
    pub account_id: String,
    pub username: String,
    pub password: String,
    /// Endpoint override, when the dealer system is not at its default host.
    pub endpoint: Option<String>,
}

impl fmt::Debug for DmsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DmsCredentials")
            .field("account_id", &self.account_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("DMS credentials are not configured")]
    NotConfigured,

    #[error("DMS credentials are invalid: {0}")]
    Invalid(String),
}

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn get_credentials(&self, organization_id: DbId)
        -> Result<DmsCredentials, CredentialError>;
}

// ---------------------------------------------------------------------------
// Diary
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network, timeout, or decoding failure.
    #[error("Dealer system request failed: {0}")]
    Transport(String),

    /// The dealer system answered but reported a logical failure.
    #[error("Dealer system rejected the request: {0}")]
    Rejected(String),
}

/// Client for the dealer-system diary.
///
/// Implementations own their timeout and retry policy; the importer calls
/// `fetch_bookings` exactly once per run.
#[async_trait]
pub trait DiaryFetcher: Send + Sync {
    async fn fetch_bookings(
        &self,
        credentials: &DmsCredentials,
        range: DateRange,
    ) -> Result<Vec<Booking>, FetchError>;
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Resolves the template and site used when the caller does not name them.
#[async_trait]
pub trait DefaultsResolver: Send + Sync {
    /// The organization's configured default template, else its oldest
    /// active template.
    async fn default_template(&self, organization_id: DbId) -> Result<Option<DbId>, StoreError>;

    /// The organization's oldest active site.
    async fn default_site(&self, organization_id: DbId) -> Result<Option<DbId>, StoreError>;
}
