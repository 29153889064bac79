use std::time::Duration;

use vhc_core::dms_import::DEFAULT_EXTERNAL_SOURCE;

/// Default interval between scheduled import sweeps: 1 hour.
const DEFAULT_INTERVAL_SECS: u64 = 3600;

/// Importer configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ImporterConfig {
    /// Tag written to `external_source` on every reconciled record.
    pub external_source: String,
    /// How often the scheduler sweeps enabled organizations.
    pub schedule_interval: Duration,
    /// Extra days after today included in a scheduled import.
    pub lookahead_days: u32,
}

impl ImporterConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default |
    /// |-----------------------------|---------|
    /// | `DMS_EXTERNAL_SOURCE`       | `dms`   |
    /// | `DMS_IMPORT_INTERVAL_SECS`  | `3600`  |
    /// | `DMS_IMPORT_LOOKAHEAD_DAYS` | `0`     |
    ///
    /// Unparseable numbers fall back to the default.
    pub fn from_env() -> Self {
        let external_source = std::env::var("DMS_EXTERNAL_SOURCE")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_EXTERNAL_SOURCE.to_string());

        let interval_secs: u64 = std::env::var("DMS_IMPORT_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_INTERVAL_SECS);

        let lookahead_days: u32 = std::env::var("DMS_IMPORT_LOOKAHEAD_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        Self {
            external_source,
            schedule_interval: Duration::from_secs(interval_secs),
            lookahead_days,
        }
    }
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            external_source: DEFAULT_EXTERNAL_SOURCE.to_string(),
            schedule_interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            lookahead_days: 0,
        }
    }
}
