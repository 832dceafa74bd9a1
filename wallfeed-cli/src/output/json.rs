//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use wallfeed_core::{Collection, ProviderError, ProviderId, ProviderQuota, Wallpaper};
use wallfeed_store::CacheEntry;

use super::{ProviderRow, StatsRow};

// ============================================================================
// Output Types
// ============================================================================

/// A reconciled list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOutput<'a> {
    pub key: &'a str,
    pub source: &'static str,
    pub fetched_at: DateTime<Utc>,
    pub items: &'a [Wallpaper],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorOutput>,
}

/// A failed call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub provider: ProviderId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub message: String,
    pub rate_limited: bool,
}

impl From<&ProviderError> for ErrorOutput {
    fn from(error: &ProviderError) -> Self {
        Self {
            provider: error.provider,
            code: error.code,
            message: error.message.clone(),
            rate_limited: error.is_rate_limited(),
        }
    }
}

/// Provider info output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfoOutput {
    pub id: ProviderId,
    pub display_name: &'static str,
    pub enabled: bool,
    pub api_key_env: String,
    pub key_required: bool,
    pub has_key: bool,
    pub usable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota: Option<ProviderQuota>,
}

/// Per-provider counters.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOutput {
    pub provider: ProviderId,
    pub calls: u64,
    pub successes: u64,
    pub errors: u64,
    pub reserved: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota: Option<ProviderQuota>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<ErrorOutput>,
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a reconciled list and the refresh error, if any.
    pub fn format_list(
        &self,
        entry: &CacheEntry,
        from_cache: bool,
        error: Option<&ProviderError>,
    ) -> Result<String> {
        self.format(&ListOutput {
            key: &entry.key,
            source: if from_cache { "cache" } else { "remote" },
            fetched_at: entry.fetched_at,
            items: &entry.items,
            error: error.map(ErrorOutput::from),
        })
    }

    /// Formats a failure with nothing to show.
    pub fn format_error(&self, error: &ProviderError) -> Result<String> {
        self.format(&serde_json::json!({ "error": ErrorOutput::from(error) }))
    }

    /// Formats collections.
    pub fn format_collections(&self, collections: &[Collection]) -> Result<String> {
        self.format(collections)
    }

    /// Formats the providers listing.
    pub fn format_providers(&self, rows: &[ProviderRow]) -> Result<String> {
        let outputs: Vec<_> = rows
            .iter()
            .map(|row| ProviderInfoOutput {
                id: row.provider,
                display_name: row.provider.display_name(),
                enabled: row.enabled,
                api_key_env: row.key_var.clone(),
                key_required: row.key_required,
                has_key: row.has_key,
                usable: row.usable(),
                quota: row.quota,
            })
            .collect();
        self.format(&outputs)
    }

    /// Formats per-provider counters.
    pub fn format_stats(&self, rows: &[StatsRow]) -> Result<String> {
        let outputs: Vec<_> = rows
            .iter()
            .map(|row| StatsOutput {
                provider: row.provider,
                calls: row.counters.calls,
                successes: row.counters.successes,
                errors: row.counters.errors,
                reserved: row.reserved,
                quota: row.quota,
                last_error: row.counters.last_error.as_ref().map(ErrorOutput::from),
            })
            .collect();
        self.format(&outputs)
    }
}
