//! Dashboard configuration
//!
//! Every field has a default, so callers only pass what they override.

use crate::error::LeadError;
use crate::export::DEFAULT_EXPORT_FILENAME;
use crate::paywall::{GatedDisplay, PaywallPolicy, DEFAULT_FREE_PREVIEW};
use serde::{Deserialize, Serialize};

pub const DEFAULT_STORAGE_KEY: &str = "lead-approval-data";
pub const DEFAULT_DATA_URL: &str = "/leads.csv";
pub const DEFAULT_PREVIEW_CHARS: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    /// Key of the persisted lead snapshot
    pub storage_key: String,
    /// Bundled CSV resource, fetched when no snapshot exists
    pub data_url: String,
    /// Rows visible before the paywall
    pub free_preview: usize,
    pub gated_display: GatedDisplay,
    pub export_filename: String,
    /// Table cell truncation length
    pub preview_chars: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_url: DEFAULT_DATA_URL.to_string(),
            free_preview: DEFAULT_FREE_PREVIEW,
            gated_display: GatedDisplay::Locked,
            export_filename: DEFAULT_EXPORT_FILENAME.to_string(),
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl DashboardConfig {
    /// Parse a (possibly partial) JSON config object
    pub fn from_json(json: &str) -> Result<Self, LeadError> {
        serde_json::from_str(json).map_err(|e| LeadError::Config(e.to_string()))
    }

    pub fn paywall(&self) -> PaywallPolicy {
        PaywallPolicy::new(self.free_preview, self.gated_display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.storage_key, "lead-approval-data");
        assert_eq!(config.data_url, "/leads.csv");
        assert_eq!(config.paywall(), PaywallPolicy::new(3, GatedDisplay::Locked));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            DashboardConfig::from_json(r#"{"freePreview":5,"gatedDisplay":"Hidden"}"#).unwrap();
        assert_eq!(config.free_preview, 5);
        assert_eq!(config.gated_display, GatedDisplay::Hidden);
        assert_eq!(config.export_filename, "approved-leads.csv");
    }

    #[test]
    fn test_invalid_json() {
        assert!(DashboardConfig::from_json("{\"freePreview\":\"lots\"}").is_err());
    }
}
