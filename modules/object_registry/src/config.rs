//! Configuration for the object registry module

use serde::{Deserialize, Serialize};

/// Spreadsheet container used for exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabularFormat {
    Xlsx,
    Csv,
}

/// Object registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Tag written on every priority record
    #[serde(default = "default_formula_version")]
    pub formula_version: String,

    /// Export container format
    #[serde(default = "default_export_format")]
    pub export_format: TabularFormat,

    /// Reject passport dates later than today on writes
    #[serde(default = "default_true")]
    pub reject_future_passport_dates: bool,

    /// Maximum import upload size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            formula_version: default_formula_version(),
            export_format: default_export_format(),
            reject_future_passport_dates: true,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_formula_version() -> String {
    "v1".to_string()
}

fn default_export_format() -> TabularFormat {
    TabularFormat::Xlsx
}

fn default_true() -> bool {
    true
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024 // 10MB
}
