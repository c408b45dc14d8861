use crate::infrastructure::http::DEFAULT_BASE_URL;
use std::path::PathBuf;

pub const DEFAULT_PREFS_PATH: &str = "pagos-prefs.json";
pub const DEFAULT_USER: &str = "mockUser";

/// Runtime settings shared by every command.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the payment collection.
    pub api_url: String,
    /// File holding the stored role preference.
    pub prefs_path: PathBuf,
    /// Actor recorded in audit entries.
    pub user: String,
    /// Publish the sample dataset when the collection cannot be read.
    pub fallback: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            prefs_path: PathBuf::from(DEFAULT_PREFS_PATH),
            user: DEFAULT_USER.to_string(),
            fallback: true,
        }
    }
}
