use std::path::PathBuf;

use anyhow::{Context, Result};

/// Locations of the two record tables.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub tracker_path: PathBuf,
    pub feedback_path: PathBuf,
}

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Where uploaded résumés are stored byte-for-byte.
    pub data_dir: PathBuf,
    /// Where JD copies, summaries and email drafts are written.
    pub outputs_dir: PathBuf,
    pub store: StoreConfig,
    pub max_upload_bytes: usize,
    /// Signature used at the bottom of generated email drafts.
    pub sender_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let outputs_dir = PathBuf::from(lookup("OUTPUTS_DIR").unwrap_or_else(|| "outputs".into()));
        let data_dir = PathBuf::from(lookup("DATA_DIR").unwrap_or_else(|| "data".into()));

        let store = StoreConfig {
            tracker_path: lookup("TRACKER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| outputs_dir.join("application_tracker.csv")),
            feedback_path: lookup("FEEDBACK_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| outputs_dir.join("feedback.csv")),
        };

        Ok(Config {
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            data_dir,
            outputs_dir,
            store,
            max_upload_bytes: lookup("MAX_UPLOAD_BYTES")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_UPLOAD_BYTES must be a byte count")?
                .unwrap_or(10 * 1024 * 1024),
            sender_name: lookup("SENDER_NAME").unwrap_or_else(|| "[Your Name]".to_string()),
        })
    }

    /// Configuration rooted at `root`, used by tests.
    #[cfg(test)]
    pub fn rooted_at(root: &std::path::Path) -> Self {
        let root = root.to_string_lossy().into_owned();
        Self::from_lookup(|key| match key {
            "OUTPUTS_DIR" => Some(format!("{root}/outputs")),
            "DATA_DIR" => Some(format!("{root}/data")),
            _ => None,
        })
        .expect("default config is valid")
    }
}
