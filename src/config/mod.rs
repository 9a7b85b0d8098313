use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

use crate::errors::ConfigError;

const ENV_PREFIX: &str = "QUICK_INVOICE_";

/// Configuration for the application
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory holding the onboarding flag
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
    /// Directory exported invoices are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// GST rate preselected on the home screen, in percent
    #[serde(default = "default_gst_rate")]
    pub default_gst_rate: f64,
    /// Share-intent prefix the encoded message is appended to
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,
    /// How long "Generating..." stays on screen
    #[serde(default = "default_generation_delay_ms")]
    pub generation_delay_ms: u64,
    /// Value the invoice counter badge starts from
    #[serde(default = "default_starting_invoice_count")]
    pub starting_invoice_count: u32,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".quick_invoice")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("invoices")
}

fn default_gst_rate() -> f64 {
    18.0
}

fn default_share_base_url() -> String {
    "https://wa.me/?text=".to_string()
}

fn default_generation_delay_ms() -> u64 {
    1500
}

fn default_starting_invoice_count() -> u32 {
    42
}

fn default_log_file() -> PathBuf {
    PathBuf::from("quick_invoice.log")
}

impl Config {
    /// Load configuration from `QUICK_INVOICE_*` environment variables
    pub fn load() -> Result<Self> {
        let config = envy::prefixed(ENV_PREFIX).from_env::<Config>()?;
        config.validate()?;

        Ok(config)
    }

    /// Same as `load`, reading from the given pairs instead of the process environment
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::prefixed(ENV_PREFIX).from_iter::<_, Config>(pairs)?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.default_gst_rate) {
            return Err(ConfigError::InvalidGstRate(self.default_gst_rate));
        }
        Ok(())
    }

    pub fn onboarding_flag_path(&self) -> PathBuf {
        self.state_dir.join("has_seen_splash")
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn generation_delay(&self) -> Duration {
        Duration::from_millis(self.generation_delay_ms)
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    // Ensure .env file is loaded
    dotenv().ok();

    Config::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(values: &[(&str, &str)]) -> Vec<(String, String)> {
        values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_without_variables() {
        let config = Config::from_pairs(Vec::new()).unwrap();

        assert_eq!(config.default_gst_rate, 18.0);
        assert_eq!(config.share_base_url, "https://wa.me/?text=");
        assert_eq!(config.generation_delay(), Duration::from_millis(1500));
        assert_eq!(config.starting_invoice_count, 42);
        assert_eq!(
            config.onboarding_flag_path(),
            PathBuf::from(".quick_invoice").join("has_seen_splash")
        );
    }

    #[test]
    fn prefixed_variables_override_defaults() {
        let config = Config::from_pairs(pairs(&[
            ("QUICK_INVOICE_DEFAULT_GST_RATE", "5"),
            ("QUICK_INVOICE_STATE_DIR", "/tmp/qi"),
            ("QUICK_INVOICE_GENERATION_DELAY_MS", "10"),
            ("UNRELATED", "ignored"),
        ]))
        .unwrap();

        assert_eq!(config.default_gst_rate, 5.0);
        assert_eq!(config.state_dir, PathBuf::from("/tmp/qi"));
        assert_eq!(config.generation_delay_ms, 10);
    }

    #[test]
    fn out_of_range_gst_rate_is_refused() {
        let result = Config::from_pairs(pairs(&[("QUICK_INVOICE_DEFAULT_GST_RATE", "140")]));

        assert!(result.is_err());
    }
}
