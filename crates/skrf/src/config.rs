//! Toolkit settings with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. TOML file, if given and present
//! 3. Environment variables: `SKRF_*` prefix
//!
//! ```toml
//! disabled_optional = ["vi"]
//! corrupt_data = "fatal"
//! log_filter = "skrf_core=debug"
//! ```

use std::collections::HashMap;
use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Deserializer};
use skrf_core::namespace::CorruptDataPolicy;

const ENV_PREFIX: &str = "SKRF";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Optional modules to treat as unavailable
    pub disabled_optional: Vec<String>,
    #[serde(deserialize_with = "deserialize_policy")]
    pub corrupt_data: CorruptDataPolicy,
    /// Default `tracing` filter directive; `RUST_LOG` wins when set
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            disabled_optional: Vec::new(),
            corrupt_data: CorruptDataPolicy::Warn,
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load defaults, then `file`, then the process environment
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(file, None)
    }

    /// Like [`Settings::load`], reading `SKRF_*` variables from `env` instead of
    /// the process environment when given
    pub fn load_with_env(
        file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("disabled_optional", defaults.disabled_optional)?
            .set_default("corrupt_data", "warn")?
            .set_default("log_filter", defaults.log_filter)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .list_separator(",")
                .with_list_parse_key("disabled_optional")
                .try_parsing(true)
                .source(env),
        );

        builder.build()?.try_deserialize()
    }

    pub fn is_disabled(&self, module: &str) -> bool {
        self.disabled_optional.iter().any(|m| m == module)
    }
}

fn deserialize_policy<'de, D>(deserializer: D) -> Result<CorruptDataPolicy, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}
