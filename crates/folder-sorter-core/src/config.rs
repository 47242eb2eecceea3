use crate::classify::{ClassifierOptions, DEFAULT_BATCH_SIZE, DEFAULT_PREFIX_LENGTH};
use crate::error::Error;
use crate::model::TimeBasis;
use crate::plan::NamingOptions;
use crate::rules::{Operator, RuleEvaluator};
use config::{Config, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    pub batch_size: usize,
    pub prefix_length: usize,
    pub time_basis: TimeBasis,
    /// Combinator for rule files that do not name one.
    pub operator: Operator,
    #[serde(default)]
    pub naming: NamingOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            prefix_length: DEFAULT_PREFIX_LENGTH,
            time_basis: TimeBasis::Utc,
            operator: Operator::Or,
            naming: NamingOptions::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.batch_size == 0 {
            return Err(Error::InvalidOption {
                name: "batch_size",
                reason: "must be a positive integer".to_string(),
            });
        }
        if self.prefix_length == 0 {
            return Err(Error::InvalidOption {
                name: "prefix_length",
                reason: "must be a positive integer".to_string(),
            });
        }
        Ok(())
    }

    pub fn classifier_options(&self, duplicates_scanned: bool) -> ClassifierOptions {
        ClassifierOptions {
            batch_size: self.batch_size,
            prefix_length: self.prefix_length,
            duplicates_scanned,
            time_basis: self.time_basis,
        }
    }

    pub fn evaluator(&self, duplicates_scanned: bool) -> RuleEvaluator {
        RuleEvaluator::new(duplicates_scanned, self.time_basis)
    }
}

/// Load configuration from `Config.toml` in the working directory (optional),
/// or from `path` when given (required), then apply `SORTER_*` environment
/// overrides. Nested keys use `__`, e.g. `SORTER_NAMING__FOLDER_PREFIX`.
pub fn load_configuration(path: Option<&Path>) -> Result<AppConfig, Error> {
    let file_source = match path {
        Some(path) => ConfigFile::from(path).required(true),
        None => ConfigFile::with_name("Config").required(false),
    };

    let builder = Config::builder()
        .set_default("batch_size", DEFAULT_BATCH_SIZE as i64)?
        .set_default("prefix_length", DEFAULT_PREFIX_LENGTH as i64)?
        .set_default("time_basis", "utc")?
        .set_default("operator", "OR")?
        .add_source(file_source)
        .add_source(
            Environment::with_prefix("SORTER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<AppConfig>()?;
    config.validate()?;
    Ok(config)
}
