pub mod aggregate;
pub mod classify;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod export;
pub mod model;
pub mod plan;
pub mod rules;
pub mod size;
pub mod wildcard;

pub use aggregate::{aggregate, files_in_bucket};
pub use classify::{BucketClassifier, ClassifierOptions, Criterion, DateFormat};
pub use config::{load_configuration, AppConfig};
pub use duplicates::DuplicateCache;
pub use error::Error;
pub use export::{export_file_name, write_csv};
pub use model::{sort_by_name, FileMetadata, FileRecord, TimeBasis};
pub use plan::{NamingOptions, OrganizationPlan, PlannedFile, PreviewFolder, PreviewTree};
pub use rules::{Condition, Operator, Rule, RuleEvaluator, RuleProperty, RuleSet};
