pub mod classification;
pub mod cli;
pub mod error;
pub mod inventory;
pub mod types;

#[cfg(feature = "python")]
pub mod python;

pub use classification::{
    classify, ClassificationResult, Heuristic, HeuristicConfig, KeyConfig, NamedKey,
    ResultEntry, RuleConfig,
};
pub use cli::report::TextReport;
pub use error::{HeuclassError, Result};
pub use types::*;
