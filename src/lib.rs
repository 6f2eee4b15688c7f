pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, LocalStorage};
pub use config::RulesConfig;

pub use crate::core::engine::ExtractionEngine;
pub use crate::core::pipeline::{extract_top_companies, ExtractionPipeline};
pub use domain::model::{Article, RankedEntity};
pub use utils::error::{NewsRankError, Result};
