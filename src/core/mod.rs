pub mod aggregator;
pub mod engine;
pub mod filter;
pub mod pipeline;
pub mod ranker;
pub mod scorer;
pub mod tagger;

pub use crate::domain::model::{AnalysisResult, Article, Candidate, EntityRecord, RankedEntity};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage, Tagger, Validator};
pub use crate::utils::error::Result;

pub use pipeline::extract_top_companies;
