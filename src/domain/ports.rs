use crate::domain::model::{AnalysisResult, Article, Candidate};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Candidate tagging capability. The external ML variant may fail; the
/// pattern-based fallback never does. Callers compose the two through
/// [`crate::core::tagger::TaggerStack`], which never surfaces the failure.
#[async_trait]
pub trait Tagger: Send + Sync {
    async fn tag(&self, headline: &str) -> Result<Vec<Candidate>>;
}

/// Contextual entity validation capability (external, optional). Adapters
/// must fail open: an internal error is reported as `Ok(true)`, never as an
/// `Err` that would starve the pipeline.
#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(&self, entity: &str, headline: &str) -> bool;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// Local JSON file with the article corpus; ignored when an endpoint is
    /// configured.
    fn input_file(&self) -> &str;
    /// Optional HTTP endpoint returning a JSON array of articles.
    fn articles_endpoint(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn query(&self) -> &str;
    fn top_n(&self) -> usize;
    fn tagger_endpoint(&self) -> Option<&str>;
    fn validator_endpoint(&self) -> Option<&str>;
    fn concurrent_requests(&self) -> usize;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Article>>;
    async fn transform(&self, articles: Vec<Article>) -> Result<AnalysisResult>;
    async fn load(&self, result: AnalysisResult) -> Result<String>;
}
