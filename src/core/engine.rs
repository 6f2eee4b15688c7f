use crate::core::Pipeline;
use crate::utils::error::Result;

#[cfg(feature = "cli")]
use crate::utils::monitor::SystemMonitor;

/// Drives the three pipeline stages in order and reports progress.
pub struct ExtractionEngine<P: Pipeline> {
    pipeline: P,
    #[cfg(feature = "cli")]
    monitor: Option<SystemMonitor>,
}

impl<P: Pipeline> ExtractionEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            #[cfg(feature = "cli")]
            monitor: None,
        }
    }

    #[cfg(feature = "cli")]
    pub fn new_with_monitoring(pipeline: P, enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: enabled.then(|| SystemMonitor::new(true)),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting entity extraction run");

        let articles = self.pipeline.extract().await?;
        tracing::info!("Extracted {} articles", articles.len());
        self.log_stats("extract");

        let result = self.pipeline.transform(articles).await?;
        tracing::info!(
            "Ranked {} entities from {} articles",
            result.ranked.len(),
            result.total_articles
        );
        self.log_stats("transform");

        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Report saved to: {}", output_path);
        self.log_stats("load");

        Ok(output_path)
    }

    #[cfg(feature = "cli")]
    fn log_stats(&self, stage: &str) {
        if let Some(monitor) = &self.monitor {
            monitor.log_stats(stage);
        }
    }

    #[cfg(not(feature = "cli"))]
    fn log_stats(&self, _stage: &str) {}
}
