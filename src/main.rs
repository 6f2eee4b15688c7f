use anyhow::Context;
use clap::Parser;
use newsrank::config::RulesConfig;
use newsrank::utils::{logger, validation::Validate};
use newsrank::{CliConfig, ExtractionEngine, ExtractionPipeline, LocalStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting newsrank");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let rules = match &config.rules_file {
        Some(path) => RulesConfig::from_file(path)
            .with_context(|| format!("failed to load rules file '{}'", path))?,
        None => RulesConfig::default(),
    };
    rules.validate().context("rules file failed validation")?;

    let monitor_enabled = config.monitor;
    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = ExtractionPipeline::new(storage, config, rules);
    let engine = ExtractionEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("Extraction run completed");
            println!("✅ Extraction completed successfully!");
            println!("📁 Report saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!("Extraction run failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
