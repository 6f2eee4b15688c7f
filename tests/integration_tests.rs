use httpmock::prelude::*;
use newsrank::config::RulesConfig;
use newsrank::{CliConfig, ExtractionEngine, ExtractionPipeline, LocalStorage};
use tempfile::TempDir;

fn config(output_path: &str) -> CliConfig {
    CliConfig {
        input: "articles.json".to_string(),
        articles_endpoint: None,
        output_path: output_path.to_string(),
        query: "electric vehicles".to_string(),
        top_n: 10,
        tagger_endpoint: None,
        validator_endpoint: None,
        rules_file: None,
        concurrent_requests: 20,
        verbose: false,
        monitor: false,
    }
}

fn sample_corpus() -> serde_json::Value {
    serde_json::json!([
        {"title": "Tesla unveils new factory in Texas", "source": "TechDaily"},
        {"title": "Tesla announces record quarterly deliveries", "source": "AutoWire"},
        {"title": "Tesla expands charging network across Europe", "source": "GridNews"},
        {"title": "Apple Inc launches new headset line", "source": "TechDaily"},
        {"title": "Apple Inc raises guidance for holiday quarter", "source": "MacReport"},
        {"title": "Reuters reports market jitters persist", "source": "Reuters"},
        {"title": "short", "source": "Noise"}
    ])
}

#[tokio::test]
async fn test_end_to_end_from_local_file() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let input_path = temp_dir.path().join("articles.json");
    std::fs::write(&input_path, sample_corpus().to_string()).unwrap();

    let mut cfg = config(&output_path);
    cfg.input = input_path.to_str().unwrap().to_string();

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = ExtractionPipeline::new(storage, cfg, RulesConfig::default());
    let engine = ExtractionEngine::new(pipeline);

    let report_path = engine.run().await.unwrap();
    assert!(report_path.contains("entity_report.zip"));

    let full_path = std::path::Path::new(&output_path).join("entity_report.zip");
    assert!(full_path.exists());

    let zip_data = std::fs::read(&full_path).unwrap();
    let cursor = std::io::Cursor::new(zip_data);
    let mut archive = zip::ZipArchive::new(cursor).unwrap();

    let file_names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert!(file_names.contains(&"leaderboard.csv".to_string()));
    assert!(file_names.contains(&"leaderboard.json".to_string()));

    // Tesla and Apple Inc survive; the publisher never makes the board
    let mut csv_content = String::new();
    {
        let mut csv_file = archive.by_name("leaderboard.csv").unwrap();
        std::io::Read::read_to_string(&mut csv_file, &mut csv_content).unwrap();
    }
    assert!(csv_content.contains("Tesla"));
    assert!(csv_content.contains("Apple Inc"));
    assert!(!csv_content.contains("Reuters"));

    let mut json_content = String::new();
    {
        let mut json_file = archive.by_name("leaderboard.json").unwrap();
        std::io::Read::read_to_string(&mut json_file, &mut json_content).unwrap();
    }
    let ranked: Vec<newsrank::RankedEntity> = serde_json::from_str(&json_content).unwrap();
    for (i, entity) in ranked.iter().enumerate() {
        assert_eq!(entity.rank, i + 1);
        assert!(entity.dominance_score >= 0.0 && entity.dominance_score <= 100.0);
        assert_eq!(entity.entity_type, "company");
    }
}

#[tokio::test]
async fn test_end_to_end_from_articles_endpoint() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let articles_mock = server.mock(|when, then| {
        when.method(GET).path("/articles");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(sample_corpus());
    });

    let mut cfg = config(&output_path);
    cfg.articles_endpoint = Some(server.url("/articles"));

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = ExtractionPipeline::new(storage, cfg, RulesConfig::default());
    let engine = ExtractionEngine::new(pipeline);

    let result = engine.run().await;
    assert!(result.is_ok());
    articles_mock.assert();

    let full_path = std::path::Path::new(&output_path).join("entity_report.zip");
    assert!(full_path.exists());
}

#[tokio::test]
async fn test_empty_corpus_still_produces_report() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let input_path = temp_dir.path().join("articles.json");
    std::fs::write(&input_path, "[]").unwrap();

    let mut cfg = config(&output_path);
    cfg.input = input_path.to_str().unwrap().to_string();

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = ExtractionPipeline::new(storage, cfg, RulesConfig::default());
    let engine = ExtractionEngine::new(pipeline);

    let result = engine.run().await;
    assert!(result.is_ok());

    let full_path = std::path::Path::new(&output_path).join("entity_report.zip");
    let zip_data = std::fs::read(&full_path).unwrap();
    let cursor = std::io::Cursor::new(zip_data);
    let archive = zip::ZipArchive::new(cursor).unwrap();

    // No entities, so only the two leaderboard files
    assert_eq!(archive.len(), 2);
}

#[tokio::test]
async fn test_custom_rules_file_shrinks_denylists() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    // A rules fixture with an empty publisher denylist lets "Reuters"
    // through the filter
    let rules = RulesConfig::from_toml_str(
        r#"
[filter]
excluded_publishers = []
"#,
    )
    .unwrap();

    let corpus = serde_json::json!([
        {"title": "Reuters launches new data platform today", "source": "WireWatch"},
        {"title": "Reuters announces newsroom expansion plans", "source": "MediaDesk"}
    ]);
    let input_path = temp_dir.path().join("articles.json");
    std::fs::write(&input_path, corpus.to_string()).unwrap();

    let mut cfg = config(&output_path);
    cfg.input = input_path.to_str().unwrap().to_string();

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = ExtractionPipeline::new(storage, cfg, rules);
    let engine = ExtractionEngine::new(pipeline);

    engine.run().await.unwrap();

    let full_path = std::path::Path::new(&output_path).join("entity_report.zip");
    let zip_data = std::fs::read(&full_path).unwrap();
    let cursor = std::io::Cursor::new(zip_data);
    let mut archive = zip::ZipArchive::new(cursor).unwrap();

    let mut csv_content = String::new();
    {
        let mut csv_file = archive.by_name("leaderboard.csv").unwrap();
        std::io::Read::read_to_string(&mut csv_file, &mut csv_content).unwrap();
    }
    assert!(csv_content.contains("Reuters"));
}
