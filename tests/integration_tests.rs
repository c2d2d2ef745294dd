use httpmock::prelude::*;
use seo_dashboard::app::{render_board, save_report, ConsolePresenter, JsonPresenter};
use seo_dashboard::config::validate_provider;
use seo_dashboard::core::store::DATA_LOAD_ADVISORY;
use seo_dashboard::{CliConfig, DashboardEngine, DataStore, Selection, TomlConfig};
use std::io::Write;
use std::time::Duration;
use tempfile::{NamedTempFile, TempDir};

fn cli_config(data_source: String) -> CliConfig {
    CliConfig {
        data_source,
        default_domain: "example.com".to_string(),
        site: None,
        location: None,
        frame_interval_ms: 1,
        output_format: "text".to_string(),
        output_path: None,
        live: false,
        config: None,
        verbose: false,
        monitor: false,
        log_json: false,
    }
}

#[tokio::test]
async fn test_end_to_end_dashboard_with_real_http() -> anyhow::Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/data/seo-data.json")
            .header("pragma", "no-cache");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "www.acme.io": {
                    "domainRating": 67.2,
                    "backlinks": 3.4e9,
                    "pageSpeed": { "desktop": 120, "mobile": 64.4 },
                    "leads": { "monthly": 750, "cf": 900 }
                }
            }));
    });

    let mut config = cli_config(server.url("/data/seo-data.json"));
    config.site = Some("https://acme.io/pricing".to_string());
    validate_provider(&config)?;

    let store = DataStore::from_location(&config.data_source);
    let mut engine = DashboardEngine::new(store, Duration::from_millis(config.frame_interval_ms));
    let selection = Selection::new(config.default_domain.clone()).with_site(config.site.as_deref());
    let mut presenter = ConsolePresenter::new(Vec::new(), false);

    let snapshot = engine.run(&selection, &mut presenter).await?;
    api_mock.assert();

    assert_eq!(snapshot.domain, "acme.io");
    assert!(snapshot.record_found);
    assert_eq!(snapshot.reading("domain-rating", "rating").unwrap().display, "67.2");
    assert_eq!(snapshot.reading("total-backlinks", "backlinks").unwrap().display, "3.4B");
    // 超過 100 的分數會被夾住
    assert_eq!(snapshot.reading("page-speed", "desktop").unwrap().value, 100.0);
    assert_eq!(snapshot.reading("page-speed", "mobile").unwrap().value, 64.0);
    assert_eq!(snapshot.reading("leads", "goal_bar").unwrap().value, 50.0);
    // 分項長條不夾住，可超過 100%
    assert_eq!(snapshot.reading("leads", "cf_bar").unwrap().value, 112.5);

    let board = String::from_utf8(presenter.into_inner())?;
    assert!(board.contains("SEO Dashboard: acme.io"));
    assert!(board.contains("Goals 750 / 1,500"));
    assert!(!board.contains("⚠️"));
    Ok(())
}

#[tokio::test]
async fn test_http_failure_renders_defaults_with_advisory() -> anyhow::Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/data/seo-data.json");
        then.status(404);
    });

    let store = DataStore::from_location(&server.url("/data/seo-data.json"));
    let mut engine = DashboardEngine::new(store, Duration::from_millis(1));
    let mut presenter = ConsolePresenter::new(Vec::new(), true);

    let snapshot = engine.run(&Selection::new("example.com"), &mut presenter).await?;
    api_mock.assert();

    assert_eq!(snapshot.data_error.as_deref(), Some(DATA_LOAD_ADVISORY));
    assert_eq!(snapshot.reading("domain-rating", "rating").unwrap().display, "53.6");
    assert_eq!(snapshot.reading("referring-domains", "count").unwrap().display, "63.4k");
    assert_eq!(snapshot.reading("total-backlinks", "backlinks").unwrap().display, "26.1B");
    assert_eq!(snapshot.reading("core-web-vitals", "inp").unwrap().display, "180ms");

    let output = String::from_utf8(presenter.into_inner())?;
    assert!(output.contains("⏳ example.com"));
    assert!(output.contains(DATA_LOAD_ADVISORY));
    assert!(output.contains("Goals 887 / 1,500"));
    Ok(())
}

#[tokio::test]
async fn test_toml_config_with_file_dataset_and_report() -> anyhow::Result<()> {
    let mut dataset = NamedTempFile::new()?;
    dataset.write_all(
        br#"{
            "example.com": { "siteHealth": 88.5, "organicTraffic": { "monthly": 120500 } },
            "blog.example.com": null,
            "broken.example.com": { "siteHealth": "n/a" }
        }"#,
    )?;

    let out_dir = TempDir::new()?;
    let report_path = out_dir.path().join("reports/board.json");
    let toml_content = format!(
        r#"
[dataset]
source = "{}"

[dashboard]
location = "https://dash.local/?tab=1&site=Example.com"

[animation]
frame_interval_ms = 1

[output]
format = "json"
path = "{}"
"#,
        dataset.path().display(),
        report_path.display()
    );
    let config = TomlConfig::from_toml_str(&toml_content)?;
    validate_provider(&config)?;

    use seo_dashboard::core::ConfigProvider;
    let store = DataStore::from_location(config.data_source());
    let mut engine = DashboardEngine::new_with_monitoring(
        store,
        Duration::from_millis(config.frame_interval_ms()),
        config.monitoring_enabled(),
    );
    let selection = Selection::new(config.default_domain()).with_location(config.location());
    let mut presenter = JsonPresenter::new(Vec::new());

    let snapshot = engine.run(&selection, &mut presenter).await?;
    assert_eq!(snapshot.domain, "example.com");
    // 壞掉的相鄰紀錄只會被略過
    assert!(snapshot.data_error.is_none());
    assert_eq!(snapshot.reading("site-health", "score").unwrap().value, 88.5);
    assert_eq!(snapshot.reading("organic-traffic", "monthly").unwrap().display, "120.5k");

    let printed: serde_json::Value = serde_json::from_slice(&presenter.into_inner())?;
    assert_eq!(printed["domain"], "example.com");
    assert_eq!(printed["settled"], true);

    let written = save_report(config.output_path().unwrap(), &render_board(&snapshot)).await?;
    assert!(std::fs::read_to_string(written)?.contains("[Site Health Score]"));
    Ok(())
}

#[test]
fn test_invalid_cli_values_are_rejected() {
    let mut config = cli_config("public/data/seo-data.json".to_string());
    assert!(validate_provider(&config).is_ok());

    config.output_format = "yaml".to_string();
    assert!(validate_provider(&config).is_err());

    config.output_format = "json".to_string();
    config.data_source = String::new();
    assert!(validate_provider(&config).is_err());
}
