use clap::Parser;
use seo_dashboard::app::{render_board, render_json, save_report, ConsolePresenter, JsonPresenter};
use seo_dashboard::config::validate_provider;
use seo_dashboard::core::ConfigProvider;
use seo_dashboard::utils::error::{DashError, ErrorSeverity};
use seo_dashboard::utils::logger;
use seo_dashboard::{CliConfig, DashboardEngine, DataStore, Selection, TomlConfig};
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 先讀 TOML，讓 log_level 能影響日誌初始化
    let toml = cli.config.as_deref().map(|path| TomlConfig::from_file(path));
    let verbose = cli.verbose
        || matches!(&toml, Some(Ok(c)) if c.log_level() == Some("debug"));

    // 日誌寫到 stderr，stdout 只留給儀表板輸出
    if cli.log_json {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting seo-dashboard");
    if verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let (settings, monitor_enabled): (Box<dyn ConfigProvider>, bool) = match toml {
        Some(Ok(config)) => {
            tracing::info!("📄 Using TOML config: {}", cli.config.as_deref().unwrap_or_default());
            let monitor = cli.monitor || config.monitoring_enabled();
            (Box::new(config) as Box<dyn ConfigProvider>, monitor)
        }
        Some(Err(e)) => fail("Failed to load TOML config", &e),
        None => (Box::new(cli.clone()) as Box<dyn ConfigProvider>, cli.monitor),
    };

    if let Err(e) = validate_provider(settings.as_ref()) {
        fail("Configuration validation failed", &e);
    }
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let store = DataStore::from_location(settings.data_source());
    let frame_interval = Duration::from_millis(settings.frame_interval_ms());
    let mut engine = DashboardEngine::new_with_monitoring(store, frame_interval, monitor_enabled);
    let selection = Selection::new(settings.default_domain())
        .with_site(settings.site())
        .with_location(settings.location());

    let json_output = settings.output_format() == "json";
    let outcome = if json_output {
        engine
            .run(&selection, &mut JsonPresenter::new(std::io::stdout()))
            .await
    } else {
        engine
            .run(&selection, &mut ConsolePresenter::new(std::io::stdout(), cli.live))
            .await
    };

    let snapshot = match outcome {
        Ok(snapshot) => snapshot,
        Err(e) => fail("Dashboard run failed", &e),
    };

    if let Some(advisory) = &snapshot.data_error {
        tracing::warn!("Rendered with default values: {}", advisory);
    }

    if let Some(path) = settings.output_path() {
        let body = if json_output {
            render_json(&snapshot)?
        } else {
            render_board(&snapshot)
        };
        if let Err(e) = save_report(path, &body).await {
            fail("Writing the report failed", &e);
        }
    }

    Ok(())
}

fn fail(context: &str, e: &DashError) -> ! {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 依錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
