use bluebikes_traffic::core::time_filter::selection_label;
use bluebikes_traffic::core::ConfigProvider;
use bluebikes_traffic::utils::validation::is_remote;
use bluebikes_traffic::utils::{logger, validation::Validate};
use bluebikes_traffic::{LocalStorage, TomlConfig, TrafficEngine, TrafficPipeline};
use clap::Parser;

#[derive(Parser)]
#[command(name = "toml-traffic")]
#[command(about = "Station traffic pipeline driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "traffic-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_logger(config.log_format(), args.verbose);
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config);
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = TrafficPipeline::new(storage, config);
    let engine = TrafficEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Traffic pipeline completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Traffic pipeline failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn describe_source(location: &str) -> &'static str {
    if is_remote(location) {
        "remote"
    } else {
        "local"
    }
}

fn display_config_summary(config: &TomlConfig) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );
    if let Some(description) = &config.pipeline.description {
        println!("  Description: {}", description);
    }
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📡 Data Sources:");
    println!(
        "  Stations ({}): {} at {}",
        describe_source(config.stations_source()),
        config.stations_source(),
        config.station_path()
    );
    println!(
        "  Trips ({}): {}",
        describe_source(config.trips_source()),
        config.trips_source()
    );
    for route in config.route_sources() {
        println!(
            "  Route layer {} ({}): {}",
            route.id,
            describe_source(&route.location),
            route.location
        );
    }
    println!("  Timeout: {}s", config.request_timeout_seconds());

    println!();
    println!("🕒 Time Selections:");
    for &minutes in config.time_selections() {
        println!("  {} -> {}", minutes, selection_label(minutes));
    }

    println!();
    println!("✅ Dry run analysis complete.");
}
