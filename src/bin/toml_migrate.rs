use clap::Parser;
use vatlayer_migrate::app::{self, RunOptions, RunOutcome};
use vatlayer_migrate::core::ConfigProvider;
use vatlayer_migrate::utils::error::ErrorSeverity;
use vatlayer_migrate::utils::{logger, validation::Validate};
use vatlayer_migrate::TomlConfig;

#[derive(Parser)]
#[command(name = "toml-migrate")]
#[command(about = "Run the vatlayer migration from a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "migrate-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the dry run setting from config
    #[arg(long)]
    dry_run: Option<bool>,

    /// Run the reverse migration (no-op)
    #[arg(long)]
    reverse: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
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

    if config.log_json() {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!(
        "Snapshot: {}, plugin: {}, zero-rate class: '{}'",
        config.snapshot_path(),
        config.plugin_identifier(),
        config.zero_rate_tax_class()
    );

    let options = RunOptions {
        monitor: args.monitor.unwrap_or_else(|| config.monitoring_enabled()),
        dry_run: args.dry_run.unwrap_or_else(|| config.is_dry_run()),
        reverse: args.reverse,
    };

    match app::run(config, options).await {
        Ok(RunOutcome::Applied {
            report,
            output_path,
            files,
        }) => {
            println!("✅ Migration completed ({:?})", report.state);
            println!("📁 Output saved to: {} ({})", output_path, files.join(", "));
        }
        Ok(RunOutcome::DryRun { report }) => {
            println!("🔍 Dry run finished: {}", serde_json::to_string_pretty(&report)?);
        }
        Ok(RunOutcome::Reverted) => {
            println!("⏪ Nothing to revert, the reverse migration is a no-op");
        }
        Err(e) => {
            tracing::error!(
                "❌ Migration failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
