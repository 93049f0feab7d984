use clap::Parser;
use vatlayer_migrate::app::{self, RunOptions, RunOutcome};
use vatlayer_migrate::utils::error::ErrorSeverity;
use vatlayer_migrate::utils::{logger, validation::Validate};
use vatlayer_migrate::CliConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting vatlayer-migrate CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let options = RunOptions {
        monitor: config.monitor,
        dry_run: config.dry_run,
        reverse: config.reverse,
    };
    if options.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    match app::run(config, options).await {
        Ok(RunOutcome::Applied {
            report,
            output_path,
            files,
        }) => {
            tracing::info!("✅ Migration completed ({:?})", report.state);
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
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

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
