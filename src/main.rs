use clap::Parser;
use users_fallback::config::LogFormat;
use users_fallback::utils::{logger, validation::Validate};
use users_fallback::{app, CliArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    match config.logging.format {
        LogFormat::Compact => logger::init_cli_logger(config.logging.verbose),
        LogFormat::Json => logger::init_json_logger(config.logging.verbose),
    }

    tracing::info!("Starting users-fallback");
    tracing::debug!("Effective config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = app::run(config).await {
        tracing::error!(
            "❌ Server failed: {} (Category: {:?})",
            e,
            e.category()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        return Err(e.into());
    }

    Ok(())
}
