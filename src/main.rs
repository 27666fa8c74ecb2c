use clap::Parser;
use trade_network::app::routes;
use trade_network::utils::error::ErrorSeverity;
use trade_network::utils::{logger, validation::Validate};
use trade_network::{CliConfig, TomlConfig, TradeError};

fn exit_code(e: &TradeError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn report(e: &TradeError) {
    tracing::error!(
        "❌ Server failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 有指定 TOML 時以檔案為準
    let toml = match cli.config.as_deref().map(TomlConfig::from_file).transpose() {
        Ok(toml) => toml,
        Err(e) => {
            logger::init_cli_logger(cli.verbose);
            report(&e);
            std::process::exit(1);
        }
    };

    let json_logs = cli.json_logs || toml.as_ref().is_some_and(|t| t.json_logs());
    let verbose = cli.verbose || toml.as_ref().is_some_and(|t| t.verbose());
    if json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting trade-network");
    if verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    let validated = match &toml {
        Some(toml) => toml.validate(),
        None => cli.validate(),
    };
    if let Err(e) = validated {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let result = match &toml {
        Some(toml) => routes::serve(toml).await,
        None => routes::serve(&cli).await,
    };

    if let Err(e) = result {
        report(&e);
        let code = exit_code(&e);
        if code > 0 {
            std::process::exit(code);
        }
    }
}
