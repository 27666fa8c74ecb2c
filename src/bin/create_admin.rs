use clap::Parser;
use trade_network::core::password::PasswordPolicy;
use trade_network::utils::logger;
use trade_network::{AccountService, LocalStorage};

/// Creates a staff account (or promotes an existing one) in the data directory.
#[derive(Debug, Parser)]
#[command(name = "create_admin")]
#[command(about = "Create or promote a staff account for the admin back-office")]
struct Args {
    #[arg(long)]
    username: String,

    #[arg(long, default_value = "")]
    email: String,

    #[arg(long, env = "TRADE_NETWORK_ADMIN_PASSWORD")]
    password: String,

    #[arg(long, default_value = "./data")]
    data_path: String,

    #[arg(long, default_value = "8")]
    min_password_length: usize,

    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    if let Err(e) = tokio::fs::create_dir_all(&args.data_path).await {
        eprintln!("❌ Cannot create data directory '{}': {}", args.data_path, e);
        std::process::exit(1);
    }

    let storage = LocalStorage::new(&args.data_path);
    let policy = PasswordPolicy::new(args.min_password_length);

    let result = match AccountService::open(storage, policy).await {
        Ok(accounts) => {
            accounts
                .create_admin(&args.username, &args.email, &args.password)
                .await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(user) => {
            tracing::info!("✅ Staff account '{}' ready (id {})", user.username, user.id);
            println!("✅ Staff account '{}' ready", user.username);
        }
        Err(e) => {
            tracing::error!("❌ Failed to create admin: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }
}
