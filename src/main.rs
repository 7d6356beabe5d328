use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use ncbi_agent::commands;
use ncbi_agent::config::AppConfig;
use ncbi_agent::routes::configure_routes;
use ncbi_agent::state::AppState;
use ncbi_agent::store::{Store, StoreConfig};

#[derive(Parser)]
#[command(name = "ncbi-agent", about = "Research chat gateway for a local Ollama runtime")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP/websocket server
    Serve,
    /// Seed the configuration table with default parameter rows
    InitConfig,
    /// Probe the Ollama runtime and the configured models
    Doctor {
        /// Replace configured-but-missing models with an installed one
        #[arg(long)]
        fix: bool,
    },
    /// Create a user account and print its authentication token
    CreateUser {
        username: String,
        /// Grant access to the admin API
        #[arg(long)]
        staff: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let app_config = AppConfig::from_env();

    let store_config = match StoreConfig::from_connection_string(&app_config.database_url) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid DATABASE_URL: {}", e);
            std::process::exit(1);
        }
    };
    let store = match Store::connect(store_config).await {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to connect to the database: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            if let Err(e) = store.ensure_schema().await {
                eprintln!("Schema setup failed: {}", e);
                std::process::exit(1);
            }
            let state = AppState::new(store);
            info!(addr = %app_config.bind_addr, "starting server");
            warp::serve(configure_routes(state))
                .run(app_config.bind_addr)
                .await;
        }
        Command::InitConfig => {
            if let Err(e) = commands::init_config(&store).await {
                eprintln!("init-config failed: {}", e);
                std::process::exit(1);
            }
        }
        Command::Doctor { fix } => {
            let state = AppState::new(store);
            if !commands::doctor(&state.settings, fix).await {
                std::process::exit(1);
            }
        }
        Command::CreateUser { username, staff } => {
            if let Err(e) = store.ensure_schema().await {
                eprintln!("Schema setup failed: {}", e);
                std::process::exit(1);
            }
            let token = Uuid::new_v4().to_string();
            match store.create_user(&username, &token, staff).await {
                Ok(user) => {
                    println!("Created user '{}' (staff: {})", user.username, user.is_staff);
                    println!("Token: {}", token);
                }
                Err(e) => {
                    eprintln!("Failed to create user: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}
