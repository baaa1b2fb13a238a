use anyhow::Result;
use brainly::{BrainConfig, DEFAULT_BCRYPT_COST, DEFAULT_SHARE_TOKEN_LENGTH, DatabaseConfig};
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "brainly")]
#[command(about = "Second-brain link collection service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Bind address, e.g. 0.0.0.0:3000
        #[arg(long, default_value = "0.0.0.0:3000")]
        bind: String,
        #[arg(long, env = "SURREALDB_URL", default_value = "memory")]
        db_url: String,
        /// Secret used to sign bearer tokens
        #[arg(long, env = "BRAINLY_JWT_SECRET")]
        jwt_secret: String,
        #[arg(long, env = "BRAINLY_BCRYPT_COST", default_value_t = DEFAULT_BCRYPT_COST)]
        bcrypt_cost: u32,
        #[arg(long, env = "BRAINLY_SHARE_TOKEN_LENGTH", default_value_t = DEFAULT_SHARE_TOKEN_LENGTH)]
        share_token_length: usize,
        /// Token lifetime in seconds (tokens never expire if omitted)
        #[arg(long, env = "BRAINLY_TOKEN_TTL_SECONDS")]
        token_ttl_seconds: Option<u64>,
    },
    /// Initialize the database schema
    Init {
        #[arg(long, env = "SURREALDB_URL", default_value = "memory")]
        db_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("brainly=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            db_url,
            jwt_secret,
            bcrypt_cost,
            share_token_length,
            token_ttl_seconds,
        } => {
            let db_config = DatabaseConfig {
                url: db_url,
                ..Default::default()
            };
            info!("Using database url for HTTP server: {}", db_config.url);

            let mut config = BrainConfig::new(jwt_secret);
            config.bcrypt_cost = bcrypt_cost;
            config.share_token_length = share_token_length;
            config.token_ttl_seconds = token_ttl_seconds;

            let app = brainly::create_app(db_config, &config).await?;

            let listener = tokio::net::TcpListener::bind(&bind).await?;
            info!("Server listening on http://{}", bind);

            axum::serve(listener, app).await?;
        }
        Commands::Init { db_url } => {
            let db_config = DatabaseConfig {
                url: db_url,
                ..Default::default()
            };
            info!("Using database url for initialization: {}", db_config.url);

            info!("Initializing database...");
            let db = brainly::create_connection(db_config).await?;
            brainly::ensure_schema(&db).await?;
            info!("Database initialized successfully");
        }
    }

    Ok(())
}
