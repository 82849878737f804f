//! Taskdesk Web Server
//!
//! Task management API for employers and employees.

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::BufRead;
use taskdesk_core::{LogFormat, LoggingConfig};
use taskdesk_store::DatabaseConfig;
use taskdesk_web::auth::hash_password;
use taskdesk_web::server::TaskdeskServerBuilder;
use taskdesk_web::{init_logging, WebConfig};
use tracing::info;

/// Taskdesk Web Server - task assignment and tracking API
#[derive(Parser)]
#[command(name = "taskdesk-web")]
#[command(about = "Task management API for employers and employees")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (the default)
    Serve(ServeArgs),
    /// Print an Argon2 hash to store in auth.users.password
    HashPassword {
        /// Password to hash; read from stdin when omitted
        password: Option<String>,
    },
}

#[derive(clap::Args, Default)]
struct ServeArgs {
    /// Server host to bind to (overrides HOST_PORT)
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on (overrides HOST_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (error, warn, info, debug, trace); overrides LOG_LEVEL
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogOutput::Compact)]
    log_format: LogOutput,

    /// PostgreSQL host (overrides PG_HOST)
    #[arg(long)]
    pg_host: Option<String>,

    /// PostgreSQL port (overrides PG_PORT)
    #[arg(long)]
    pg_port: Option<u16>,

    /// PostgreSQL database name (overrides PG_DATABASE)
    #[arg(long)]
    pg_database: Option<String>,
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum LogOutput {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl From<LogOutput> for LogFormat {
    fn from(output: LogOutput) -> Self {
        match output {
            LogOutput::Compact => LogFormat::Compact,
            LogOutput::Pretty => LogFormat::Pretty,
            LogOutput::Json => LogFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load environment variables
    dotenvy::dotenv().ok();

    match args.command {
        Some(Command::HashPassword { password }) => print_hash(password),
        Some(Command::Serve(serve)) => run_server(serve).await,
        None => run_server(ServeArgs::default()).await,
    }
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let mut logging = LoggingConfig::from_env();
    if let Some(level) = args.log_level {
        logging.level = level;
    }
    logging.format = args.log_format.into();
    init_logging(&logging).context("initializing logging")?;

    let mut config = WebConfig::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let mut database = DatabaseConfig::from_env();
    if let Some(host) = args.pg_host {
        database.host = host;
    }
    if let Some(port) = args.pg_port {
        database.port = port;
    }
    if let Some(name) = args.pg_database {
        database.database = name;
    }

    info!(
        address = %config.address(),
        log_level = %logging.level,
        pg_host = %database.host,
        pg_database = %database.database,
        "starting taskdesk"
    );

    let server = TaskdeskServerBuilder::new()
        .config(config)
        .database(database)
        .build()
        .context("building server")?;

    server.start().await.context("running server")?;
    Ok(())
}

fn print_hash(password: Option<String>) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => {
            let mut line = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .context("reading password from stdin")?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };
    if password.is_empty() {
        return Err(anyhow!("password must not be empty"));
    }

    let hash = hash_password(&password).map_err(|e| anyhow!("failed to hash password: {e}"))?;
    println!("{hash}");
    Ok(())
}
