//! Headless API server entrypoint.

use casedocs_core::config::env_flag_enabled;
use casedocs_core::DEFAULT_PORT;
use casedocs_server::{config::Config, db::Database, serve_router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
    print_config: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" => flags.help = true,
            "--print-config" => flags.print_config = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

/// Render the resolved configuration without token secrets.
fn describe_config(config: &Config) -> String {
    let mut services = config.authorized_services.clone();
    services.sort();
    format!(
        "db_path={}\nport={}\nmax_upload_size={}\nauthorized_services={}\nservice_tokens={} configured",
        config.db_path,
        config.port,
        config.max_upload_size,
        services.join(","),
        config.service_tokens.len()
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "casedocs=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;

    if cli_flags.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();
    if cli_flags.print_config {
        println!("{}", describe_config(&config));
        return Ok(());
    }

    if config.authorized_services.is_empty() {
        tracing::warn!("AUTHORIZED_SERVICES is empty - every folder request will be refused");
    }

    let database = Database::new(&config.db_path)?;
    let state = AppState::new(config.clone(), database);

    let allow_public = env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    if allow_public {
        tracing::warn!("Public access enabled - server will accept requests from any origin");
    }

    let bind_addr = casedocs_server::resolve_bind_address(&config, allow_public);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - ensure proper security measures are in place",
            bind_addr
        );
    }

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("casedocs running at http://{}", actual_addr);

    serve_router(listener, state, allow_public, shutdown_signal()).await?;
    tracing::info!("casedocs stopped");

    Ok(())
}

fn print_help() {
    println!("casedocs folder server\n");
    println!("Usage: casedocs [OPTIONS]\n");
    println!("Options:");
    println!("  --print-config    Print the resolved configuration and exit");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables:");
    println!("  DB_PATH              Database directory (default: ~/.cache/casedocs/db)");
    println!(
        "  PORT                 Server port (default: {})",
        DEFAULT_PORT
    );
    println!("  MAX_UPLOAD_SIZE      Maximum request body in bytes (default: 100MB)");
    println!("  AUTHORIZED_SERVICES  Comma-separated calling services allowed to use the API");
    println!("  SERVICE_TOKENS       Comma-separated token=service pairs");
    println!("  ALLOW_PUBLIC_ACCESS  Allow CORS from any origin and non-loopback binds");
    println!(
        "  BIND                 Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
