#![cfg_attr(not(test), deny(clippy::panic))]

use std::net::SocketAddr;

use clap::Parser;
use symbol_snap_server::config;
use symbol_snap_server::logging;
use symbol_snap_server::server::GameServer;
use symbol_snap_server::websocket;

/// Symbol Snap -- authoritative WebSocket room server for real-time
/// symbol-matching card games
#[derive(Parser, Debug)]
#[command(name = "symbol-snap-server")]
#[command(about = "An authoritative WebSocket room server for real-time symbol-matching games")]
#[command(version)]
struct Cli {
    /// Validate configuration and exit without starting the server.
    /// Useful for CI/CD pipelines and pre-deployment checks.
    #[arg(long, short = 'c', conflicts_with = "print_config")]
    validate_config: bool,

    /// Print the loaded configuration to stdout (as JSON) and exit.
    /// Useful for debugging configuration loading from multiple sources.
    #[arg(long, conflicts_with = "validate_config")]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration from config.json if present; otherwise use code defaults.
    let cfg = config::load();

    // Handle --print-config: output the loaded configuration as JSON
    if cli.print_config {
        let json = serde_json::to_string_pretty(&cfg)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    // config::load() already validates but only logs to stderr and
    // continues. Re-run so --validate-config gets a proper exit code and
    // normal startup fails hard on a broken config.
    let validation_result = config::validate_config(&cfg);

    if cli.validate_config {
        match validation_result {
            Ok(()) => {
                println!("Configuration validation passed");
                println!();
                println!("Configuration summary:");
                println!("  Port: {}", cfg.port);
                println!("  Countdown: {} s", cfg.server.countdown_seconds);
                println!("  Disconnect grace: {} ms", cfg.server.disconnect_grace_ms);
                println!("  Rejoin window: {} ms", cfg.server.rejoin_window_ms);
                println!("  Room idle timeout: {} ms", cfg.server.room_idle_ms);
                println!("  CORS origins: {}", cfg.security.cors_origins);
                return Ok(());
            }
            Err(e) => {
                eprintln!("Configuration validation failed:\n{e}");
                std::process::exit(1);
            }
        }
    }

    validation_result?;

    // Initialize logging from config.
    logging::init_with_config(&cfg.logging);

    let port: u16 = cfg.port;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "Starting Symbol Snap server");

    let cors_origins = cfg.security.cors_origins.clone();
    let game_server = GameServer::new(cfg);

    // Start directory maintenance task
    let cleanup_server = game_server.clone();
    tokio::spawn(async move {
        cleanup_server.cleanup_task().await;
    });

    let app = websocket::create_router(&cors_origins)
        .fallback(|| async {
            "Symbol Snap Server. Connect via /ws/{room_code} (optionally ?reconnectId=<playerId>)."
        })
        .with_state(game_server);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        cors_origins = %cors_origins,
        "Server started - WebSocket endpoint: /ws/{{room_code}}"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
