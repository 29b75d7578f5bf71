//! relay-dispatch server binary.
//!
//! ```text
//!     Client ──▶ net::listener ──▶ http::server ──▶ http::dispatch ──▶ routing::router
//!                (permit gate)     (serial loop)    (body, session)    (handler / static / error path)
//! ```

use std::path::PathBuf;

use clap::Parser;
use serde_json::json;

use relay_dispatch::config::{load_config, ServerConfig};
use relay_dispatch::lifecycle::{shutdown_on_ctrl_c, Shutdown};
use relay_dispatch::observability::{init_tracing, tracing_sink};
use relay_dispatch::{HandlerFault, HttpServer, Response, Route};

#[derive(Parser)]
#[command(name = "relay-dispatch")]
#[command(about = "Serial HTTP dispatch server", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(port) = cli.port {
        config.listener.port = port;
    }

    init_tracing(&config.observability.log_level)?;

    tracing::info!("relay-dispatch v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        port = config.listener.port,
        max_connections = ?config.listener.max_connections,
        error_handler_path = ?config.error_handler_path(),
        "Configuration loaded"
    );

    let server = HttpServer::bind(&config, demo_routes(), Some(tracing_sink())).await?;
    tracing::info!(address = %server.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown_on_ctrl_c(shutdown.clone());
    server.run(shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn demo_routes() -> Vec<Route> {
    vec![
        Route::get("/", |_| Ok(Response::html("<h1>relay-dispatch</h1>"))),
        Route::get("/items/{id}", |ctx| {
            let id = ctx.request().route_param("id").unwrap_or_default();
            Ok(Response::json(200, &json!({ "id": id }))?)
        }),
        Route::post("/items", |ctx| {
            ctx.log("item submitted");
            Ok(Response::json(201, ctx.request().body())?)
        }),
        Route::get("/visits", |ctx| {
            let visits = ctx
                .session()
                .get("visits")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(0)
                + 1;
            ctx.session().insert("visits", visits.to_string());
            Ok(Response::text(200, visits.to_string()))
        }),
        Route::get("/fail", |_| Err(HandlerFault::msg("requested failure"))),
        Route::get("/error", |ctx| {
            let reason = ctx.fault().map(ToString::to_string).unwrap_or_default();
            Ok(Response::json(500, &json!({ "error": reason }))?)
        }),
    ]
}
