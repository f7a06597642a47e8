//! reqdispatch - control-plane listener
//!
//! Serves the built-in handlers over the line protocol so the dispatcher can
//! be exercised with `nc` or any TCP client.

use reqdispatch::connection::{handle_connection, ListenerStats};
use reqdispatch::dispatch::RequestManager;
use reqdispatch::handler::{EchoHandler, PingHandler, SharedHandler};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Server configuration
#[derive(Debug)]
struct ServerConfig {
    /// Host to bind to
    host: String,
    /// Port to listen on
    port: u16,
    /// Cancellation deadline applied to every request
    max_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: reqdispatch::DEFAULT_HOST.to_string(),
            port: reqdispatch::DEFAULT_PORT,
            max_timeout: reqdispatch::DEFAULT_MAX_TIMEOUT,
        }
    }
}

impl ServerConfig {
    /// Parse configuration from command-line arguments
    fn from_args() -> Self {
        let mut config = ServerConfig::default();
        let args: Vec<String> = std::env::args().collect();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    config.host = required_value(&args, i, "--host").to_string();
                    i += 2;
                }
                "--port" | "-p" => {
                    config.port = required_value(&args, i, "--port")
                        .parse()
                        .unwrap_or_else(|_| exit_with("invalid port number"));
                    i += 2;
                }
                "--timeout" | "-t" => {
                    let secs: u64 = required_value(&args, i, "--timeout")
                        .parse()
                        .unwrap_or_else(|_| exit_with("invalid timeout, expected whole seconds"));
                    config.max_timeout = Duration::from_secs(secs);
                    i += 2;
                }
                "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("reqdispatch version {}", reqdispatch::VERSION);
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {}", other);
                    print_help();
                    std::process::exit(1);
                }
            }
        }

        config
    }

    /// Returns the bind address as a string
    fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Returns the value following the flag at `i`, or exits.
fn required_value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value.as_str(),
        None => exit_with(&format!("{} requires a value", flag)),
    }
}

fn exit_with(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn print_help() {
    println!(
        r#"
reqdispatch - named request dispatcher

USAGE:
    reqdispatch [OPTIONS]

OPTIONS:
    -h, --host <HOST>       Host to bind to (default: 127.0.0.1)
    -p, --port <PORT>       Port to listen on (default: 7878)
    -t, --timeout <SECS>    Per-request cancellation deadline (default: 60)
    -v, --version           Print version information
        --help              Print this help message

PROTOCOL:
    Send one request per line: NAME [PAYLOAD]
    Each response is: STATUS LEN\r\n followed by LEN payload bytes (LEN -1 = none)

    $ nc 127.0.0.1 7878
    ping
    200 -1
    echo {{"hello":"world"}}
    200 17
    {{"hello":"world"}}

LOGGING:
    Set RUST_LOG to adjust verbosity (default: info)
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_args();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let handlers = vec![
        Arc::new(PingHandler) as SharedHandler,
        Arc::new(EchoHandler) as SharedHandler,
    ];
    let manager = RequestManager::new(handlers, config.max_timeout)?;
    info!(
        handlers = manager.registry().len(),
        timeout_secs = config.max_timeout.as_secs(),
        "Request manager initialized"
    );

    let stats = Arc::new(ListenerStats::new());

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Listening on {}", config.bind_address());

    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received, stopping server...");
    };

    tokio::select! {
        _ = accept_loop(listener, manager.clone(), Arc::clone(&stats)) => {}
        _ = shutdown => {}
    }

    info!(
        connections = stats.connections_accepted(),
        requests = stats.requests_served(),
        deadlines_exceeded = manager.stats().deadlines_exceeded.load(Ordering::Relaxed),
        "Server shutdown complete"
    );
    Ok(())
}

/// Main loop that accepts incoming connections
async fn accept_loop(listener: TcpListener, manager: RequestManager, stats: Arc<ListenerStats>) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let manager = manager.clone();
                let stats = Arc::clone(&stats);

                tokio::spawn(async move {
                    handle_connection(stream, addr, manager, stats).await;
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
