use price_relay::config::RelayConfig;
use price_relay::transport::http::start_http_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let port = parse_args(&args);

    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut config = RelayConfig::from_env()?;
    if let Some(port) = port {
        config = config.with_port(port);
    }

    tracing::info!("Starting price relay on {}...", config.addr);

    let addr = config.addr;
    if let Err(e) = start_http_server(config).await {
        tracing::error!("Price relay failed on {}: {}", addr, e);
        std::process::exit(1);
    }

    Ok(())
}

/// Parse command-line arguments
///
/// Returns the `--port` override, if given.
fn parse_args(args: &[String]) -> Option<u16> {
    let mut port = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                match args.get(i + 1).map(|raw| raw.parse::<u16>()) {
                    Some(Ok(value)) => port = Some(value),
                    _ => {
                        eprintln!("--port requires a number between 0 and 65535");
                        print_usage();
                        std::process::exit(1);
                    }
                }
                i += 1;
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    port
}

/// Print usage information
fn print_usage() {
    println!("Price Relay - polls BTC prices and pushes them to WebSocket clients");
    println!();
    println!("USAGE:");
    println!("    price-relay [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --port <PORT>       Port to listen on (default: 3000)");
    println!("    --help, -h          Print this help message");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    RELAY_HOST                  Bind address (default: 0.0.0.0)");
    println!("    RELAY_PORT                  Port (default: 3000, overridden by --port)");
    println!("    PRICE_API_BASE_URL          Price API base URL (default: https://min-api.cryptocompare.com)");
    println!("    PRICE_FETCH_INTERVAL_SECS   Seconds between fetches (default: 60)");
    println!("    PRICE_FETCH_TIMEOUT_SECS    Fetch timeout in seconds (default: 10)");
    println!("    RELAY_INDEX_HTML            Page served at / (default: index.html)");
    println!("    RELAY_BROADCAST_ON_UPDATE   Push each fresh quote to all clients (default: false)");
    println!("    RUST_LOG                    Logging level (default: info)");
    println!();
    println!("EXAMPLES:");
    println!("    # Start on the default port");
    println!("    price-relay");
    println!();
    println!("    # Push the cached price to user u1");
    println!("    curl http://localhost:3000/pushPrices/u1");
}
