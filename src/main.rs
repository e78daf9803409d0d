//! Main entry point for the Session Gateway

use clap::Parser;
use session_gateway::{
    init_logger_with_config, log_info, CookieSessionAuthenticator, Gateway, GatewayConfig,
    GatewayServer, InMemoryClientStore, RouteTable,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yml")]
    config: PathBuf,

    /// Override the configured listen port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = GatewayConfig::load_config(&args.config).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });

    if let Some(port) = args.port {
        config.listen_addr.set_port(port);
    }

    init_logger_with_config(&config.log_level);

    log_info!("🚀 Starting Session Gateway on {}", config.listen_addr);
    log_info!(
        "API prefix: '{}', registration: '{}', credential policy: {:?}",
        config.api_prefix,
        config.auth.registration_id,
        config.auth.credential_policy
    );

    let routes = RouteTable::from_config(&config.routes).unwrap_or_else(|e| {
        eprintln!("Invalid route configuration: {}", e);
        std::process::exit(1);
    });

    if routes.is_empty() {
        log_info!("No routes configured; only /, /health and /whoami will be served");
    }

    // Sessions and tokens are populated by the login flow, which fronts
    // this process and is out of scope here.
    let authenticator = Arc::new(CookieSessionAuthenticator::new(
        config.auth.session_cookie.clone(),
    ));
    let clients = Arc::new(InMemoryClientStore::new());

    let gateway = Gateway::new(config, routes, authenticator, clients);

    if let Err(e) = GatewayServer::new(gateway).start().await {
        eprintln!("Gateway error: {}", e);
        std::process::exit(1);
    }
}
