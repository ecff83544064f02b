//! proanalytics CLI: query the Pro Analytics API from the terminal.
//!
//! Usage:
//! ```bash
//! # Version of the mainnet production API
//! proanalytics version
//!
//! # Staging API for the Pegasus testnet
//! proanalytics version --chain 1891 --env staging
//!
//! # Explicit base URL, or a JSON client config
//! proanalytics version --url http://localhost:8080
//! proanalytics version --config client.json
//!
//! # List supported networks and their default endpoints
//! proanalytics chains
//! ```

use std::env;
use std::process;

use anyhow::{bail, Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use proanalytics_core::{
    default_base_url, ApiBaseUrls, Environment, PartialApiContext, SupportedChainId,
};
use proanalytics_http::{ClientConfig, ProAnalyticsClient};

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    init_tracing(args.iter().any(|a| a == "--json-logs"));

    let result = match args[1].as_str() {
        "version" => cmd_version(&args[2..]).await,
        "chains" => {
            cmd_chains();
            Ok(())
        }
        "--version" | "-V" => {
            println!("proanalytics {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_usage() {
    println!("proanalytics {}", env!("CARGO_PKG_VERSION"));
    println!("Query the Pro Analytics API\n");
    println!("USAGE:");
    println!("    proanalytics <COMMAND> [FLAGS]\n");
    println!("COMMANDS:");
    println!("    version    Print the API version");
    println!("    chains     List supported networks and default endpoints");
    println!("    --version  Print CLI version");
    println!("    help       Print this help\n");
    println!("VERSION FLAGS:");
    println!("    --chain <ID|NAME>      Network  [default: 1890]");
    println!("    --env <prod|staging>   Environment  [default: prod]");
    println!("    --url <URL>            Base URL, bypasses the built-in tables");
    println!("    --config <FILE>        JSON client config\n");
    println!("GLOBAL FLAGS:");
    println!("    --json-logs            Emit logs as JSON (level via RUST_LOG)");
}

async fn cmd_version(args: &[String]) -> Result<()> {
    let mut config = match parse_flag(args, "--config") {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            ClientConfig::from_json(&raw)?
        }
        None => ClientConfig::default(),
    };

    if let Some(chain) = parse_flag(args, "--chain") {
        config.chain_id = Some(chain.parse::<SupportedChainId>()?);
    }
    if let Some(env) = parse_flag(args, "--env") {
        config.env = Some(env.parse::<Environment>()?);
    }
    if let Some(url) = parse_flag(args, "--url") {
        if url.is_empty() {
            bail!("--url must not be empty");
        }
        config.base_urls = Some(ApiBaseUrls::uniform(url));
    }

    let client = ProAnalyticsClient::from_config(&config)?;
    let target = client.base_url(&PartialApiContext::default())?;
    tracing::info!(
        chain_id = client.context().chain_id.chain_id(),
        env = %client.context().env,
        endpoint = %target,
        "querying API version"
    );

    let start = std::time::Instant::now();
    let version = client.get_version(&PartialApiContext::default()).await?;
    let latency = start.elapsed();

    println!("  Network:  {}", client.context().chain_id);
    println!("  Env:      {}", client.context().env);
    println!("  Endpoint: {target}");
    println!("  Version:  {version}");
    println!("  Latency:  {}ms", latency.as_millis());
    Ok(())
}

fn cmd_chains() {
    println!("Supported networks:\n");
    for chain in SupportedChainId::ALL {
        let kind = if chain.is_testnet() { "testnet" } else { "mainnet" };
        println!("  {:<20} {:>9}  {kind}", chain.name(), chain.chain_id());
        for env in Environment::ALL {
            println!("    {:<8} {}", env.as_str(), default_base_url(env, chain));
        }
        println!();
    }
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1).cloned()
}
