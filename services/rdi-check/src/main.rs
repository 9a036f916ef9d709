use std::time::Duration;

use clap::{Arg, Command};
use rdi_check::run_check;
use rdi_client::RdiError;
use rdi_protocol::ProtocolGeneration;
use tracing::info;

fn validate_timeout_value(value: &str) -> Result<u64, String> {
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err("timeout must be a positive number of seconds".to_owned()),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let matches = Command::new("rdi-check")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Probe an RDI instance, authenticate, and report the negotiated session")
        .arg(
            Arg::new("url")
                .help("Base URL of the RDI management API")
                .short('u')
                .long("url")
                .required(true),
        )
        .arg(
            Arg::new("username")
                .help("Login username")
                .long("username")
                .default_value("default"),
        )
        .arg(
            Arg::new("password")
                .help("Login password (falls back to RDI_PASSWORD)")
                .long("password"),
        )
        .arg(
            Arg::new("timeout")
                .help("Per-request timeout in seconds")
                .long("timeout-secs")
                .value_parser(validate_timeout_value)
                .default_value("10"),
        )
        .get_matches();

    let url = matches
        .get_one::<String>("url")
        .expect("url is required by clap");
    let username = matches
        .get_one::<String>("username")
        .expect("username has a default");
    let password = match matches
        .get_one::<String>("password")
        .cloned()
        .or_else(|| std::env::var("RDI_PASSWORD").ok())
    {
        Some(p) => p,
        None => {
            eprintln!("FATAL: no password given; pass --password or set RDI_PASSWORD");
            std::process::exit(2);
        }
    };
    let timeout = Duration::from_secs(
        *matches
            .get_one::<u64>("timeout")
            .expect("timeout has a default"),
    );

    info!(url = %url, "negotiating");

    match run_check(url, username, &password, timeout).await {
        Ok(report) => {
            match report.generation {
                ProtocolGeneration::V2 => println!(
                    "protocol: v2 ({})",
                    report.version.as_deref().unwrap_or("unknown")
                ),
                ProtocolGeneration::V1 => println!("protocol: legacy"),
            }
            match report.selected_pipeline.as_deref() {
                Some(name) => println!("current pipeline: {name}"),
                None if report.generation == ProtocolGeneration::V2 => {
                    println!("current pipeline: none");
                }
                None => {}
            }
            let expiry = chrono::DateTime::from_timestamp(report.token_expires_at, 0)
                .map_or_else(|| report.token_expires_at.to_string(), |t| t.to_rfc3339());
            println!(
                "token expires: {expiry}{}",
                if report.token_stale { " (already stale)" } else { "" }
            );
        }
        Err(RdiError::Unauthorized) => {
            eprintln!("cannot connect with these credentials");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    }
}
