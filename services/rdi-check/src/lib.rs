//! Library entry for the `rdi-check` binary.
//!
//! One negotiation against a live instance, summarized into a report the
//! binary prints. Kept out of `main.rs` so tests can drive it in-process
//! against a mock instance.

use std::time::Duration;

use rdi_client::{Credentials, RdiClient, RdiClientFactory, RdiError, RdiInstance};
use rdi_protocol::ProtocolGeneration;

/// Outcome of one successful negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub generation: ProtocolGeneration,
    /// Full version string, v2 instances only.
    pub version: Option<String>,
    pub selected_pipeline: Option<String>,
    pub token_expires_at: i64,
    pub token_stale: bool,
}

/// Negotiate once against `url` and summarize the produced client.
pub async fn run_check(
    url: &str,
    username: &str,
    password: &str,
    timeout: Duration,
) -> Result<CheckReport, RdiError> {
    let http = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(rdi_client::ApiError::Http)?;

    let factory = RdiClientFactory::new(http);
    let instance = RdiInstance {
        id: "rdi-check".to_owned(),
        name: "rdi-check".to_owned(),
        url: url.to_owned(),
    };
    let credentials = Credentials {
        username: username.to_owned(),
        password: password.to_owned(),
    };

    let client = factory.create_client(instance, credentials).await?;
    let report = match &client {
        RdiClient::Current(c) => CheckReport {
            generation: ProtocolGeneration::V2,
            version: Some(c.version().to_owned()),
            selected_pipeline: c.selected_pipeline().map(str::to_owned),
            token_expires_at: client.token().expires_at(),
            token_stale: client.is_token_stale(),
        },
        RdiClient::Legacy(_) => CheckReport {
            generation: ProtocolGeneration::V1,
            version: None,
            selected_pipeline: None,
            token_expires_at: client.token().expires_at(),
            token_stale: client.is_token_stale(),
        },
    };
    Ok(report)
}
