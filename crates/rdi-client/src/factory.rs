//! Versioned client factory.
//!
//! The negotiation state machine:
//!
//!   probe -> v2 path:     login (v2 path) -> pipeline listing -> CurrentClient
//!        \-> legacy path: login (legacy path) -> LegacyClient
//!
//! A probe miss silently selects the legacy path. Login failures on either
//! path fold into the one `Unauthorized` error; a pipeline-listing failure
//! after a successful login is `SessionEstablishment` instead, because the
//! credentials were good.

use rdi_protocol::{V1_LOGIN_PATH, V2_LOGIN_PATH};
use tracing::debug;

use crate::auth;
use crate::client::{Credentials, CurrentClient, LegacyClient, RdiClient, RdiInstance};
use crate::error::RdiError;
use crate::http::Transport;
use crate::pipeline;
use crate::probe::{self, ProbeOutcome};

/// Builds ready-to-use RDI clients.
///
/// Holds only the injected `reqwest::Client`; no per-call state, so
/// concurrent `create_client` calls are fully independent and nothing is
/// cached between them.
#[derive(Debug, Clone)]
pub struct RdiClientFactory {
    http: reqwest::Client,
}

impl RdiClientFactory {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Negotiate and authenticate a client for `instance`.
    ///
    /// At most three sequential round-trips: one probe, one login, and (v2
    /// only) one pipeline listing. No retries anywhere. Dropping the
    /// returned future aborts whichever request is in flight; a client
    /// value only exists once the last step has succeeded.
    ///
    /// # Errors
    ///
    /// `RdiError::Unauthorized` when login is rejected, whichever protocol
    /// path was attempted; `RdiError::SessionEstablishment` when login
    /// succeeded but the pipeline listing could not be read.
    pub async fn create_client(
        &self,
        instance: RdiInstance,
        credentials: Credentials,
    ) -> Result<RdiClient, RdiError> {
        let transport = Transport::new(self.http.clone(), instance.url.clone());

        match probe::probe(&transport).await {
            ProbeOutcome::Available { version } => {
                debug!(instance = %instance.id, version = %version, "negotiating v2 session");
                let token = auth::authenticate(&transport, V2_LOGIN_PATH, &credentials)
                    .await
                    .map_err(|_| RdiError::Unauthorized)?;
                let pipelines = pipeline::list_pipelines(&transport, &token)
                    .await
                    .map_err(RdiError::SessionEstablishment)?;
                let selected = pipeline::select_current(&pipelines).map(str::to_owned);
                debug!(instance = %instance.id, pipeline = ?selected, "v2 session established");
                Ok(RdiClient::Current(CurrentClient::new(
                    instance, transport, token, version, selected,
                )))
            }
            ProbeOutcome::Unavailable => {
                debug!(instance = %instance.id, "probe inconclusive, using the legacy protocol");
                let token = auth::authenticate(&transport, V1_LOGIN_PATH, &credentials)
                    .await
                    .map_err(|_| RdiError::Unauthorized)?;
                Ok(RdiClient::Legacy(LegacyClient::new(
                    instance, transport, token,
                )))
            }
        }
    }
}
