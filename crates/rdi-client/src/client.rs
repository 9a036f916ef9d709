//! The two client shapes produced by negotiation.
//!
//! Callers branch exhaustively on the `RdiClient` enum instead of downcasting.
//! Both shapes own their token; staleness is derived from the `exp` claim at
//! ask time. The business operations a client performs once built live with
//! its callers, not here.

use rdi_protocol::ProtocolGeneration;

use crate::http::Transport;
use crate::token::AuthToken;

/// Identifies which RDI instance is being connected to.
///
/// Passed by value into the factory; the factory never mutates it and keeps
/// no copy after returning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RdiInstance {
    pub id: String,
    pub name: String,
    /// Base URL of the management API, e.g. `https://rdi.example:8443`.
    pub url: String,
}

/// One-shot login credentials. Used to obtain a token, never persisted.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// A client for an instance speaking the legacy protocol.
#[derive(Debug, Clone)]
pub struct LegacyClient {
    instance: RdiInstance,
    transport: Transport,
    token: AuthToken,
}

impl LegacyClient {
    pub(crate) fn new(instance: RdiInstance, transport: Transport, token: AuthToken) -> Self {
        Self {
            instance,
            transport,
            token,
        }
    }
}

/// A client for an instance speaking the v2 protocol, with the currently
/// deployed pipeline already resolved.
#[derive(Debug, Clone)]
pub struct CurrentClient {
    instance: RdiInstance,
    transport: Transport,
    token: AuthToken,
    version: String,
    selected_pipeline: Option<String>,
}

impl CurrentClient {
    pub(crate) fn new(
        instance: RdiInstance,
        transport: Transport,
        token: AuthToken,
        version: String,
        selected_pipeline: Option<String>,
    ) -> Self {
        Self {
            instance,
            transport,
            token,
            version,
            selected_pipeline,
        }
    }

    /// Full version string the instance reported to the probe.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Name of the pipeline flagged current at negotiation time, if any.
    pub fn selected_pipeline(&self) -> Option<&str> {
        self.selected_pipeline.as_deref()
    }
}

/// The product of `create_client`: exactly one of the two shapes, fully
/// authenticated. There is no partially initialized state in between.
#[derive(Debug, Clone)]
pub enum RdiClient {
    Legacy(LegacyClient),
    Current(CurrentClient),
}

impl RdiClient {
    pub fn generation(&self) -> ProtocolGeneration {
        match self {
            RdiClient::Legacy(_) => ProtocolGeneration::V1,
            RdiClient::Current(_) => ProtocolGeneration::V2,
        }
    }

    pub fn instance(&self) -> &RdiInstance {
        match self {
            RdiClient::Legacy(c) => &c.instance,
            RdiClient::Current(c) => &c.instance,
        }
    }

    pub fn transport(&self) -> &Transport {
        match self {
            RdiClient::Legacy(c) => &c.transport,
            RdiClient::Current(c) => &c.transport,
        }
    }

    pub fn token(&self) -> &AuthToken {
        match self {
            RdiClient::Legacy(c) => &c.token,
            RdiClient::Current(c) => &c.token,
        }
    }

    /// Whether the session token has expired. Refreshing it is the
    /// caller's concern.
    pub fn is_token_stale(&self) -> bool {
        self.token().is_stale()
    }
}
