//! Capability probe.
//!
//! One read-only request against the v2 info path decides which protocol
//! generation the instance speaks. Legacy instances simply do not have the
//! endpoint, so a miss is ordinary behavior: the probe never surfaces an
//! error, it returns an explicit outcome and the factory branches on it.

use rdi_protocol::{ProtocolGeneration, V2_INFO_PATH, VersionInfo};
use tracing::debug;

use crate::http::Transport;

/// Outcome of probing an instance for v2 support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The info endpoint answered with a non-empty version string.
    Available { version: String },
    /// Probe failed or returned no payload; the instance is assumed to
    /// speak the legacy protocol.
    Unavailable,
}

impl ProbeOutcome {
    /// The generation this outcome selects.
    pub fn generation(&self) -> ProtocolGeneration {
        match self {
            ProbeOutcome::Available { .. } => ProtocolGeneration::V2,
            ProbeOutcome::Unavailable => ProtocolGeneration::V1,
        }
    }
}

/// Probe the instance once. No retries: a single miss is a fallback
/// signal, not a fault. Any transport error, non-2xx status, undecodable
/// body, or null/empty payload collapses to `Unavailable`.
pub async fn probe(transport: &Transport) -> ProbeOutcome {
    match transport.get_json::<Option<VersionInfo>>(V2_INFO_PATH).await {
        Ok(Some(info)) if !info.version.is_empty() => {
            debug!(version = %info.version, "info endpoint answered");
            ProbeOutcome::Available {
                version: info.version,
            }
        }
        Ok(_) => {
            debug!("info endpoint returned an empty payload");
            ProbeOutcome::Unavailable
        }
        Err(e) => {
            debug!(error = %e, "info endpoint did not answer");
            ProbeOutcome::Unavailable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_maps_to_v2() {
        let outcome = ProbeOutcome::Available {
            version: "2.0.1".to_owned(),
        };
        assert_eq!(outcome.generation(), ProtocolGeneration::V2);
    }

    #[test]
    fn unavailable_maps_to_v1() {
        assert_eq!(ProbeOutcome::Unavailable.generation(), ProtocolGeneration::V1);
    }

    /// Nothing is listening on this address; the probe must swallow the
    /// connect failure and report `Unavailable`.
    #[tokio::test]
    async fn connect_failure_is_a_fallback_signal_not_an_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = Transport::new(reqwest::Client::new(), format!("http://{addr}"));
        assert_eq!(probe(&transport).await, ProbeOutcome::Unavailable);
    }
}
