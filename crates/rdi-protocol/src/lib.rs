// rdi-protocol: Wire types for the RDI management API.
//
// Covers both generations of the protocol. The v2 surface (info, login,
// pipelines) and the legacy surface (login only) share these shapes; the
// endpoint path constants live here too so the client core, the mock
// server, and the CLI cannot drift apart.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Endpoint paths
// ---------------------------------------------------------------------------

/// v2 "describe yourself" endpoint, used by the capability probe.
pub const V2_INFO_PATH: &str = "/api/v1/info";
/// v2 login endpoint.
pub const V2_LOGIN_PATH: &str = "/api/v1/login";
/// v2 pipelines listing endpoint.
pub const V2_PIPELINES_PATH: &str = "/api/v1/pipelines";
/// Legacy login endpoint. Legacy instances expose no info or pipelines
/// endpoints at all.
pub const V1_LOGIN_PATH: &str = "/login";

// ---------------------------------------------------------------------------
// Probe
// ---------------------------------------------------------------------------

/// Payload returned by the v2 info endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
}

/// The major protocol generation a negotiated client speaks.
///
/// Any non-empty probed version string maps to `V2`; a failed probe or an
/// empty payload maps to `V1`. The full version string is never interpreted
/// beyond that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolGeneration {
    V1,
    V2,
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Login request body, identical for both generations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response body. `access_token` is a compact JWT carrying at least
/// an `exp` claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

// ---------------------------------------------------------------------------
// Pipelines (v2 only)
// ---------------------------------------------------------------------------

/// One entry from the v2 pipelines listing.
///
/// `config` and `components` are deployment-defined documents this core
/// never interprets; they stay as raw JSON. Everything except `name` is
/// optional on the wire -- a freshly provisioned instance reports sparse
/// entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub config: serde_json::Value,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub components: serde_json::Value,
    /// At most one pipeline is flagged current at a time; zero is legal.
    #[serde(default)]
    pub current: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_tolerates_sparse_entries() {
        let p: Pipeline = serde_json::from_str(r#"{"name":"pipeline-1"}"#).unwrap();
        assert_eq!(p.name, "pipeline-1");
        assert!(!p.active);
        assert!(!p.current);
        assert!(p.errors.is_empty());
        assert_eq!(p.config, serde_json::Value::Null);
    }

    #[test]
    fn pipeline_reads_full_entries() {
        let p: Pipeline = serde_json::from_str(
            r#"{
                "name": "orders",
                "active": true,
                "config": {"sources": {}},
                "status": "running",
                "errors": ["stale snapshot"],
                "components": {"processor": "ok"},
                "current": true
            }"#,
        )
        .unwrap();
        assert!(p.active);
        assert!(p.current);
        assert_eq!(p.status, "running");
        assert_eq!(p.errors, vec!["stale snapshot".to_owned()]);
    }

    #[test]
    fn version_info_round_trips() {
        let info = VersionInfo {
            version: "2.0.1".to_owned(),
        };
        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(json, r#"{"version":"2.0.1"}"#);
        let back: VersionInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, info);
    }

    #[test]
    fn login_request_serializes_both_fields() {
        let req = LoginRequest {
            username: "default".to_owned(),
            password: "secret".to_owned(),
        };
        let v: serde_json::Value = serde_json::to_value(&req).unwrap();
        assert_eq!(v["username"], "default");
        assert_eq!(v["password"], "secret");
    }
}
