//! Pipeline resolver (v2 only).
//!
//! Lists the instance's configured pipelines and picks out the one flagged
//! current. The listing comes back unmodified; selection is a separate pure
//! rule so it can be tested without a server.

use rdi_protocol::{Pipeline, V2_PIPELINES_PATH};

use crate::error::ApiError;
use crate::http::Transport;
use crate::token::AuthToken;

/// Fetch the raw pipeline list. A failure here, after a successful login,
/// is fatal to v2 session establishment -- the instance claimed v2 support,
/// so this is a genuine error rather than a fallback trigger.
pub async fn list_pipelines(
    transport: &Transport,
    token: &AuthToken,
) -> Result<Vec<Pipeline>, ApiError> {
    transport
        .get_json_authed(V2_PIPELINES_PATH, token.access_token())
        .await
}

/// Name of the first pipeline flagged `current`, if any. A freshly
/// provisioned instance may have none; that leaves the selection unset
/// rather than failing.
pub fn select_current(pipelines: &[Pipeline]) -> Option<&str> {
    pipelines.iter().find(|p| p.current).map(|p| p.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline(name: &str, current: bool) -> Pipeline {
        Pipeline {
            name: name.to_owned(),
            active: current,
            config: serde_json::Value::Null,
            status: String::new(),
            errors: Vec::new(),
            components: serde_json::Value::Null,
            current,
        }
    }

    #[test]
    fn selects_the_current_pipeline() {
        let list = vec![pipeline("idle", false), pipeline("orders", true)];
        assert_eq!(select_current(&list), Some("orders"));
    }

    #[test]
    fn first_current_wins_when_the_remote_misbehaves() {
        let list = vec![pipeline("a", true), pipeline("b", true)];
        assert_eq!(select_current(&list), Some("a"));
    }

    #[test]
    fn no_current_pipeline_selects_nothing() {
        let list = vec![pipeline("idle", false)];
        assert_eq!(select_current(&list), None);
        assert_eq!(select_current(&[]), None);
    }
}
