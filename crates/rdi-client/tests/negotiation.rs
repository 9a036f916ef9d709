//! Integration tests for the full negotiation sequence, driven against the
//! mock management service over loopback HTTP.

use rdi_client::{Credentials, RdiClient, RdiClientFactory, RdiError, RdiInstance};
use rdi_protocol::ProtocolGeneration;
use rdi_test_utils::{MockRdiServer, sample_pipeline};

fn instance(url: String) -> RdiInstance {
    RdiInstance {
        id: "inst-01".to_owned(),
        name: "staging".to_owned(),
        url,
    }
}

fn credentials() -> Credentials {
    Credentials {
        username: "default".to_owned(),
        password: "password".to_owned(),
    }
}

fn factory() -> RdiClientFactory {
    RdiClientFactory::new(reqwest::Client::new())
}

/// Probe answers with a version, login succeeds, exactly one pipeline is
/// current: the result is a v2 client with that pipeline selected.
#[tokio::test]
async fn v2_happy_path_selects_the_current_pipeline() {
    let server = MockRdiServer::builder()
        .info_version("2.0.1")
        .pipelines(vec![
            sample_pipeline("idle", false),
            sample_pipeline("pipeline-1", true),
        ])
        .start()
        .await
        .unwrap();

    let client = factory()
        .create_client(instance(server.url()), credentials())
        .await
        .unwrap();

    assert_eq!(client.generation(), ProtocolGeneration::V2);
    match &client {
        RdiClient::Current(c) => {
            assert_eq!(c.version(), "2.0.1");
            assert_eq!(c.selected_pipeline(), Some("pipeline-1"));
        }
        RdiClient::Legacy(_) => panic!("expected a v2 client"),
    }
    assert!(!client.is_token_stale(), "fresh token must not be stale");
    assert_eq!(server.v2_logins(), 1);
    assert_eq!(server.v1_logins(), 0);
    assert_eq!(server.pipeline_hits(), 1);
}

/// Probe gets an HTTP error (here 404: the endpoint does not exist on a
/// legacy instance): negotiation falls back to the legacy login path.
#[tokio::test]
async fn probe_http_error_falls_back_to_legacy() {
    let server = MockRdiServer::builder().start().await.unwrap();

    let client = factory()
        .create_client(instance(server.url()), credentials())
        .await
        .unwrap();

    assert_eq!(client.generation(), ProtocolGeneration::V1);
    assert!(matches!(client, RdiClient::Legacy(_)));
    assert_eq!(server.v1_logins(), 1);
    assert_eq!(server.v2_logins(), 0);
    assert_eq!(server.pipeline_hits(), 0, "legacy path must not list pipelines");
}

/// A 5xx from the info endpoint is the same fallback signal as a 404.
#[tokio::test]
async fn probe_server_error_falls_back_to_legacy() {
    let server = MockRdiServer::builder().info_error(503).start().await.unwrap();

    let client = factory()
        .create_client(instance(server.url()), credentials())
        .await
        .unwrap();

    assert!(matches!(client, RdiClient::Legacy(_)));
    assert_eq!(server.v1_logins(), 1);
}

/// Probe succeeds at the HTTP level but the payload is a JSON null:
/// behavior is identical to a failed probe.
#[tokio::test]
async fn probe_null_payload_falls_back_to_legacy() {
    let server = MockRdiServer::builder().info_null().start().await.unwrap();

    let client = factory()
        .create_client(instance(server.url()), credentials())
        .await
        .unwrap();

    assert!(matches!(client, RdiClient::Legacy(_)));
    assert_eq!(server.info_hits(), 1);
    assert_eq!(server.v1_logins(), 1);
    assert_eq!(server.v2_logins(), 0);
}

/// Rejected credentials on the legacy path surface as `Unauthorized`.
#[tokio::test]
async fn legacy_login_rejection_is_unauthorized() {
    let server = MockRdiServer::builder()
        .credentials("default", "other-password")
        .start()
        .await
        .unwrap();

    let err = factory()
        .create_client(instance(server.url()), credentials())
        .await
        .unwrap_err();

    assert!(matches!(err, RdiError::Unauthorized), "got {err:?}");
}

/// Rejected credentials on the v2 path surface as the *same* error as on
/// the legacy path; nothing about it reveals which generation was tried.
#[tokio::test]
async fn v2_login_rejection_is_the_same_unauthorized() {
    let server = MockRdiServer::builder()
        .info_version("2.0.1")
        .credentials("default", "other-password")
        .start()
        .await
        .unwrap();

    let err = factory()
        .create_client(instance(server.url()), credentials())
        .await
        .unwrap_err();

    assert!(matches!(err, RdiError::Unauthorized), "got {err:?}");
    assert_eq!(err.to_string(), RdiError::Unauthorized.to_string());
}

/// A login response carrying a token the client cannot decode counts as a
/// rejected login, not a transport error.
#[tokio::test]
async fn malformed_token_in_login_response_is_unauthorized() {
    let server = MockRdiServer::builder()
        .info_version("2.0.1")
        .raw_token("not-a-jwt")
        .start()
        .await
        .unwrap();

    let err = factory()
        .create_client(instance(server.url()), credentials())
        .await
        .unwrap_err();

    assert!(matches!(err, RdiError::Unauthorized), "got {err:?}");
}

/// Valid credentials but a failing pipelines listing: the error is
/// distinct from `Unauthorized` because the credentials were good.
#[tokio::test]
async fn pipeline_listing_failure_is_session_establishment() {
    let server = MockRdiServer::builder()
        .info_version("2.0.1")
        .pipelines_error(500)
        .start()
        .await
        .unwrap();

    let err = factory()
        .create_client(instance(server.url()), credentials())
        .await
        .unwrap_err();

    assert!(matches!(err, RdiError::SessionEstablishment(_)), "got {err:?}");
    assert_eq!(server.v2_logins(), 1, "login must have been attempted first");
}

/// Zero pipelines flagged current still yields a v2 client; the selection
/// is simply unset.
#[tokio::test]
async fn no_current_pipeline_leaves_selection_unset() {
    let server = MockRdiServer::builder()
        .info_version("2.1.0")
        .pipelines(vec![sample_pipeline("provisioned-only", false)])
        .start()
        .await
        .unwrap();

    let client = factory()
        .create_client(instance(server.url()), credentials())
        .await
        .unwrap();

    match client {
        RdiClient::Current(c) => assert_eq!(c.selected_pipeline(), None),
        RdiClient::Legacy(_) => panic!("expected a v2 client"),
    }
}

/// Two negotiations with identical inputs are fully independent: same
/// shape, nothing shared or cached between calls.
#[tokio::test]
async fn repeated_negotiation_is_independent() {
    let server = MockRdiServer::builder()
        .info_version("2.0.1")
        .pipelines(vec![sample_pipeline("pipeline-1", true)])
        .start()
        .await
        .unwrap();

    let factory = factory();
    let first = factory
        .create_client(instance(server.url()), credentials())
        .await
        .unwrap();
    let second = factory
        .create_client(instance(server.url()), credentials())
        .await
        .unwrap();

    for client in [&first, &second] {
        match client {
            RdiClient::Current(c) => assert_eq!(c.selected_pipeline(), Some("pipeline-1")),
            RdiClient::Legacy(_) => panic!("expected a v2 client"),
        }
    }
    assert_eq!(server.info_hits(), 2, "each call probes afresh");
    assert_eq!(server.v2_logins(), 2);
    assert_eq!(server.pipeline_hits(), 2);
}

/// An already-expired exp claim makes the produced client report a stale
/// token; construction itself still succeeds.
#[tokio::test]
async fn expired_token_is_reported_stale() {
    let server = MockRdiServer::builder()
        .info_version("2.0.1")
        .token_exp(1_000_000)
        .start()
        .await
        .unwrap();

    let client = factory()
        .create_client(instance(server.url()), credentials())
        .await
        .unwrap();

    assert!(client.is_token_stale());
    assert_eq!(client.token().expires_at(), 1_000_000);
}

/// A version string that is not semver still takes the v2 path; the probe
/// only requires a non-empty version field.
#[tokio::test]
async fn unparseable_version_string_still_selects_v2() {
    let server = MockRdiServer::builder()
        .info_version("edge")
        .start()
        .await
        .unwrap();

    let client = factory()
        .create_client(instance(server.url()), credentials())
        .await
        .unwrap();

    match client {
        RdiClient::Current(c) => assert_eq!(c.version(), "edge"),
        RdiClient::Legacy(_) => panic!("expected a v2 client"),
    }
}

/// Instance metadata passes through to the produced client untouched.
#[tokio::test]
async fn instance_metadata_is_carried_unmodified() {
    let server = MockRdiServer::builder().start().await.unwrap();
    let meta = instance(server.url());

    let client = factory()
        .create_client(meta.clone(), credentials())
        .await
        .unwrap();

    assert_eq!(client.instance(), &meta);
}
