//! Auth session builder.
//!
//! Exchanges credentials for a bearer token via the generation-specific
//! login path. Failures surface raw from here; the factory folds them into
//! the uniform `Unauthorized` error so callers cannot tell from the error
//! which generation was attempted.

use rdi_protocol::{LoginRequest, LoginResponse};
use tracing::debug;

use crate::client::Credentials;
use crate::error::ApiError;
use crate::http::Transport;
use crate::token::AuthToken;

/// POST credentials to `login_path` and decode the expiry out of the
/// returned token. Credentials are used for this one exchange and never
/// stored.
pub async fn authenticate(
    transport: &Transport,
    login_path: &str,
    credentials: &Credentials,
) -> Result<AuthToken, ApiError> {
    let body = LoginRequest {
        username: credentials.username.clone(),
        password: credentials.password.clone(),
    };
    let resp: LoginResponse = transport.post_json(login_path, &body).await?;
    let token = AuthToken::from_jwt(resp.access_token)?;
    debug!(
        path = login_path,
        expires_at = token.expires_at(),
        "login accepted"
    );
    Ok(token)
}
