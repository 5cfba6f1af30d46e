//! Service account login

use serde_json::Value;

use crate::backend::{endpoints, Session};
use crate::common::{Error, Result};

/// Exchange the service account key held by `session` for a session token
/// and attach it to the session
///
/// A single attempt. Any failure, whether transport, status or payload,
/// collapses into [`Error::LoginFailed`].
pub async fn login(session: &mut Session<'_>) -> Result<()> {
    let reply = match session.post(&endpoints::login(), None).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(error = %e, "Login request failed");
            return Err(Error::LoginFailed);
        }
    };

    if reply.status != 200 {
        tracing::warn!(status = reply.status, "Login rejected");
        return Err(Error::LoginFailed);
    }

    let token = reply
        .json::<Value>()
        .ok()
        .as_ref()
        .and_then(token_from_payload)
        .ok_or_else(|| {
            tracing::warn!("Login response did not carry a token");
            Error::LoginFailed
        })?;

    session.authorize(token);
    tracing::info!("Logged in service account");
    Ok(())
}

/// The backend returns the token as a bare JSON string; an object with an
/// `auth_token` or `access_token` field is accepted as well.
fn token_from_payload(payload: &Value) -> Option<String> {
    let token = match payload {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map
            .get("auth_token")
            .or_else(|| map.get("access_token"))
            .and_then(Value::as_str)?,
        _ => return None,
    };
    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::scripted::ScriptedTransport;
    use crate::backend::Reply;

    #[tokio::test]
    async fn test_login_attaches_token() {
        let transport = ScriptedTransport::new()
            .on_post("/auth/login_service_account", Reply::new(200, r#""jwt-token""#))
            .on_get("/probe", Reply::new(200, "{}"));
        let mut session = Session::new(&transport, "sa-key");

        login(&mut session).await.unwrap();
        session.get("/probe").await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].bearer, "sa-key");
        assert_eq!(requests[0].body, None);
        assert_eq!(requests[1].bearer, "jwt-token");
    }

    #[tokio::test]
    async fn test_login_accepts_token_object() {
        let transport = ScriptedTransport::new().on_post(
            "/auth/login_service_account",
            Reply::new(200, r#"{"auth_token": "123"}"#),
        );
        let mut session = Session::new(&transport, "sa-key");
        assert!(login(&mut session).await.is_ok());
    }

    #[tokio::test]
    async fn test_login_rejected_status() {
        let transport = ScriptedTransport::new()
            .on_post("/auth/login_service_account", Reply::new(401, r#""jwt-token""#));
        let mut session = Session::new(&transport, "sa-key");
        assert!(matches!(login(&mut session).await, Err(Error::LoginFailed)));
    }

    #[tokio::test]
    async fn test_login_invalid_payload() {
        let transport = ScriptedTransport::new()
            .on_post("/auth/login_service_account", Reply::new(200, "<html>oops</html>"));
        let mut session = Session::new(&transport, "sa-key");
        assert!(matches!(login(&mut session).await, Err(Error::LoginFailed)));
    }

    #[tokio::test]
    async fn test_login_transport_error() {
        let transport = ScriptedTransport::new();
        let mut session = Session::new(&transport, "sa-key");
        assert!(matches!(login(&mut session).await, Err(Error::LoginFailed)));
    }
}
