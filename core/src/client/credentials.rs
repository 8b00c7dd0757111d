use md5::{Digest, Md5};
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::error::{preview_body, Result, ZentaoError};

/// Password digest expected by the token endpoint: lowercase hex MD5.
pub fn password_digest(password: &str) -> String {
    hex::encode(Md5::digest(password.as_bytes()))
}

/// Lazily exchanges account credentials for a session token and keeps it for
/// the lifetime of the process.
///
/// There is no refresh. If the backend later rejects the token, that shows up
/// as a request error on whichever call hit it.
pub struct Credentials {
    account: String,
    digest: String,
    token: OnceCell<String>,
}

impl Credentials {
    pub fn new(account: impl Into<String>, password: &str) -> Self {
        Self {
            account: account.into(),
            digest: password_digest(password),
            token: OnceCell::new(),
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn cached(&self) -> Option<&str> {
        self.token.get().map(String::as_str)
    }

    pub async fn token(&self, http: &reqwest::Client, base_url: &str) -> Result<String> {
        let token = self
            .token
            .get_or_try_init(|| self.exchange(http, base_url))
            .await?;
        Ok(token.clone())
    }

    async fn exchange(&self, http: &reqwest::Client, base_url: &str) -> Result<String> {
        let url = format!("{}/tokens", base_url);
        tracing::debug!(
            target: "zentao.auth",
            stage = "auth.token.in",
            url = %url,
            account = %self.account
        );
        let resp = http
            .post(&url)
            .json(&serde_json::json!({
                "account": self.account,
                "password": self.digest,
            }))
            .send()
            .await
            .map_err(|err| ZentaoError::Auth {
                status: err.status().map(|s| s.as_u16()),
                body: err.to_string(),
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|err| ZentaoError::Auth {
            status: Some(status.as_u16()),
            body: err.to_string(),
        })?;
        tracing::debug!(target: "zentao.auth", stage = "auth.token.out", status = %status);

        if status.as_u16() != 200 && status.as_u16() != 201 {
            return Err(ZentaoError::Auth {
                status: Some(status.as_u16()),
                body: preview_body(&body),
            });
        }

        let token = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| match v.get("token") {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            });
        token.ok_or_else(|| ZentaoError::Auth {
            status: Some(status.as_u16()),
            body: preview_body(&body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[test]
    fn digest_is_md5_hex() {
        assert_eq!(password_digest("secret"), "5ebe2294ecd0e0f08eab7690d2a6ee69");
        assert_eq!(password_digest(""), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[tokio::test]
    async fn token_is_exchanged_once_and_cached() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/tokens")
            .match_body(Matcher::Json(json!({
                "account": "alice",
                "password": "5ebe2294ecd0e0f08eab7690d2a6ee69"
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token":"tok-1"}"#)
            .expect(1)
            .create_async()
            .await;

        let http = reqwest::Client::new();
        let creds = Credentials::new("alice", "secret");
        assert_eq!(creds.token(&http, &server.url()).await.unwrap(), "tok-1");
        assert_eq!(creds.token(&http, &server.url()).await.unwrap(), "tok-1");
        assert_eq!(creds.cached(), Some("tok-1"));
        m.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_auth_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/tokens")
            .with_status(401)
            .with_body(r#"{"error":"invalid password"}"#)
            .create_async()
            .await;

        let creds = Credentials::new("alice", "wrong");
        let err = creds
            .token(&reqwest::Client::new(), &server.url())
            .await
            .unwrap_err();
        match err {
            ZentaoError::Auth { status, body } => {
                assert_eq!(status, Some(401));
                assert!(body.contains("invalid password"));
            }
            other => panic!("expected auth error, got {other:?}"),
        }
        assert_eq!(creds.cached(), None);
    }

    #[tokio::test]
    async fn missing_token_field_is_auth_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/tokens")
            .with_status(200)
            .with_body(r#"{"result":"ok"}"#)
            .create_async()
            .await;

        let creds = Credentials::new("alice", "secret");
        let err = creds
            .token(&reqwest::Client::new(), &server.url())
            .await
            .unwrap_err();
        assert!(matches!(err, ZentaoError::Auth { status: Some(200), .. }));
    }
}
