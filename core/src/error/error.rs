use thiserror::Error;

use super::request::RequestError;

pub type Result<T> = std::result::Result<T, ZentaoError>;

#[derive(Error, Debug)]
pub enum ZentaoError {
    /// Token exchange failed. The session stays unusable until the process restarts.
    #[error("auth failed: status={} body={body}", display_status(.status))]
    Auth { status: Option<u16>, body: String },
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("unexpected response shape for {operation}: {payload}")]
    ResponseShape { operation: String, payload: String },
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("task creation failed: {0}")]
    Creation(String),
    #[error("config error: {0}")]
    Config(String),
}

impl ZentaoError {
    pub fn response_shape(operation: impl Into<String>, payload: &serde_json::Value) -> Self {
        ZentaoError::ResponseShape {
            operation: operation.into(),
            payload: super::preview_body(&payload.to_string()),
        }
    }

    pub fn http_status(&self) -> Option<u16> {
        match self {
            ZentaoError::Auth { status, .. } => *status,
            ZentaoError::Request(err) => err.status(),
            _ => None,
        }
    }
}

fn display_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn auth_error_display_carries_status_and_body() {
        let err = ZentaoError::Auth {
            status: Some(401),
            body: r#"{"error":"bad password"}"#.to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("status=401"));
        assert!(msg.contains("bad password"));
        assert_eq!(err.http_status(), Some(401));
    }

    #[test]
    fn auth_error_without_status() {
        let err = ZentaoError::Auth {
            status: None,
            body: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("status=none"));
    }

    #[test]
    fn response_shape_truncates_payload() {
        let big = json!({ "blob": "x".repeat(2_000) });
        let err = ZentaoError::response_shape("get_projects", &big);
        let ZentaoError::ResponseShape { operation, payload } = &err else {
            panic!("expected ResponseShape");
        };
        assert_eq!(operation, "get_projects");
        assert!(payload.ends_with("..."));
        assert!(err.to_string().starts_with("unexpected response shape for get_projects"));
    }
}
