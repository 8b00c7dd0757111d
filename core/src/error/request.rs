use std::{error::Error as StdError, fmt};

pub const BODY_PREVIEW_LIMIT: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestErrorKind {
    Timeout,
    Connect,
    Request,
    Body,
    Decode,
    Status,
    Unknown,
}

impl RequestErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Request => "request",
            Self::Body => "body",
            Self::Decode => "decode",
            Self::Status => "status",
            Self::Unknown => "unknown",
        }
    }
}

impl RequestErrorKind {
    /// Maps a transport failure onto the coarse kinds callers branch on.
    fn classify(err: &reqwest::Error) -> Self {
        match () {
            _ if err.is_timeout() => Self::Timeout,
            _ if err.is_connect() => Self::Connect,
            _ if err.is_request() => Self::Request,
            _ if err.is_body() => Self::Body,
            _ if err.is_decode() => Self::Decode,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for RequestErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type BoxedSource = Box<dyn StdError + Send + Sync + 'static>;

/// Failure of an authenticated backend call: transport error or non-2xx status.
#[derive(Debug)]
pub struct RequestError {
    kind: RequestErrorKind,
    operation: String,
    status: Option<u16>,
    url: Option<String>,
    message: String,
    source: Option<BoxedSource>,
}

impl RequestError {
    fn new(
        kind: RequestErrorKind,
        operation: &str,
        status: Option<u16>,
        url: String,
        message: String,
    ) -> Self {
        Self {
            kind,
            operation: operation.to_string(),
            status,
            url: Some(url),
            message,
            source: None,
        }
    }

    fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> RequestErrorKind {
        self.kind
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Transport message, or the previewed response body for status failures.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn from_reqwest(operation: &str, err: reqwest::Error, url: String) -> Self {
        let kind = RequestErrorKind::classify(&err);
        let status = err.status().map(|s| s.as_u16());
        Self::new(kind, operation, status, url, err.to_string()).with_source(err)
    }

    pub(crate) fn status_error(operation: &str, status: u16, url: String, preview: String) -> Self {
        Self::new(RequestErrorKind::Status, operation, Some(status), url, preview)
    }

    pub(crate) fn decode_error(
        operation: &str,
        status: u16,
        url: String,
        err: serde_json::Error,
        preview: String,
    ) -> Self {
        let message = format!("response is not JSON ({err}); body={preview}");
        Self::new(RequestErrorKind::Decode, operation, Some(status), url, message).with_source(err)
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed kind={}", self.operation, self.kind)?;
        if let Some(status) = self.status {
            write!(f, " status={status}")?;
        }
        if let Some(url) = &self.url {
            write!(f, " url={url}")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl StdError for RequestError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_deref().map(|err| err as &(dyn StdError + 'static))
    }
}

/// Trimmed body cut to `BODY_PREVIEW_LIMIT` characters, for logs and errors.
pub fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    match trimmed.char_indices().nth(BODY_PREVIEW_LIMIT) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_body_empty() {
        assert_eq!(preview_body("   "), "<empty body>");
    }

    #[test]
    fn preview_body_truncates() {
        let body = "a".repeat(BODY_PREVIEW_LIMIT + 10);
        let preview = preview_body(&body);
        assert!(preview.ends_with("..."));
        assert!(preview.len() <= BODY_PREVIEW_LIMIT + 3);
    }

    #[test]
    fn status_error_display() {
        let err = RequestError::status_error(
            "get_executions",
            502,
            "http://zentao.local/api.php/v1/executions".to_string(),
            "bad gateway".to_string(),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("get_executions failed"));
        assert!(msg.contains("kind=status"));
        assert!(msg.contains("status=502"));
        assert!(msg.contains("url=http://zentao.local/api.php/v1/executions"));
        assert!(msg.contains("bad gateway"));
    }

    #[test]
    fn decode_error_display() {
        let decode_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = RequestError::decode_error(
            "get_task_detail",
            200,
            "http://zentao.local/api.php/v1/tasks/7".to_string(),
            decode_err,
            "not json".to_string(),
        );
        assert_eq!(err.kind(), RequestErrorKind::Decode);
        assert_eq!(err.status(), Some(200));
        assert!(err.to_string().contains("response is not JSON"));
        assert!(err.source().is_some());
    }
}
