use reqwest::Method;
use serde_json::Value;

use super::credentials::Credentials;
use crate::config::{ZentaoConfig, REQUEST_TIMEOUT_MS};
use crate::error::{preview_body, RequestError, Result, ZentaoError};

/// Request payload encodings understood by the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Form(Vec<(String, String)>),
}

impl RequestBody {
    fn label(&self) -> &'static str {
        match self {
            RequestBody::Empty => "empty",
            RequestBody::Json(_) => "json",
            RequestBody::Form(_) => "form",
        }
    }
}

async fn parse_json_response(operation: &str, resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    let url = resp.url().to_string();
    let body = resp
        .text()
        .await
        .map_err(|err| RequestError::from_reqwest(operation, err, url.clone()))?;

    if !status.is_success() {
        let preview = preview_body(&body);
        return Err(RequestError::status_error(operation, status.as_u16(), url, preview).into());
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str::<Value>(&body).map_err(|err| {
        let preview = preview_body(&body);
        RequestError::decode_error(operation, status.as_u16(), url, err, preview).into()
    })
}

/// Authenticated JSON client for the backend REST API.
pub struct ZentaoClient {
    base_url: String,
    http: reqwest::Client,
    credentials: Credentials,
}

impl ZentaoClient {
    pub fn new(config: &ZentaoConfig) -> Result<Self> {
        Self::with_timeout(config, REQUEST_TIMEOUT_MS)
    }

    pub fn with_timeout(config: &ZentaoConfig, timeout_ms: u64) -> Result<Self> {
        let timeout = std::time::Duration::from_millis(timeout_ms);
        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| ZentaoError::Config(format!("build http client failed: {e}")))?;
        Ok(Self {
            base_url: config.api_base_url(),
            http,
            credentials: Credentials::new(config.username.clone(), &config.password),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Account the session logs in as; used as the `assignedTo` filter.
    pub fn username(&self) -> &str {
        self.credentials.account()
    }

    pub async fn token(&self) -> Result<String> {
        self.credentials.token(&self.http, &self.base_url).await
    }

    pub async fn get(
        &self,
        operation: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value> {
        self.send(operation, Method::GET, path, query, RequestBody::Empty).await
    }

    pub async fn send(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: RequestBody,
    ) -> Result<Value> {
        let token = self.token().await?;
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(
            target: "zentao.http",
            stage = "http.request.in",
            operation = operation,
            method = %method,
            url = %url,
            params = query.len(),
            body = body.label()
        );

        let mut req = self
            .http
            .request(method, &url)
            .header("Token", token);
        if !query.is_empty() {
            req = req.query(query);
        }
        req = match body {
            RequestBody::Empty => req,
            RequestBody::Json(value) => req.json(&value),
            RequestBody::Form(pairs) => req.form(&pairs),
        };

        let resp = req
            .send()
            .await
            .map_err(|err| RequestError::from_reqwest(operation, err, url.clone()))?;
        let status = resp.status();
        let value = parse_json_response(operation, resp).await;
        tracing::debug!(
            target: "zentao.http",
            stage = "http.request.out",
            operation = operation,
            status = %status
        );
        value
    }
}
