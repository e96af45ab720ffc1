//! # Outbound Fetch Capability

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{SdkError, SdkResult};

fn default_method() -> String {
    "GET".to_string()
}

/// An outbound HTTP request issued by function code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchRequest {
    #[serde(default = "default_method")]
    pub method: String,

    pub url: String,

    #[serde(default)]
    pub headers: Vec<(String, String)>,

    /// JSON body, sent when present
    #[serde(default)]
    pub body: Option<Value>,
}

impl FetchRequest {
    /// Build a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: default_method(),
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Build a POST request with a JSON body
    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: "POST".to_string(),
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    /// Add a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Response returned to function code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Parsed JSON when the body is JSON, the raw text as a string otherwise
    pub body: Value,
}

impl FetchResponse {
    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound HTTP client consumed by the fetch capability
pub trait HttpFetch: Send + Sync + std::fmt::Debug {
    fn fetch(&self, request: FetchRequest) -> SdkResult<FetchResponse>;
}

/// HTTP client backed by a blocking reqwest client
#[derive(Debug, Default)]
pub struct ReqwestFetch {
    client: reqwest::blocking::Client,
}

impl ReqwestFetch {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HttpFetch for ReqwestFetch {
    fn fetch(&self, request: FetchRequest) -> SdkResult<FetchResponse> {
        let method = reqwest::Method::from_bytes(request.method.to_uppercase().as_bytes())
            .map_err(|_| SdkError::InvalidMethod(request.method.clone()))?;

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(|e| SdkError::Fetch(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();

        let text = response.text().map_err(|e| SdkError::Fetch(e.to_string()))?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        Ok(FetchResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builders() {
        let get = FetchRequest::get("https://example.com/api");
        assert_eq!(get.method, "GET");
        assert!(get.body.is_none());

        let post = FetchRequest::post("https://example.com/api", json!({"a": 1}))
            .with_header("x-request-id", "r1");
        assert_eq!(post.method, "POST");
        assert_eq!(post.headers.len(), 1);
    }

    #[test]
    fn test_invalid_method_rejected() {
        let fetch = ReqwestFetch::new();
        let mut request = FetchRequest::get("https://example.com");
        request.method = "NOT A METHOD".to_string();

        assert!(matches!(
            fetch.fetch(request),
            Err(SdkError::InvalidMethod(_))
        ));
    }

    #[test]
    fn test_response_success_range() {
        let response = FetchResponse {
            status: 204,
            headers: Vec::new(),
            body: Value::Null,
        };
        assert!(response.is_success());

        let response = FetchResponse {
            status: 404,
            headers: Vec::new(),
            body: Value::Null,
        };
        assert!(!response.is_success());
    }
}
