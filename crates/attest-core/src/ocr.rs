//! Receipt-OCR service client
//!
//! Thin HTTP client for the document-OCR receipt endpoint. The validation
//! chain never calls this itself: callers run the request, tolerate its
//! failures, and hand the raw JSON tree to the chain. Images are passed
//! either by URL the service can fetch, or inline as base64.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

/// Shared-secret header the OCR service requires
const OCR_SECRET_HEADER: &str = "X-OCR-SECRET";

/// Receipt-OCR service client
pub struct OcrClient {
    http_client: Client,
    invoke_url: String,
    secret: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OcrRequest {
    images: Vec<OcrImage>,
    request_id: String,
    version: String,
    timestamp: u64,
}

#[derive(Debug, Serialize)]
struct OcrImage {
    format: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<String>,
}

impl OcrClient {
    pub fn new(invoke_url: &str, secret: &str) -> Self {
        Self {
            http_client: Client::new(),
            invoke_url: invoke_url.trim_end_matches('/').to_string(),
            secret: secret.to_string(),
        }
    }

    /// Create from `OCR_INVOKE_URL` / `OCR_SECRET` environment variables
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("OCR_INVOKE_URL").ok()?;
        let secret = std::env::var("OCR_SECRET").ok()?;
        Some(Self::new(&url, &secret))
    }

    /// Recognize a receipt image the service fetches by URL
    pub async fn recognize_url(&self, image_url: &str, request_id: &str) -> Result<Value> {
        self.send(
            OcrImage {
                format: "jpg".to_string(),
                name: "receipt".to_string(),
                url: Some(image_url.to_string()),
                data: None,
            },
            request_id,
        )
        .await
    }

    /// Recognize a receipt image passed inline as base64
    pub async fn recognize_bytes(&self, image: &[u8], request_id: &str) -> Result<Value> {
        let data = base64::engine::general_purpose::STANDARD.encode(image);
        self.send(
            OcrImage {
                format: "jpg".to_string(),
                name: "receipt".to_string(),
                url: None,
                data: Some(data),
            },
            request_id,
        )
        .await
    }

    async fn send(&self, image: OcrImage, request_id: &str) -> Result<Value> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let request = OcrRequest {
            images: vec![image],
            request_id: request_id.to_string(),
            version: "V2".to_string(),
            timestamp,
        };

        let response = self
            .http_client
            .post(&self.invoke_url)
            .header(OCR_SECRET_HEADER, &self.secret)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Ocr(format!("OCR service returned {}", status)));
        }

        let body: Value = response.json().await?;
        debug!(request_id, "OCR response received");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_payload_shape() {
        let request = OcrRequest {
            images: vec![OcrImage {
                format: "jpg".to_string(),
                name: "receipt".to_string(),
                url: Some("https://storage.example/receipts/r1.jpg".to_string()),
                data: None,
            }],
            request_id: "claim-1".to_string(),
            version: "V2".to_string(),
            timestamp: 1767225600000,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["requestId"], "claim-1");
        assert_eq!(value["version"], "V2");
        assert_eq!(value["images"][0]["format"], "jpg");
        assert_eq!(
            value["images"][0]["url"],
            "https://storage.example/receipts/r1.jpg"
        );
        // Absent image data must be omitted, not serialized as null
        assert!(value["images"][0].get("data").is_none());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = OcrClient::new("https://ocr.example/receipt/", "secret");
        assert_eq!(client.invoke_url, "https://ocr.example/receipt");
    }
}
