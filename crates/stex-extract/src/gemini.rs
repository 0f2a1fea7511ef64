//! Adapter calling the hosted Gemini generateContent API.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use stex_core::{EXTRACTION_PROMPT, EncodedDocument, Transaction, decode_transactions, response_schema};

use crate::{ExtractError, Result};
use crate::extractor::DocumentExtractor;

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default API endpoint base.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default request timeout. The upstream call has no retry; a hung request
/// fails the whole attempt once this elapses.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Extractor backed by the hosted multimodal completion service.
///
/// One invocation issues exactly one `generateContent` request carrying
/// the inlined document bytes, the extraction instruction block and the
/// structured-output constraint, then decodes the candidate text through
/// the extraction contract.
pub struct GeminiExtractor {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiExtractor {
    /// Create an extractor with the default model, endpoint and timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ExtractError::MissingCredential);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key,
        })
    }

    /// Use a different model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Use a different endpoint base (mainly for test servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Use a different request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    fn request_body(&self, document: &EncodedDocument) -> Value {
        json!({
            "contents": {
                "parts": [
                    {
                        "inlineData": {
                            "mimeType": document.media_type,
                            "data": document.data,
                        }
                    },
                    { "text": EXTRACTION_PROMPT }
                ]
            },
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
            }
        })
    }
}

impl DocumentExtractor for GeminiExtractor {
    async fn extract(&self, document: &EncodedDocument) -> Result<Vec<Transaction>> {
        let url = self.request_url();
        debug!("issuing extraction request to {} ({})", url, document.media_type);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(document))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::Service {
                status: status.as_u16(),
                message: service_message(&body),
            });
        }

        let payload: GenerateContentResponse = response.json().await?;
        let text = payload.candidate_text();

        // An empty body is "no transactions found", not a failure.
        Ok(decode_transactions(&text)?)
    }
}

/// Pull a human-readable message out of an error body. Opaque bodies yield
/// an empty string; [`ExtractError::display_message`] supplies the fallback.
fn service_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .map(|e| e.message)
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts; empty when the
    /// service returned no candidate text at all.
    fn candidate_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stex_core::UploadedFile;

    fn extractor() -> GeminiExtractor {
        GeminiExtractor::new("test-key").expect("constructible")
    }

    fn doc() -> EncodedDocument {
        UploadedFile::new("a.png", "image/png", vec![0xAB, 0xCD])
            .expect("accepted")
            .encode()
    }

    #[test]
    fn test_rejects_blank_credential() {
        assert!(matches!(
            GeminiExtractor::new("  "),
            Err(ExtractError::MissingCredential)
        ));
    }

    #[test]
    fn test_request_url_shape() {
        let url = extractor().with_model("gemini-2.0-pro").request_url();
        assert_eq!(
            url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-pro:generateContent"
        );
    }

    #[test]
    fn test_request_body_inlines_document_and_constraint() {
        let document = doc();
        let body = extractor().request_body(&document);

        let parts = &body["contents"]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], document.data.as_str());

        let text = parts[1]["text"].as_str().expect("prompt part");
        assert!(text.contains("continuation of the previous row"));
        assert!(text.contains("the JSON value must be null"));

        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            body["generationConfig"]["responseSchema"]["items"]["required"],
            json!(["date", "details"])
        );
    }

    #[test]
    fn test_candidate_text_concatenates_parts() {
        let payload: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "[{\"date\""}, {"text": ": \"11MAY18\", \"details\": \"x\"}]"}]}}]}"#,
        )
        .expect("parsable");

        let rows = decode_transactions(&payload.candidate_text()).expect("decodable");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, "11MAY18");
    }

    #[test]
    fn test_missing_candidates_decode_as_no_transactions() {
        let payload: GenerateContentResponse =
            serde_json::from_str(r#"{}"#).expect("parsable");
        assert_eq!(payload.candidate_text(), "");
        assert!(decode_transactions(&payload.candidate_text())
            .expect("ok")
            .is_empty());
    }

    #[test]
    fn test_service_message_reads_api_error_body() {
        let body = r#"{"error": {"code": 429, "message": "quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(service_message(body), "quota exceeded");
        assert_eq!(service_message("<html>bad gateway</html>"), "");
    }

    /// Serve exactly one canned HTTP response on a local port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bindable");
        let addr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accepted");

            // Drain the request: headers, then the announced body length.
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            let header_end = loop {
                let n = stream.read(&mut chunk).await.expect("readable");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
            let content_length: usize = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0);
            while buf.len() < header_end + content_length {
                let n = stream.read(&mut chunk).await.expect("readable");
                buf.extend_from_slice(&chunk[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.expect("writable");
            stream.shutdown().await.ok();
        });

        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_extract_decodes_candidate_rows_from_service() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "[{\"date\": \"15MAY18\", \"paymentType\": \"CR\", \"details\": \"rent\", \"paidOut\": null, \"paidIn\": 1750.0, \"balance\": null}]"}]}}]}"#;
        let endpoint = serve_once("200 OK", body).await;

        let rows = extractor()
            .with_endpoint(endpoint)
            .extract(&doc())
            .await
            .expect("extractable");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, "15MAY18");
        assert_eq!(rows[0].paid_in, Some(rust_decimal::Decimal::new(1750, 0)));
    }

    #[tokio::test]
    async fn test_extract_surfaces_service_status_and_message() {
        let endpoint = serve_once(
            "429 Too Many Requests",
            r#"{"error": {"code": 429, "message": "quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#,
        )
        .await;

        let err = extractor()
            .with_endpoint(endpoint)
            .extract(&doc())
            .await
            .unwrap_err();

        match err {
            ExtractError::Service { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_extract_opaque_error_body_falls_back_to_generic() {
        let endpoint = serve_once("502 Bad Gateway", "<html>bad gateway</html>").await;

        let err = extractor()
            .with_endpoint(endpoint)
            .extract(&doc())
            .await
            .unwrap_err();

        assert_eq!(err.display_message(), crate::GENERIC_FAILURE);
    }
}
