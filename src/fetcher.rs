//! Retrieval of the raw OpenAPI document.
//!
//! The document is served by a local development instance with a self-signed
//! certificate, so the HTTPS client does not validate the server's certificate chain.
//! Before parsing, every `anyOf` is rewritten to `oneOf` because the sanitizer only
//! special-cases one union spelling.

use crate::error::{Error, Result};
use log::{debug, error, info};
use reqwest::blocking::Client;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Endpoint of the locally running service.
pub const DEFAULT_DOCUMENT_URL: &str = "https://127.0.0.1:8000/openapi.json";

const UNION_KEYWORD: &str = "anyOf";
const NORMALIZED_UNION_KEYWORD: &str = "oneOf";

/// Fetches OpenAPI documents over HTTP(S).
pub struct DocumentFetcher {
    client: Client,
}

impl DocumentFetcher {
    /// Creates a fetcher whose client accepts invalid TLS certificates and connects
    /// directly, ignoring proxy settings.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .no_proxy()
            .build()
            .map_err(|e| Error::Fetch {
                url: String::new(),
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    /// Downloads the document at `url` and parses it.
    ///
    /// There is no retry. A transport error, a non-success status, an unreadable body
    /// or a parse failure is logged and returned as [`Error::Fetch`].
    pub fn fetch(&self, url: &str) -> Result<Value> {
        info!("Fetching OpenAPI document from {}", url);

        let text = self.fetch_text(url).map_err(|message| {
            error!("Error fetching OpenAPI JSON at {}: {}", url, message);
            Error::Fetch {
                url: url.to_string(),
                message,
            }
        })?;

        debug!("Received {} bytes from {}", text.len(), url);

        parse_document(&text).map_err(|e| {
            error!("Error parsing OpenAPI JSON from {}: {}", url, e);
            Error::Fetch {
                url: url.to_string(),
                message: e.to_string(),
            }
        })
    }

    fn fetch_text(&self, url: &str) -> std::result::Result<String, String> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;

        response.text().map_err(|e| e.to_string())
    }
}

/// Reads a raw document from a local file, applying the same keyword substitution as
/// [`DocumentFetcher::fetch`].
pub fn load_file(path: &Path) -> Result<Value> {
    info!("Reading OpenAPI document from {}", path.display());
    let text = fs::read_to_string(path)?;
    parse_document(&text)
}

/// Replaces every `anyOf` with `oneOf` and parses the result as JSON.
///
/// The substitution is purely textual, so it also applies inside string values.
pub fn parse_document(text: &str) -> Result<Value> {
    let substituted = text.replace(UNION_KEYWORD, NORMALIZED_UNION_KEYWORD);
    Ok(serde_json::from_str(&substituted)?)
}
