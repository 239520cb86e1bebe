//! Document-level normalization ahead of client generation.
//!
//! typescript-axios only understands OpenAPI 3.0, so a 3.1 document is pinned to
//! [`TARGET_OPENAPI_VERSION`], stripped of the sections the generator chokes on or the
//! client does not need, and then handed to the [`sanitizer`](crate::sanitizer).

use crate::error::{Error, Result};
use crate::sanitizer::sanitize;
use log::{debug, info};
use serde_json::{Map, Value};

/// Schema version written into every normalized document.
pub const TARGET_OPENAPI_VERSION: &str = "3.0.0";

/// Sub-keys of `info` that are removed.
const STRIPPED_INFO_KEYS: [&str; 2] = ["summary", "license"];

/// Normalizes a parsed OpenAPI document.
///
/// The steps run in a fixed order: the `openapi` field is forced to
/// [`TARGET_OPENAPI_VERSION`], `info.summary` and `info.license` are removed,
/// `components.securitySchemes` is removed, and finally the whole tree is sanitized.
///
/// # Errors
///
/// Returns [`Error::MalformedDocument`] when the root is not a mapping or when `info` or
/// `components` is missing or not a mapping.
pub fn normalize(mut document: Value) -> Result<Value> {
    let root = document
        .as_object_mut()
        .ok_or_else(|| Error::MalformedDocument("document root is not an object".to_string()))?;

    if let Some(version) = root.get("openapi").and_then(Value::as_str) {
        debug!("Downgrading openapi version {} to {}", version, TARGET_OPENAPI_VERSION);
    }
    root.insert(
        "openapi".to_string(),
        Value::String(TARGET_OPENAPI_VERSION.to_string()),
    );

    let info = section_mut(root, "info")?;
    for key in STRIPPED_INFO_KEYS {
        if info.shift_remove(key).is_some() {
            debug!("Removed info.{}", key);
        }
    }

    let components = section_mut(root, "components")?;
    if components.shift_remove("securitySchemes").is_some() {
        debug!("Removed components.securitySchemes");
    }

    info!("Sanitizing schema tree...");
    Ok(sanitize(document))
}

fn section_mut<'a>(root: &'a mut Map<String, Value>, key: &str) -> Result<&'a mut Map<String, Value>> {
    match root.get_mut(key) {
        Some(Value::Object(section)) => Ok(section),
        Some(_) => Err(Error::MalformedDocument(format!("'{}' is not an object", key))),
        None => Err(Error::MalformedDocument(format!("missing '{}' section", key))),
    }
}
