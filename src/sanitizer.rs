//! Schema tree sanitization.
//!
//! Rewrites a parsed OpenAPI document in place so that the typescript-axios generator can
//! consume it. The walk is a single recursive pass over the `serde_json::Value` tree:
//!
//! - `default`, `const` and `uniqueItems` are dropped from every mapping
//! - mappings stored under numeric keys lose their `user` entry
//! - `operationId` values are shortened at an `api` segment that is not one of the first two
//! - a `oneOf` that mixes a `null` variant with a typed variant collapses into that typed
//!   variant flagged `nullable`, replacing the whole mapping that held it
//! - `prefixItems` tuples become a plain `oneOf` over their items
//!
//! Keys are visited in document order (`serde_json` is built with `preserve_order`), and
//! an entry removed by an earlier rewrite of the same mapping is not visited.

use log::debug;
use serde_json::{Map, Value};

/// Keys removed from every mapping before its entries are visited.
const STRIPPED_KEYS: [&str; 3] = ["default", "const", "uniqueItems"];

/// Keys removed from a tuple schema once its items have been moved to `oneOf`.
const TUPLE_KEYS: [&str; 3] = ["type", "minItems", "maxItems"];

/// Outcome of sanitizing one node of the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Sanitized {
    /// The node was edited in place (or needed no edit) and keeps its slot.
    Mutated,
    /// The node must be substituted by this value in its parent.
    Replaced(Value),
}

/// Sanitizes a whole tree and returns it.
///
/// The input is edited in place; the returned value is the input itself unless the root
/// node collapsed into a replacement.
///
/// # Example
///
/// ```
/// use openapi_client_patcher::sanitizer::sanitize;
/// use serde_json::json;
///
/// let schema = json!({ "oneOf": [{ "type": "null" }, { "type": "string" }] });
/// assert_eq!(sanitize(schema), json!({ "type": "string", "nullable": true }));
/// ```
pub fn sanitize(mut node: Value) -> Value {
    match sanitize_node(&mut node) {
        Sanitized::Mutated => node,
        Sanitized::Replaced(replacement) => replacement,
    }
}

/// Sanitizes `node` in place, reporting whether the caller has to substitute it.
///
/// Sequences are sanitized element by element and are never replaced themselves. Scalars
/// are left untouched.
pub fn sanitize_node(node: &mut Value) -> Sanitized {
    match node {
        Value::Array(items) => {
            for item in items.iter_mut() {
                sanitize_slot(item);
            }
            Sanitized::Mutated
        }
        Value::Object(map) => sanitize_mapping(map),
        _ => Sanitized::Mutated,
    }
}

/// Shortens an operation identifier at its `api` segment.
///
/// The identifier is cut at the first `_api` when the segment `api` sits at index 2 or
/// later of the `_`-separated segments; otherwise it is returned unchanged.
///
/// ```
/// use openapi_client_patcher::sanitizer::rewrite_operation_id;
///
/// assert_eq!(rewrite_operation_id("pets_sub_api_list"), "pets_sub");
/// assert_eq!(rewrite_operation_id("pets_api_list"), "pets_api_list");
/// ```
pub fn rewrite_operation_id(id: &str) -> String {
    let api_segment = id.split('_').position(|segment| segment == "api");
    match (api_segment, id.find("_api")) {
        (Some(index), Some(cut)) if index > 1 => id[..cut].to_string(),
        _ => id.to_string(),
    }
}

fn sanitize_slot(slot: &mut Value) {
    if let Sanitized::Replaced(replacement) = sanitize_node(slot) {
        *slot = replacement;
    }
}

fn sanitize_mapping(map: &mut Map<String, Value>) -> Sanitized {
    for key in STRIPPED_KEYS {
        map.shift_remove(key);
    }

    let keys: Vec<String> = map.keys().cloned().collect();
    for key in keys {
        let Some(value) = map.get_mut(&key) else {
            continue;
        };

        if is_numeric_key(&key) {
            if let Value::Object(entry) = value {
                entry.shift_remove("user");
            }
        }

        match key.as_str() {
            "operationId" => {
                if let Value::String(id) = value {
                    *id = rewrite_operation_id(id);
                }
            }
            "oneOf" => {
                if let Some(replacement) = collapse_nullable_union(value) {
                    return Sanitized::Replaced(sanitize(replacement));
                }
                sanitize_slot(value);
            }
            "prefixItems" => rewrite_tuple(map),
            _ => sanitize_slot(value),
        }
    }

    Sanitized::Mutated
}

/// Picks the typed variant of a `oneOf` that also allows `null`.
///
/// Returns `None` unless the variants contain both a `null`-typed descriptor and a
/// descriptor of any other type.
fn collapse_nullable_union(variants: &Value) -> Option<Value> {
    let variants = variants.as_array()?;
    if !variants.iter().any(is_null_variant) {
        return None;
    }

    let mut descriptor = variants
        .iter()
        .find(|variant| variant.is_object() && !is_null_variant(variant))?
        .clone();

    if let Value::Object(fields) = &mut descriptor {
        if has_reference(fields) {
            // A reference carries its own type.
            fields.shift_remove("type");
        } else if !has_type(fields) {
            fields.insert("type".to_string(), Value::String("object".to_string()));
        }
        fields.insert("nullable".to_string(), Value::Bool(true));
    }

    debug!(
        "Collapsed nullable union into {}",
        descriptor
            .get("$ref")
            .or_else(|| descriptor.get("type"))
            .map(Value::to_string)
            .unwrap_or_default()
    );

    Some(descriptor)
}

fn rewrite_tuple(map: &mut Map<String, Value>) {
    let Some(mut items) = map.shift_remove("prefixItems") else {
        return;
    };
    sanitize_slot(&mut items);

    for key in TUPLE_KEYS {
        map.shift_remove(key);
    }
    map.insert("oneOf".to_string(), items);
}

fn is_null_variant(variant: &Value) -> bool {
    variant.get("type").and_then(Value::as_str) == Some("null")
}

fn has_reference(fields: &Map<String, Value>) -> bool {
    match fields.get("$ref") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(reference)) => !reference.is_empty(),
        Some(_) => true,
    }
}

fn has_type(fields: &Map<String, Value>) -> bool {
    match fields.get("type") {
        None | Some(Value::Null) => false,
        Some(Value::String(schema_type)) => !schema_type.is_empty(),
        Some(_) => true,
    }
}

/// Keys such as `"0"` or `"12"` model array-like structures stored as mappings.
///
/// Follows JavaScript's `Number(key)` conversion: surrounding whitespace is ignored, a
/// blank key counts as `0`, `Infinity` is a number and so are `0x`, `0o` and `0b`
/// literals. Only `NaN` results are rejected.
fn is_numeric_key(key: &str) -> bool {
    let trimmed = key.trim();
    if trimmed.is_empty() || is_radix_literal(trimmed) {
        return true;
    }

    let unsigned = trimmed
        .strip_prefix('+')
        .or_else(|| trimmed.strip_prefix('-'))
        .unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return true;
    }

    // Rust also accepts "inf" and "NaN", which are not decimal literals.
    unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && unsigned
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
        && unsigned.parse::<f64>().is_ok()
}

fn is_radix_literal(key: &str) -> bool {
    let radix = match key.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return false,
    };
    let digits = &key[2..];
    !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix))
}
