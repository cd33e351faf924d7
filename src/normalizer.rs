use colored::*;
use serde_json::Value;

use crate::errors::OrganizerError;
use crate::models::{Plan, RawPlanResponse};

/// Keys whose values the cleaning pass emits as-is, without descending.
const EXEMPT_KEYS: [&str; 2] = ["ignore", "unzip"];

/// Turns an untrusted service response into a validated [`Plan`].
///
/// The service is instructed to answer with a bare JSON object, but in
/// practice the payload shows up wrapped in stray newlines, escaped as a
/// JSON string, or both. Each recovery step here only runs if the previous
/// one succeeded.
pub struct PlanNormalizer {
    strict_unwrap: bool,
    verbose: bool,
}

impl PlanNormalizer {
    pub fn new(strict_unwrap: bool, verbose: bool) -> Self {
        Self {
            strict_unwrap,
            verbose,
        }
    }

    pub fn normalize(&self, response: &RawPlanResponse) -> Result<Plan, OrganizerError> {
        let payload = extract_payload(&response.0)?;
        let decoded = parse_flexibly(payload)?;
        let unwrapped = self.unwrap_double_encoded(decoded)?;
        let cleaned = clean_names(normalize_paths(unwrapped));

        let plan = match cleaned {
            Value::Object(_) => serde_json::from_value::<Plan>(cleaned).map_err(|e| {
                OrganizerError::MalformedResponse(format!(
                    "response does not describe a valid plan: {e}"
                ))
            })?,
            // A non-object payload (e.g. a string kept by the lenient unwrap)
            // carries no structure; execution reports that.
            _ => Plan::default(),
        };

        if self.verbose {
            if let Ok(pretty) = serde_json::to_string_pretty(&plan) {
                println!("{}", "Normalized plan:".cyan());
                println!("{}", pretty);
            }
        }

        Ok(plan)
    }

    fn unwrap_double_encoded(&self, value: Value) -> Result<Value, OrganizerError> {
        let Value::String(inner) = value else {
            return Ok(value);
        };

        match serde_json::from_str(&inner) {
            Ok(unwrapped) => Ok(unwrapped),
            Err(e) if self.strict_unwrap => Err(OrganizerError::MalformedResponse(format!(
                "double-encoded payload failed to parse: {e}"
            ))),
            Err(_) => Ok(Value::String(inner)),
        }
    }
}

/// Locates the text payload: a top-level `output_text` field when present,
/// otherwise the `output[0].content[0].text` nesting used by the service's
/// raw wire format.
fn extract_payload(response: &Value) -> Result<Value, OrganizerError> {
    if let Some(text) = response.get("output_text") {
        if !text.is_null() {
            return Ok(text.clone());
        }
    }

    response
        .pointer("/output/0/content/0/text")
        .filter(|v| !v.is_null())
        .cloned()
        .ok_or_else(|| {
            OrganizerError::MalformedResponse(
                "no text payload at 'output_text' or 'output[0].content[0].text'".to_string(),
            )
        })
}

/// Strict parse first; on failure, strip whitespace padding plus literal
/// `\n` escape sequences and real newlines, then retry once. A payload that
/// is already structured JSON passes through untouched.
fn parse_flexibly(payload: Value) -> Result<Value, OrganizerError> {
    let Value::String(raw) = payload else {
        return Ok(payload);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(_) => {
            let cleaned = raw.trim().replace("\\n", "").replace('\n', "");
            serde_json::from_str(&cleaned).map_err(|e| {
                OrganizerError::MalformedResponse(format!(
                    "payload is not valid JSON even after cleaning: {e}"
                ))
            })
        }
    }
}

/// Recursively rewrites every string value to use forward slashes and a
/// canonical separator form, preserving relative vs. absolute paths.
fn normalize_paths(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, normalize_paths(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_paths).collect()),
        Value::String(s) => Value::String(normalize_path_string(&s)),
        other => other,
    }
}

/// Collapses redundant separators and `.` segments the way a path library
/// would: `a//b` and `./a` become `a/b` and `a`, a single leading `/` (or a
/// leading `//`) is kept, trailing separators are dropped, and `..` segments
/// are left alone.
pub(crate) fn normalize_path_string(raw: &str) -> String {
    let s = raw.replace('\\', "/");

    let root = if s.starts_with("//") && !s.starts_with("///") {
        "//"
    } else if s.starts_with('/') {
        "/"
    } else {
        ""
    };

    let segments: Vec<&str> = s
        .split('/')
        .filter(|seg| !seg.is_empty() && *seg != ".")
        .collect();

    if segments.is_empty() {
        return if root.is_empty() {
            ".".to_string()
        } else {
            root.to_string()
        };
    }

    format!("{}{}", root, segments.join("/"))
}

/// Recursively strips spaces from the final path component of every string
/// value, leaving parent segments untouched. Values of `ignore` and `unzip`
/// keys reference files that already exist on disk and are emitted verbatim.
fn clean_names(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| {
                    if EXEMPT_KEYS.contains(&k.as_str()) {
                        (k, v)
                    } else {
                        (k, clean_names(v))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(clean_names).collect()),
        Value::String(s) => Value::String(strip_name_spaces(&s)),
        other => other,
    }
}

fn strip_name_spaces(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => {
            let (parents, name) = path.split_at(idx + 1);
            format!("{}{}", parents, name.replace(' ', ""))
        }
        None => path.replace(' ', ""),
    }
}
