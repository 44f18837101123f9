//! Structured output schemas and parsing

use crate::error::{PonderError, PonderResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// JSON schema a structured response must satisfy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSchema {
    /// Schema name sent to the endpoint
    pub name: String,
    /// JSON schema document
    pub schema: Value,
}

impl OutputSchema {
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    /// `response_format` value for OpenAI-compatible chat completions
    pub fn response_format(&self) -> Value {
        json!({
            "type": "json_schema",
            "json_schema": {
                "name": self.name,
                "schema": self.schema,
                "strict": true,
            }
        })
    }

    /// Top-level fields the schema marks as required
    pub fn required_fields(&self) -> Vec<&str> {
        self.schema["required"]
            .as_array()
            .map(|fields| fields.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// Remove a surrounding Markdown code fence, if any
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse raw model output as a JSON object carrying every required field
pub fn parse_structured(raw: &str, schema: &OutputSchema) -> PonderResult<Value> {
    let body = strip_code_fences(raw);
    let value: Value = serde_json::from_str(body).map_err(|e| {
        PonderError::malformed_output(format!("response is not valid JSON: {}", e), raw)
    })?;

    if !value.is_object() {
        return Err(PonderError::malformed_output(
            "response is not a JSON object",
            raw,
        ));
    }

    if let Some(missing) = schema
        .required_fields()
        .into_iter()
        .find(|field| value.get(*field).is_none())
    {
        return Err(PonderError::malformed_output(
            format!("response is missing required field '{}'", missing),
            raw,
        ));
    }

    Ok(value)
}

/// Convert a structured value into a typed record
pub fn from_structured<T: DeserializeOwned>(value: Value) -> PonderResult<T> {
    let raw = value.to_string();
    serde_json::from_value(value).map_err(|e| {
        PonderError::malformed_output(format!("response does not match schema: {}", e), raw)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> OutputSchema {
        OutputSchema::new(
            "decision",
            json!({
                "type": "object",
                "properties": {"decision": {"type": "string"}},
                "required": ["decision"],
                "additionalProperties": false
            }),
        )
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
    }

    #[test]
    fn test_parse_structured_accepts_fenced_json() {
        let value = parse_structured("```json\n{\"decision\":\"sufficient\"}\n```", &schema())
            .unwrap();
        assert_eq!(value["decision"], "sufficient");
    }

    #[test]
    fn test_parse_structured_rejects_prose() {
        let err = parse_structured("I think it is sufficient.", &schema()).unwrap_err();
        assert!(matches!(err, PonderError::MalformedOutput { .. }));
    }

    #[test]
    fn test_parse_structured_rejects_missing_field() {
        let err = parse_structured("{\"reasoning\":\"x\"}", &schema()).unwrap_err();
        assert!(matches!(err, PonderError::MalformedOutput { .. }));
    }

    #[test]
    fn test_response_format_shape() {
        let format = schema().response_format();
        assert_eq!(format["type"], "json_schema");
        assert_eq!(format["json_schema"]["name"], "decision");
    }
}
