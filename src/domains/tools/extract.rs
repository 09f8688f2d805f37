//! Argument extraction.
//!
//! Turns an untyped argument bag into [`Arguments`], a record holding one
//! canonical value per declared field, or a single [`ExtractError`] naming
//! the first field that violated its declaration. Malformed input is always
//! an `ExtractError`, never a panic.

use std::collections::HashMap;

use rmcp::model::JsonObject;
use serde::de::DeserializeOwned;
use serde_json::{Number, Value};
use thiserror::Error;

use super::error::ToolError;
use super::schema::{ItemKind, ParamKind, ParameterSpec};
use crate::backend::ListOptions;

/// Caller-input failure. `Display` is the caller-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// Required field absent.
    #[error("{0}")]
    Missing(String),

    /// Present with the wrong kind and no accepted fallback.
    #[error("Invalid or missing '{name}': expected {expected}")]
    Mismatch { name: String, expected: &'static str },

    /// Embedded JSON that does not parse, or does not fit its shape.
    #[error("Invalid {name}: {reason}")]
    Malformed { name: String, reason: String },
}

impl ExtractError {
    fn mismatch(spec: &ParameterSpec) -> Self {
        Self::Mismatch {
            name: spec.name().to_string(),
            expected: spec.kind().expectation(spec.accepts_text()),
        }
    }

    fn malformed(spec: &ParameterSpec, reason: impl Into<String>) -> Self {
        Self::Malformed {
            name: spec.name().to_string(),
            reason: reason.into(),
        }
    }
}

/// Extract every declared field from `bag`, in declaration order.
///
/// Undeclared keys in the bag are ignored.
pub fn extract(params: &[ParameterSpec], bag: &JsonObject) -> Result<Arguments, ExtractError> {
    let mut values = HashMap::with_capacity(params.len());

    for spec in params {
        let present = match bag.get(spec.name()) {
            Some(raw) => coerce(spec, raw)?,
            None => None,
        };

        let value = match present {
            Some(value) => Some(value),
            None => absent(spec)?,
        };
        values.insert(spec.name().to_string(), value);
    }

    Ok(Arguments { values })
}

fn absent(spec: &ParameterSpec) -> Result<Option<Value>, ExtractError> {
    if let Some(default) = spec.default_value() {
        return Ok(Some(default.clone()));
    }
    if spec.is_required() {
        return Err(ExtractError::Missing(spec.missing_message()));
    }
    match spec.kind() {
        ParamKind::Array(_) => Ok(Some(Value::Array(Vec::new()))),
        _ => Ok(None),
    }
}

/// Coerce one present value. `Ok(None)` means the value counts as absent
/// (`null`, or an empty string).
pub(crate) fn coerce(spec: &ParameterSpec, raw: &Value) -> Result<Option<Value>, ExtractError> {
    if raw.is_null() {
        return Ok(None);
    }
    if raw.as_str().is_some_and(|s| s.trim().is_empty())
        && (spec.kind() == ParamKind::String || spec.accepts_text())
    {
        return Ok(None);
    }

    let value = match spec.kind() {
        ParamKind::String => match raw {
            Value::String(text)
                if spec.is_path_segment() && matches!(text.as_str(), "." | "..") =>
            {
                return Err(ExtractError::malformed(spec, "'.' and '..' are not valid IDs"));
            }
            Value::String(_) => raw.clone(),
            _ => return Err(ExtractError::mismatch(spec)),
        },
        ParamKind::Number => coerce_number(spec, raw)?,
        ParamKind::Boolean => coerce_bool(spec, raw)?,
        ParamKind::Array(item) => coerce_array(spec, item, raw)?,
        ParamKind::Object => coerce_object(spec, raw)?,
    };
    Ok(Some(value))
}

fn coerce_number(spec: &ParameterSpec, raw: &Value) -> Result<Value, ExtractError> {
    match raw {
        Value::Number(_) => Ok(raw.clone()),
        Value::String(text) if spec.accepts_text() => parse_number(text)
            .map(Value::Number)
            .ok_or_else(|| ExtractError::mismatch(spec)),
        _ => Err(ExtractError::mismatch(spec)),
    }
}

fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(n) = text.parse::<i64>() {
        return Some(Number::from(n));
    }
    text.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .and_then(Number::from_f64)
}

fn coerce_bool(spec: &ParameterSpec, raw: &Value) -> Result<Value, ExtractError> {
    match raw {
        Value::Bool(_) => Ok(raw.clone()),
        Value::String(text) if spec.accepts_text() => {
            let text = text.trim();
            if text.eq_ignore_ascii_case("true") {
                Ok(Value::Bool(true))
            } else if text.eq_ignore_ascii_case("false") {
                Ok(Value::Bool(false))
            } else {
                Err(ExtractError::mismatch(spec))
            }
        }
        _ => Err(ExtractError::mismatch(spec)),
    }
}

fn coerce_array(spec: &ParameterSpec, item: ItemKind, raw: &Value) -> Result<Value, ExtractError> {
    let elements = match (raw, item) {
        (Value::Array(elements), _) => elements.clone(),
        (Value::String(text), ItemKind::Object) if spec.accepts_text() => {
            match parse_json(spec, text)? {
                Value::Array(elements) => elements,
                _ => return Err(ExtractError::mismatch(spec)),
            }
        }
        (Value::String(text), _) if spec.accepts_text() => split_delimited(text)
            .into_iter()
            .map(|part| Value::String(part.to_string()))
            .collect(),
        _ => return Err(ExtractError::mismatch(spec)),
    };

    let mut coerced = Vec::with_capacity(elements.len());
    for element in elements {
        let value = match (item, element) {
            (ItemKind::String, Value::String(s)) => Value::String(s),
            (ItemKind::Number, Value::Number(n)) => Value::Number(n),
            (ItemKind::Number, Value::String(s)) if spec.accepts_text() => {
                parse_number(&s).map(Value::Number).ok_or_else(|| ExtractError::mismatch(spec))?
            }
            (ItemKind::Object, element @ Value::Object(_)) => {
                check_shape(spec, &element)?;
                element
            }
            _ => return Err(ExtractError::mismatch(spec)),
        };
        coerced.push(value);
    }
    Ok(Value::Array(coerced))
}

fn coerce_object(spec: &ParameterSpec, raw: &Value) -> Result<Value, ExtractError> {
    let value = match raw {
        Value::Object(_) => raw.clone(),
        Value::String(text) if spec.accepts_text() => parse_json(spec, text)?,
        _ => return Err(ExtractError::mismatch(spec)),
    };
    if !value.is_object() {
        return Err(ExtractError::mismatch(spec));
    }
    check_shape(spec, &value)?;
    Ok(value)
}

fn parse_json(spec: &ParameterSpec, text: &str) -> Result<Value, ExtractError> {
    serde_json::from_str(text).map_err(|e| ExtractError::malformed(spec, e.to_string()))
}

fn check_shape(spec: &ParameterSpec, value: &Value) -> Result<(), ExtractError> {
    match spec.shape_check() {
        Some(check) => check(value).map_err(|reason| ExtractError::malformed(spec, reason)),
        None => Ok(()),
    }
}

/// Split on `,`, trim each part, drop empty parts.
pub fn split_delimited(text: &str) -> Vec<&str> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Truncate toward zero. Out-of-range values saturate.
fn narrow(n: f64) -> i64 {
    n.trunc() as i64
}

// ============================================================================
// Typed argument record
// ============================================================================

/// Extracted arguments for one invocation.
///
/// Every declared field has an entry; reading a field that was never
/// declared, or reading it as the wrong kind, is a programming error and
/// reported as [`ToolError::Internal`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: HashMap<String, Option<Value>>,
}

impl Arguments {
    fn slot(&self, name: &str) -> Result<Option<&Value>, ToolError> {
        self.values
            .get(name)
            .map(Option::as_ref)
            .ok_or_else(|| ToolError::internal(format!("argument '{}' is not declared", name)))
    }

    fn present(&self, name: &str) -> Result<&Value, ToolError> {
        self.slot(name)?
            .ok_or_else(|| ToolError::internal(format!("argument '{}' is absent", name)))
    }

    fn wrong_kind(name: &str, expected: &str) -> ToolError {
        ToolError::internal(format!("argument '{}' is not {}", name, expected))
    }

    /// Whether the field ended up with a value (given or defaulted).
    pub fn is_set(&self, name: &str) -> Result<bool, ToolError> {
        Ok(self.slot(name)?.is_some())
    }

    pub fn str(&self, name: &str) -> Result<&str, ToolError> {
        self.present(name)?
            .as_str()
            .ok_or_else(|| Self::wrong_kind(name, "a string"))
    }

    pub fn opt_str(&self, name: &str) -> Result<Option<&str>, ToolError> {
        self.slot(name)?
            .map(|v| v.as_str().ok_or_else(|| Self::wrong_kind(name, "a string")))
            .transpose()
    }

    pub fn number(&self, name: &str) -> Result<f64, ToolError> {
        self.present(name)?.as_f64().ok_or_else(|| Self::wrong_kind(name, "a number"))
    }

    pub fn integer(&self, name: &str) -> Result<i64, ToolError> {
        self.number(name).map(narrow)
    }

    pub fn opt_integer(&self, name: &str) -> Result<Option<i64>, ToolError> {
        self.slot(name)?
            .map(|v| {
                v.as_f64()
                    .map(narrow)
                    .ok_or_else(|| Self::wrong_kind(name, "a number"))
            })
            .transpose()
    }

    pub fn bool(&self, name: &str) -> Result<bool, ToolError> {
        self.opt_bool(name)?
            .ok_or_else(|| ToolError::internal(format!("argument '{}' is absent", name)))
    }

    pub fn opt_bool(&self, name: &str) -> Result<Option<bool>, ToolError> {
        self.slot(name)?
            .map(|v| v.as_bool().ok_or_else(|| Self::wrong_kind(name, "a boolean")))
            .transpose()
    }

    fn array(&self, name: &str) -> Result<&Vec<Value>, ToolError> {
        self.present(name)?
            .as_array()
            .ok_or_else(|| Self::wrong_kind(name, "an array"))
    }

    pub fn strings(&self, name: &str) -> Result<Vec<String>, ToolError> {
        self.array(name)?
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| Self::wrong_kind(name, "an array of strings"))
            })
            .collect()
    }

    pub fn integers(&self, name: &str) -> Result<Vec<i64>, ToolError> {
        self.array(name)?
            .iter()
            .map(|v| {
                v.as_f64()
                    .map(narrow)
                    .ok_or_else(|| Self::wrong_kind(name, "an array of numbers"))
            })
            .collect()
    }

    /// Decode an object field into its typed shape.
    pub fn decode<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, ToolError> {
        self.slot(name)?
            .map(|v| {
                T::deserialize(v).map_err(|e| {
                    ToolError::internal(format!("argument '{}' does not decode: {}", name, e))
                })
            })
            .transpose()
    }

    /// Decode each element of an array-of-objects field.
    pub fn decode_each<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, ToolError> {
        self.array(name)?
            .iter()
            .map(|v| {
                T::deserialize(v).map_err(|e| {
                    ToolError::internal(format!("argument '{}' does not decode: {}", name, e))
                })
            })
            .collect()
    }

    /// Pagination from two numeric fields.
    ///
    /// Non-positive values count as unset. Returns `None` when both are unset
    /// so "no pagination" reaches the backend unchanged. Tools wanting fixed
    /// pages declare defaults instead.
    pub fn list_options(&self, page: &str, per_page: &str) -> Result<Option<ListOptions>, ToolError> {
        let page = self.opt_integer(page)?.filter(|n| *n > 0);
        let per_page = self.opt_integer(per_page)?.filter(|n| *n > 0);
        if page.is_none() && per_page.is_none() {
            return Ok(None);
        }
        Ok(Some(ListOptions {
            page,
            per_page,
            ..Default::default()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn bag(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_missing_required_uses_field_name() {
        let params = vec![ParameterSpec::number("ID").required()];
        let err = extract(&params, &bag(json!({}))).unwrap_err();
        assert_eq!(err.to_string(), "ID is required");
    }

    #[test]
    fn test_missing_required_custom_message() {
        let params = vec![ParameterSpec::string("id").required_with("Cluster id is required")];
        let err = extract(&params, &bag(json!({"id": ""}))).unwrap_err();
        assert_eq!(err.to_string(), "Cluster id is required");
    }

    #[test]
    fn test_first_violation_wins() {
        let params = vec![
            ParameterSpec::string("Name").required(),
            ParameterSpec::number("ImageID").required(),
        ];
        let err = extract(&params, &bag(json!({"ImageID": "abc"}))).unwrap_err();
        assert_eq!(err.to_string(), "Name is required");
    }

    #[test]
    fn test_kind_mismatch_names_field() {
        let params = vec![ParameterSpec::number("ID").required()];
        let err = extract(&params, &bag(json!({"ID": "42"}))).unwrap_err();
        assert!(matches!(err, ExtractError::Mismatch { .. }));
        assert!(err.to_string().starts_with("Invalid or missing 'ID'"));
    }

    #[test]
    fn test_defaults_apply_when_absent() {
        let params = vec![
            ParameterSpec::number("Page").default(1),
            ParameterSpec::number("PerPage").default(50),
            ParameterSpec::boolean("Backup").default(false),
        ];
        let args = extract(&params, &bag(json!({"PerPage": 10}))).unwrap();
        assert_eq!(args.integer("Page").unwrap(), 1);
        assert_eq!(args.integer("PerPage").unwrap(), 10);
        assert!(!args.bool("Backup").unwrap());
    }

    #[test]
    fn test_optional_absent_and_null() {
        let params = vec![
            ParameterSpec::string("size"),
            ParameterSpec::array("Tags", ItemKind::String),
        ];
        let args = extract(&params, &bag(json!({"size": null}))).unwrap();
        assert_eq!(args.opt_str("size").unwrap(), None);
        assert!(args.strings("Tags").unwrap().is_empty());
    }

    #[test]
    fn test_numeric_text() {
        let params = vec![
            ParameterSpec::number("page").numeric_text(),
            ParameterSpec::number("per_page"),
        ];
        let args = extract(&params, &bag(json!({"page": " 3 "}))).unwrap();
        assert_eq!(args.opt_integer("page").unwrap(), Some(3));

        let err = extract(&params, &bag(json!({"per_page": "10"}))).unwrap_err();
        assert!(err.to_string().contains("'per_page'"));

        let err = extract(&params, &bag(json!({"page": "three"}))).unwrap_err();
        assert!(err.to_string().contains("'page'"));
    }

    #[test]
    fn test_empty_lenient_text_is_absent() {
        let params = vec![ParameterSpec::number("page").numeric_text()];
        let args = extract(&params, &bag(json!({"page": ""}))).unwrap();
        assert_eq!(args.opt_integer("page").unwrap(), None);
    }

    #[test]
    fn test_boolean_text() {
        let params = vec![ParameterSpec::boolean("with_projects").boolean_text()];
        let args = extract(&params, &bag(json!({"with_projects": "TRUE"}))).unwrap();
        assert_eq!(args.opt_bool("with_projects").unwrap(), Some(true));

        let args = extract(&params, &bag(json!({"with_projects": false}))).unwrap();
        assert_eq!(args.opt_bool("with_projects").unwrap(), Some(false));

        assert!(extract(&params, &bag(json!({"with_projects": "yes"}))).is_err());
    }

    #[test]
    fn test_delimited_array_trims_and_drops_empty() {
        let params = vec![ParameterSpec::array("tags", ItemKind::String).delimited()];
        let args = extract(&params, &bag(json!({"tags": "a, b ,,c"}))).unwrap();
        assert_eq!(args.strings("tags").unwrap(), vec!["a", "b", "c"]);

        let args = extract(&params, &bag(json!({"tags": ["x", "y"]}))).unwrap();
        assert_eq!(args.strings("tags").unwrap(), vec!["x", "y"]);
    }

    #[test]
    fn test_strict_array_rejects_text_and_bad_items() {
        let params = vec![ParameterSpec::array("DropletIDs", ItemKind::Number).required()];
        assert!(extract(&params, &bag(json!({"DropletIDs": "1,2"}))).is_err());
        assert!(extract(&params, &bag(json!({"DropletIDs": [1, "two"]}))).is_err());

        let args = extract(&params, &bag(json!({"DropletIDs": [1, 2.9]}))).unwrap();
        assert_eq!(args.integers("DropletIDs").unwrap(), vec![1, 2]);
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Config {
        retention_ms: Option<i64>,
    }

    #[test]
    fn test_json_text_object() {
        let params = vec![ParameterSpec::object("config_json").json_text().shape::<Config>()];

        let args = extract(&params, &bag(json!({"config_json": "{\"retention_ms\": 1000}"}))).unwrap();
        assert_eq!(
            args.decode::<Config>("config_json").unwrap(),
            Some(Config { retention_ms: Some(1000) })
        );

        let args = extract(&params, &bag(json!({"config_json": {"retention_ms": 5}}))).unwrap();
        assert_eq!(
            args.decode::<Config>("config_json").unwrap(),
            Some(Config { retention_ms: Some(5) })
        );
    }

    #[test]
    fn test_json_text_parse_failure() {
        let params = vec![ParameterSpec::object("config_json").json_text()];
        let err = extract(&params, &bag(json!({"config_json": "{not json"}))).unwrap_err();
        assert!(matches!(err, ExtractError::Malformed { .. }));
        assert!(err.to_string().starts_with("Invalid config_json: "));
    }

    #[test]
    fn test_json_text_shape_failure() {
        let params = vec![ParameterSpec::object("config_json").json_text().shape::<Config>()];
        let err = extract(&params, &bag(json!({"config_json": "{\"retention_ms\": \"x\"}"})))
            .unwrap_err();
        assert!(err.to_string().starts_with("Invalid config_json: "));
    }

    #[test]
    fn test_integer_narrowing_truncates() {
        let params = vec![ParameterSpec::number("n").required()];
        let args = extract(&params, &bag(json!({"n": -2.7}))).unwrap();
        assert_eq!(args.integer("n").unwrap(), -2);

        let args = extract(&params, &bag(json!({"n": 1e300}))).unwrap();
        assert_eq!(args.integer("n").unwrap(), i64::MAX);
    }

    #[test]
    fn test_path_segment_rejects_dot_segments() {
        let params = vec![ParameterSpec::string("ID").required().path_segment()];

        for id in [".", ".."] {
            let err = extract(&params, &bag(json!({ "ID": id }))).unwrap_err();
            assert_eq!(err.to_string(), "Invalid ID: '.' and '..' are not valid IDs");
        }

        let args = extract(&params, &bag(json!({"ID": "../droplets/1"}))).unwrap();
        assert_eq!(args.str("ID").unwrap(), "../droplets/1");

        let plain = vec![ParameterSpec::string("Name").required()];
        assert!(extract(&plain, &bag(json!({"Name": ".."}))).is_ok());
    }

    #[test]
    fn test_undeclared_read_is_internal() {
        let args = extract(&[], &bag(json!({"extra": 1}))).unwrap();
        assert!(matches!(args.opt_str("extra"), Err(ToolError::Internal(_))));
    }

    #[test]
    fn test_list_options_unset_when_both_absent() {
        let params = vec![
            ParameterSpec::number("page").numeric_text(),
            ParameterSpec::number("per_page"),
        ];
        let args = extract(&params, &bag(json!({}))).unwrap();
        assert_eq!(args.list_options("page", "per_page").unwrap(), None);

        let args = extract(&params, &bag(json!({"page": "0"}))).unwrap();
        assert_eq!(args.list_options("page", "per_page").unwrap(), None);

        let args = extract(&params, &bag(json!({"per_page": 5}))).unwrap();
        assert_eq!(
            args.list_options("page", "per_page").unwrap(),
            Some(ListOptions {
                per_page: Some(5),
                ..Default::default()
            })
        );
    }
}
