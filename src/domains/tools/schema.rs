//! Parameter declarations and the JSON schema advertised for them.
//!
//! A [`ParameterSpec`] is the single source of truth for a field: the
//! extractor coerces against it and `tools/list` advertises it. Lenient
//! text forms (numeric text, boolean text, delimited arrays, JSON text) are
//! opt-in per field and show up in the schema as union types.

use rmcp::model::JsonObject;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// Element kind of an array parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    String,
    Number,
    Object,
}

impl ItemKind {
    fn json_type(self) -> &'static str {
        match self {
            ItemKind::String => "string",
            ItemKind::Number => "number",
            ItemKind::Object => "object",
        }
    }
}

/// Declared kind of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Number,
    Boolean,
    Array(ItemKind),
    Object,
}

impl ParamKind {
    fn json_type(self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
            ParamKind::Array(_) => "array",
            ParamKind::Object => "object",
        }
    }

    /// Human readable expectation used in mismatch messages.
    pub(crate) fn expectation(self, accept_text: bool) -> &'static str {
        match (self, accept_text) {
            (ParamKind::String, _) => "a string",
            (ParamKind::Number, false) => "a number",
            (ParamKind::Number, true) => "a number or numeric string",
            (ParamKind::Boolean, false) => "a boolean",
            (ParamKind::Boolean, true) => "a boolean or \"true\"/\"false\"",
            (ParamKind::Array(ItemKind::String), false) => "an array of strings",
            (ParamKind::Array(ItemKind::String), true) => {
                "an array of strings or a comma-separated string"
            }
            (ParamKind::Array(ItemKind::Number), false) => "an array of numbers",
            (ParamKind::Array(ItemKind::Number), true) => {
                "an array of numbers or a comma-separated string"
            }
            (ParamKind::Array(ItemKind::Object), false) => "an array of objects",
            (ParamKind::Array(ItemKind::Object), true) => {
                "an array of objects or a JSON array string"
            }
            (ParamKind::Object, false) => "an object",
            (ParamKind::Object, true) => "an object or a JSON object string",
        }
    }
}

/// Lenient text form a field accepts besides its native JSON kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextForm {
    /// `"42"` for a number.
    Numeric,
    /// `"true"`/`"false"` for a boolean.
    Boolean,
    /// `"a, b"` for an array of strings or numbers.
    Delimited,
    /// Serialized JSON for an object or an array of objects.
    Json,
}

impl TextForm {
    /// Whether this form can stand in for a value of `kind`.
    pub fn fits(self, kind: ParamKind) -> bool {
        matches!(
            (self, kind),
            (TextForm::Numeric, ParamKind::Number)
                | (TextForm::Boolean, ParamKind::Boolean)
                | (
                    TextForm::Delimited,
                    ParamKind::Array(ItemKind::String | ItemKind::Number)
                )
                | (TextForm::Json, ParamKind::Object | ParamKind::Array(ItemKind::Object))
        )
    }
}

/// Checks that a structured value deserializes into a typed shape.
pub type ShapeCheck = fn(&Value) -> Result<(), String>;

fn check_shape<T: DeserializeOwned>(value: &Value) -> Result<(), String> {
    T::deserialize(value).map(|_| ()).map_err(|e| e.to_string())
}

/// Declaration of one accepted field.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    name: String,
    kind: ParamKind,
    required: bool,
    missing_message: Option<String>,
    default: Option<Value>,
    text_form: Option<TextForm>,
    description: Option<String>,
    items: Option<Value>,
    shape: Option<ShapeCheck>,
    path_segment: bool,
}

impl ParameterSpec {
    fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            missing_message: None,
            default: None,
            text_form: None,
            description: None,
            items: None,
            shape: None,
            path_segment: false,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::String)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Boolean)
    }

    pub fn array(name: impl Into<String>, items: ItemKind) -> Self {
        Self::new(name, ParamKind::Array(items))
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Object)
    }

    /// Mark as required; absence fails with `"<name> is required"`.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark as required with a tool-specific message.
    ///
    /// The message must mention the field name; registration rejects it
    /// otherwise.
    pub fn required_with(mut self, message: impl Into<String>) -> Self {
        self.required = true;
        self.missing_message = Some(message.into());
        self
    }

    /// Value used when the field is absent.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Also accept a string holding a number.
    pub fn numeric_text(mut self) -> Self {
        self.text_form = Some(TextForm::Numeric);
        self
    }

    /// Also accept the strings `"true"` and `"false"`.
    pub fn boolean_text(mut self) -> Self {
        self.text_form = Some(TextForm::Boolean);
        self
    }

    /// Also accept a comma-separated string.
    pub fn delimited(mut self) -> Self {
        self.text_form = Some(TextForm::Delimited);
        self
    }

    /// Also accept a string holding serialized JSON.
    pub fn json_text(mut self) -> Self {
        self.text_form = Some(TextForm::Json);
        self
    }

    /// Require objects (or each array element) to decode into `T`.
    pub fn shape<T: DeserializeOwned>(mut self) -> Self {
        self.shape = Some(check_shape::<T>);
        self
    }

    /// The value lands in a request path; `.` and `..` are rejected.
    pub fn path_segment(mut self) -> Self {
        self.path_segment = true;
        self
    }

    /// Schema advertised for array elements.
    pub fn items(mut self, schema: Value) -> Self {
        self.items = Some(schema);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn accepts_text(&self) -> bool {
        self.text_form.is_some()
    }

    pub fn text_form(&self) -> Option<TextForm> {
        self.text_form
    }

    pub fn is_path_segment(&self) -> bool {
        self.path_segment
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub(crate) fn shape_check(&self) -> Option<ShapeCheck> {
        self.shape
    }

    pub(crate) fn custom_message(&self) -> Option<&str> {
        self.missing_message.as_deref()
    }

    /// Message reported when a required field is absent.
    pub fn missing_message(&self) -> String {
        self.missing_message
            .clone()
            .unwrap_or_else(|| format!("{} is required", self.name))
    }

    pub(crate) fn set_default(&mut self, value: Value) {
        self.default = Some(value);
    }

    /// JSON schema fragment for this field.
    pub fn property_schema(&self) -> Value {
        let mut schema = JsonObject::new();

        let base = self.kind.json_type();
        if self.accepts_text() && self.kind != ParamKind::String {
            schema.insert("type".into(), json!([base, "string"]));
        } else {
            schema.insert("type".into(), json!(base));
        }

        if let ParamKind::Array(item) = self.kind {
            let items = self
                .items
                .clone()
                .unwrap_or_else(|| json!({ "type": item.json_type() }));
            schema.insert("items".into(), items);
        }
        if let Some(description) = &self.description {
            schema.insert("description".into(), json!(description));
        }
        if let Some(default) = &self.default {
            schema.insert("default".into(), default.clone());
        }

        Value::Object(schema)
    }
}

/// Build the `inputSchema` object for a parameter list.
///
/// Fields that are required and have no default are listed as required.
pub fn input_schema(params: &[ParameterSpec]) -> JsonObject {
    let mut properties = JsonObject::new();
    let mut required = Vec::new();

    for param in params {
        properties.insert(param.name.clone(), param.property_schema());
        if param.required && param.default.is_none() {
            required.push(Value::String(param.name.clone()));
        }
    }

    let mut schema = JsonObject::new();
    schema.insert("type".into(), json!("object"));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".into(), Value::Array(required));
    }
    schema
}
