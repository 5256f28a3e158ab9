//! Schema introspection.
//!
//! A record type describes its attributes through a static
//! [`AttributeSpec`] table (normally emitted by `#[derive(Record)]`).
//! [`RecordSchema::compile`] turns that table into ordered
//! [`FieldDescriptor`]s, parsing rule lists and resolving field kinds, and
//! [`schema_of`] caches the result per record type so the work happens once
//! per process.

use std::any::{type_name, TypeId};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, RwLock};

use formwork_core::{FormError, FormResult};
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::record::Record;
use crate::rules::{parse_rule_list, Rule};

/// The external-name sentinel that excludes an attribute from forms.
pub const EXCLUDED_NAME: &str = "-";

/// The scalar category of a record attribute's Rust type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarCategory {
    /// `String`, `&str`, `char`.
    Text,
    /// Any integer type.
    Integer,
    /// `f32` or `f64`.
    Float,
    /// `bool`.
    Boolean,
    /// Anything else.
    Other,
}

/// The kind of input a field is presented as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Checkbox,
    Email,
    Password,
    Hidden,
    Textarea,
}

impl FieldKind {
    /// The kind inferred from a scalar category.
    pub const fn from_category(category: ScalarCategory) -> Self {
        match category {
            ScalarCategory::Integer | ScalarCategory::Float => Self::Number,
            ScalarCategory::Boolean => Self::Checkbox,
            ScalarCategory::Text | ScalarCategory::Other => Self::Text,
        }
    }

    /// Parses an explicit kind override.
    pub fn from_override(kind: &str) -> FormResult<Self> {
        match kind {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "checkbox" => Ok(Self::Checkbox),
            "email" => Ok(Self::Email),
            "password" => Ok(Self::Password),
            "hidden" => Ok(Self::Hidden),
            "textarea" => Ok(Self::Textarea),
            other => Err(FormError::Schema(format!("Unknown field kind '{other}'"))),
        }
    }

    /// The lowercase name used in rendered output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Checkbox => "checkbox",
            Self::Email => "email",
            Self::Password => "password",
            Self::Hidden => "hidden",
            Self::Textarea => "textarea",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a record type's static attribute table.
///
/// Only annotated attributes appear in the table; unannotated ones are
/// invisible to the form engine. Built with const methods so a table can be
/// a `static`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    /// The attribute's identifier on the record.
    pub ident: &'static str,
    /// The scalar category of its type.
    pub category: ScalarCategory,
    /// The declared external name. `None` means annotated without a name.
    pub name: Option<&'static str>,
    /// The declared comma-separated rule list.
    pub rules: &'static str,
    /// The declared custom message.
    pub message: Option<&'static str>,
    /// An explicit kind override.
    pub kind: Option<&'static str>,
}

impl AttributeSpec {
    pub const fn new(ident: &'static str, category: ScalarCategory) -> Self {
        Self {
            ident,
            category,
            name: None,
            rules: "",
            message: None,
            kind: None,
        }
    }

    #[must_use]
    pub const fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    #[must_use]
    pub const fn excluded(self) -> Self {
        self.named(EXCLUDED_NAME)
    }

    #[must_use]
    pub const fn rules(mut self, rules: &'static str) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub const fn message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }

    #[must_use]
    pub const fn kind(mut self, kind: &'static str) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Compiled metadata for one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// External name. Unique within a schema.
    pub name: String,
    /// The record attribute this field writes back to, if any.
    pub attribute: Option<String>,
    pub category: ScalarCategory,
    pub kind: FieldKind,
    /// `true` when the attribute carries the exclusion sentinel.
    pub skip: bool,
    /// `true` when the attribute was annotated without an external name.
    pub hidden_by_default: bool,
    /// Built-in rules in declaration order.
    pub rules: Vec<Rule>,
    /// Custom message template shared by every rule on this field.
    pub message: Option<String>,
}

impl FieldDescriptor {
    /// Creates a descriptor for a field not backed by a record attribute.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            attribute: None,
            category: ScalarCategory::Text,
            kind,
            skip: false,
            hidden_by_default: kind == FieldKind::Hidden,
            rules: Vec::new(),
            message: None,
        }
    }

    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden_by_default = hidden;
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Compiles one attribute table entry.
    pub fn from_spec(spec: &AttributeSpec) -> FormResult<Self> {
        let skip = spec.name == Some(EXCLUDED_NAME);
        let hidden_by_default = spec.name.is_none() && !skip;
        let name = spec.name.unwrap_or(spec.ident);

        let rules = parse_rule_list(spec.rules).map_err(|e| match e {
            FormError::Schema(reason) => {
                FormError::Schema(format!("Attribute '{}': {reason}", spec.ident))
            }
            other => other,
        })?;

        let kind = match spec.kind {
            Some(kind) => FieldKind::from_override(kind)?,
            None => FieldKind::from_category(spec.category),
        };

        Ok(Self {
            name: name.to_string(),
            attribute: Some(spec.ident.to_string()),
            category: spec.category,
            kind,
            skip,
            hidden_by_default: hidden_by_default || kind == FieldKind::Hidden,
            rules,
            message: spec.message.map(str::to_string),
        })
    }
}

/// The ordered field descriptors of one record type.
///
/// Descriptors are shared read-only with every form built from the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    type_name: &'static str,
    fields: Vec<Arc<FieldDescriptor>>,
}

impl RecordSchema {
    /// Compiles an attribute table, in declaration order.
    ///
    /// Excluded attributes are kept (flagged `skip`) so their absence from
    /// forms stays explicit. Two non-excluded attributes sharing an external
    /// name is a schema error.
    pub fn compile(type_name: &'static str, specs: &[AttributeSpec]) -> FormResult<Self> {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(specs.len());

        for spec in specs {
            let descriptor = FieldDescriptor::from_spec(spec)?;
            if !descriptor.skip && !seen.insert(descriptor.name.clone()) {
                return Err(FormError::Schema(format!(
                    "Duplicate field name '{}' on {type_name}",
                    descriptor.name
                )));
            }
            fields.push(Arc::new(descriptor));
        }

        Ok(Self { type_name, fields })
    }

    /// The Rust type name this schema was compiled for.
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Every descriptor, excluded ones included.
    pub fn descriptors(&self) -> &[Arc<FieldDescriptor>] {
        &self.fields
    }

    /// Descriptors that become form fields.
    pub fn form_fields(&self) -> impl Iterator<Item = &Arc<FieldDescriptor>> {
        self.fields.iter().filter(|d| !d.skip)
    }

    /// Looks up a descriptor by external name.
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.form_fields().find(|d| d.name == name).map(|d| &**d)
    }
}

type SchemaCache = RwLock<HashMap<TypeId, Arc<RecordSchema>>>;

static SCHEMAS: Lazy<SchemaCache> = Lazy::new(|| RwLock::new(HashMap::new()));

/// Returns the compiled schema for `R`, compiling it on first use.
///
/// Successful compilations are cached for the life of the process; a schema
/// error is returned again on every call.
pub fn schema_of<R: Record>() -> FormResult<Arc<RecordSchema>> {
    let key = TypeId::of::<R>();

    if let Ok(cache) = SCHEMAS.read() {
        if let Some(schema) = cache.get(&key) {
            return Ok(Arc::clone(schema));
        }
    }

    let schema = Arc::new(RecordSchema::compile(type_name::<R>(), R::attributes())?);
    tracing::debug!(
        record = schema.type_name(),
        fields = schema.form_fields().count(),
        "Compiled record schema"
    );

    match SCHEMAS.write() {
        Ok(mut cache) => Ok(Arc::clone(cache.entry(key).or_insert(schema))),
        Err(_) => Ok(schema),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNUP: &[AttributeSpec] = &[
        AttributeSpec::new("username", ScalarCategory::Text)
            .named("username")
            .rules("required,min=3"),
        AttributeSpec::new("age", ScalarCategory::Integer).named("age"),
        AttributeSpec::new("subscribed", ScalarCategory::Boolean).named("subscribed"),
        AttributeSpec::new("secret", ScalarCategory::Text).excluded(),
        AttributeSpec::new("session", ScalarCategory::Other),
    ];

    #[test]
    fn test_compile_preserves_order() {
        let schema = RecordSchema::compile("Signup", SIGNUP).unwrap();
        let names: Vec<&str> = schema.descriptors().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["username", "age", "subscribed", "-", "session"]);
    }

    #[test]
    fn test_kind_inference() {
        let schema = RecordSchema::compile("Signup", SIGNUP).unwrap();
        assert_eq!(schema.get("username").unwrap().kind, FieldKind::Text);
        assert_eq!(schema.get("age").unwrap().kind, FieldKind::Number);
        assert_eq!(schema.get("subscribed").unwrap().kind, FieldKind::Checkbox);
        assert_eq!(schema.get("session").unwrap().kind, FieldKind::Text);
    }

    #[test]
    fn test_excluded_attribute_is_skipped() {
        let schema = RecordSchema::compile("Signup", SIGNUP).unwrap();
        assert!(schema.descriptors()[3].skip);
        assert_eq!(schema.form_fields().count(), 4);
        assert!(schema.get("-").is_none());
        assert!(schema.get("secret").is_none());
    }

    #[test]
    fn test_unnamed_attribute_is_hidden() {
        let schema = RecordSchema::compile("Signup", SIGNUP).unwrap();
        let session = schema.get("session").unwrap();
        assert!(session.hidden_by_default);
        assert_eq!(session.attribute.as_deref(), Some("session"));
        assert!(!schema.get("username").unwrap().hidden_by_default);
    }

    #[test]
    fn test_rules_parsed() {
        let schema = RecordSchema::compile("Signup", SIGNUP).unwrap();
        assert_eq!(
            schema.get("username").unwrap().rules,
            vec![Rule::Required, Rule::Min(3)]
        );
        assert!(schema.get("age").unwrap().rules.is_empty());
    }

    #[test]
    fn test_unknown_rule_is_schema_error() {
        let specs = [AttributeSpec::new("code", ScalarCategory::Text)
            .named("code")
            .rules("required,uppercase")];
        let err = RecordSchema::compile("Bad", &specs).unwrap_err();
        assert!(matches!(err, FormError::Schema(_)));
        assert!(err.to_string().contains("code"));
    }

    #[test]
    fn test_duplicate_name_is_schema_error() {
        let specs = [
            AttributeSpec::new("a", ScalarCategory::Text).named("x"),
            AttributeSpec::new("b", ScalarCategory::Text).named("x"),
        ];
        assert!(matches!(
            RecordSchema::compile("Dup", &specs),
            Err(FormError::Schema(_))
        ));
    }

    #[test]
    fn test_multiple_excluded_attributes_allowed() {
        let specs = [
            AttributeSpec::new("a", ScalarCategory::Text).excluded(),
            AttributeSpec::new("b", ScalarCategory::Text).excluded(),
        ];
        let schema = RecordSchema::compile("Excluded", &specs).unwrap();
        assert_eq!(schema.form_fields().count(), 0);
    }

    #[test]
    fn test_kind_override() {
        let specs = [
            AttributeSpec::new("password", ScalarCategory::Text)
                .named("password")
                .kind("password"),
            AttributeSpec::new("token", ScalarCategory::Text)
                .named("token")
                .kind("hidden"),
        ];
        let schema = RecordSchema::compile("Login", &specs).unwrap();
        assert_eq!(schema.get("password").unwrap().kind, FieldKind::Password);
        assert!(schema.get("token").unwrap().hidden_by_default);
    }

    #[test]
    fn test_unknown_kind_override() {
        let specs = [AttributeSpec::new("x", ScalarCategory::Text).kind("slider")];
        assert!(RecordSchema::compile("Bad", &specs).is_err());
    }

    #[test]
    fn test_field_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(FieldKind::Checkbox).unwrap(),
            serde_json::json!("checkbox")
        );
        assert_eq!(FieldKind::Textarea.to_string(), "textarea");
    }

    #[test]
    fn test_programmatic_descriptor() {
        let d = FieldDescriptor::new("nonce", FieldKind::Hidden);
        assert!(d.hidden_by_default);
        assert!(d.attribute.is_none());
        let d = FieldDescriptor::new("note", FieldKind::Textarea)
            .with_rules(vec![Rule::Max(200)])
            .with_message("Too long");
        assert!(!d.hidden_by_default);
        assert_eq!(d.message.as_deref(), Some("Too long"));
    }
}
