use std::fmt;

use serde_json::{Map, Value};

use crate::error::Result;

/// Leaf types a schema can demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Number,
    Integer,
    Boolean,
}

impl PrimitiveKind {
    /// Resolve a schema `type` token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected shape at one position of a payload.
///
/// Built once from a schema document and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// Closed object. Every field is required; no other keys are allowed.
    /// Field order follows the source document.
    Object { fields: Vec<(String, SchemaNode)> },
    /// Homogeneous array. `None` accepts any contents.
    Array { items: Option<Box<SchemaNode>> },
    Primitive(PrimitiveKind),
    /// No type declared; accepts any value, including null.
    Unknown,
}

impl SchemaNode {
    /// Normalize a stored schema document.
    ///
    /// Text documents are parsed first; parse failures are returned as
    /// [`SchemaError::Malformed`](crate::SchemaError::Malformed).
    pub fn from_document(document: &SchemaDocument) -> Result<Self> {
        match document {
            SchemaDocument::Text(text) => {
                let value: Value = serde_json::from_str(text)?;
                Ok(Self::from_value(&value))
            }
            SchemaDocument::Value(value) => Ok(Self::from_value(value)),
        }
    }

    /// Normalize a parsed schema document.
    ///
    /// A root declaring a recognized type (`object` with `properties`,
    /// `array`, or a primitive) is read as a typed schema; anything else,
    /// including a mapping whose own `type` key is payload data, is read as
    /// a structure template.
    pub fn from_value(value: &Value) -> Self {
        if is_typed_schema(value) {
            Self::from_typed(value)
        } else {
            Self::from_template(value)
        }
    }

    /// Normalize a typed schema node (`type`, `properties`, `items`).
    pub fn from_typed(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::Unknown;
        };
        let Some(token) = map.get("type").and_then(Value::as_str) else {
            return Self::Unknown;
        };

        match token {
            "object" => match map.get("properties") {
                Some(Value::Object(properties)) => Self::Object {
                    fields: properties
                        .iter()
                        .map(|(name, property)| (name.clone(), Self::from_typed(property)))
                        .collect(),
                },
                _ => Self::Unknown,
            },
            "array" => Self::Array {
                items: map
                    .get("items")
                    .map(|items| Box::new(Self::from_typed(items))),
            },
            other => PrimitiveKind::from_token(other)
                .map(Self::Primitive)
                .unwrap_or(Self::Unknown),
        }
    }

    /// Normalize a structure template: mappings become objects, arrays take
    /// their first element as the item shape, and leaves accept anything.
    pub fn from_template(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::Object {
                fields: template_fields(map),
            },
            Value::Array(items) => Self::Array {
                items: items
                    .first()
                    .map(|first| Box::new(Self::from_template_child(first))),
            },
            _ => Self::Unknown,
        }
    }

    fn from_template_child(value: &Value) -> Self {
        if is_typed_schema(value) && has_only_schema_keys(value) {
            Self::from_typed(value)
        } else {
            Self::from_template(value)
        }
    }

    /// Look up a declared object field.
    pub fn field(&self, name: &str) -> Option<&SchemaNode> {
        match self {
            Self::Object { fields } => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, node)| node),
            _ => None,
        }
    }

    /// Nesting depth of the tree; leaves are depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Self::Object { fields } => {
                1 + fields
                    .iter()
                    .map(|(_, node)| node.depth())
                    .max()
                    .unwrap_or(0)
            }
            Self::Array { items: Some(items) } => 1 + items.depth(),
            _ => 1,
        }
    }
}

fn template_fields(map: &Map<String, Value>) -> Vec<(String, SchemaNode)> {
    map.iter()
        .map(|(name, value)| (name.clone(), SchemaNode::from_template_child(value)))
        .collect()
}

const SCHEMA_KEYS: [&str; 4] = ["type", "properties", "items", "required"];

fn is_typed_schema(value: &Value) -> bool {
    let Some(map) = value.as_object() else {
        return false;
    };
    match map.get("type").and_then(Value::as_str) {
        Some("object") => matches!(map.get("properties"), Some(Value::Object(_))),
        Some("array") => true,
        Some(token) => PrimitiveKind::from_token(token).is_some(),
        None => false,
    }
}

fn has_only_schema_keys(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.keys().all(|key| SCHEMA_KEYS.contains(&key.as_str())))
}

/// A stored schema document as delivered by a store or cache.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaDocument {
    /// Serialized JSON, parsed on use.
    Text(String),
    /// Already-parsed JSON.
    Value(Value),
}

impl SchemaDocument {
    /// Serialized form, suitable for caching.
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Value(value) => value.to_string(),
        }
    }

    /// Parsed form for reporting. Text that does not parse is returned as a
    /// JSON string so the caller still sees what was stored.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Text(text) => {
                serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.clone()))
            }
            Self::Value(value) => value.clone(),
        }
    }
}

impl From<String> for SchemaDocument {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for SchemaDocument {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Value> for SchemaDocument {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::SchemaError;

    fn field_names(node: &SchemaNode) -> Vec<&str> {
        match node {
            SchemaNode::Object { fields } => fields.iter().map(|(name, _)| name.as_str()).collect(),
            other => panic!("expected object node, got {other:?}"),
        }
    }

    #[test]
    fn typed_object_normalizes_recursively() {
        let node = SchemaNode::from_value(&json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "age": { "type": "integer" },
                "address": {
                    "type": "object",
                    "properties": {
                        "zip": { "type": "string" }
                    }
                }
            }
        }));

        assert_eq!(field_names(&node), vec!["name", "age", "address"]);
        assert_eq!(
            node.field("age"),
            Some(&SchemaNode::Primitive(PrimitiveKind::Integer))
        );
        let address = node.field("address").unwrap();
        assert_eq!(
            address.field("zip"),
            Some(&SchemaNode::Primitive(PrimitiveKind::String))
        );
        assert_eq!(node.depth(), 3);
    }

    #[test]
    fn arrays_with_and_without_items() {
        let node = SchemaNode::from_value(&json!({
            "type": "object",
            "properties": {
                "tags": { "type": "array", "items": { "type": "string" } },
                "blob": { "type": "array" }
            }
        }));

        assert_eq!(
            node.field("tags"),
            Some(&SchemaNode::Array {
                items: Some(Box::new(SchemaNode::Primitive(PrimitiveKind::String)))
            })
        );
        assert_eq!(node.field("blob"), Some(&SchemaNode::Array { items: None }));
    }

    #[test]
    fn unrecognized_or_missing_type_is_unknown() {
        let node = SchemaNode::from_value(&json!({
            "type": "object",
            "properties": {
                "anything": {},
                "nullable": { "type": ["string", "null"] },
                "odd": { "type": "uuid" },
                "bare_object": { "type": "object" }
            }
        }));

        for name in ["anything", "nullable", "odd", "bare_object"] {
            assert_eq!(node.field(name), Some(&SchemaNode::Unknown), "{name}");
        }
    }

    #[test]
    fn required_list_does_not_relax_closed_objects() {
        let node = SchemaNode::from_value(&json!({
            "type": "object",
            "properties": {
                "a": { "type": "string" },
                "b": { "type": "string" }
            },
            "required": ["a"]
        }));

        assert_eq!(field_names(&node), vec!["a", "b"]);
    }

    #[test]
    fn template_documents_normalize_structurally() {
        let node = SchemaNode::from_value(&json!({
            "id": null,
            "tags": [],
            "items": [{ "sku": null }],
            "meta": { "source": null },
            "count": { "type": "integer" }
        }));

        assert_eq!(node.field("id"), Some(&SchemaNode::Unknown));
        assert_eq!(node.field("tags"), Some(&SchemaNode::Array { items: None }));
        assert_eq!(
            node.field("items"),
            Some(&SchemaNode::Array {
                items: Some(Box::new(SchemaNode::Object {
                    fields: vec![("sku".to_string(), SchemaNode::Unknown)]
                }))
            })
        );
        assert_eq!(field_names(node.field("meta").unwrap()), vec!["source"]);
        assert_eq!(
            node.field("count"),
            Some(&SchemaNode::Primitive(PrimitiveKind::Integer))
        );
    }

    #[test]
    fn payload_type_fields_stay_in_template_form() {
        let node = SchemaNode::from_value(&json!({
            "type": "admin",
            "id": null,
            "roles": []
        }));
        assert_eq!(field_names(&node), vec!["type", "id", "roles"]);
        assert_eq!(node.field("type"), Some(&SchemaNode::Unknown));

        let node = SchemaNode::from_value(&json!({
            "event": { "type": "click", "x": null },
            "kind": { "type": "string", "label": null }
        }));
        assert_eq!(field_names(node.field("event").unwrap()), vec!["type", "x"]);
        assert_eq!(field_names(node.field("kind").unwrap()), vec!["type", "label"]);
    }

    #[test]
    fn typed_root_needs_a_recognized_type() {
        assert_eq!(
            SchemaNode::from_value(&json!({ "type": "array" })),
            SchemaNode::Array { items: None }
        );
        assert_eq!(
            SchemaNode::from_value(&json!({ "type": "boolean" })),
            SchemaNode::Primitive(PrimitiveKind::Boolean)
        );
        // Without `properties` an object declaration is plain template data.
        assert_eq!(
            field_names(&SchemaNode::from_value(&json!({ "type": "object" }))),
            vec!["type"]
        );
    }

    #[test]
    fn text_documents_are_parsed() {
        let document = SchemaDocument::from(r#"{"type":"string"}"#);
        assert_eq!(
            SchemaNode::from_document(&document).unwrap(),
            SchemaNode::Primitive(PrimitiveKind::String)
        );

        let broken = SchemaDocument::from("{not json");
        assert!(matches!(
            SchemaNode::from_document(&broken),
            Err(SchemaError::Malformed(_))
        ));
    }

    #[test]
    fn document_value_and_text_forms() {
        let value = json!({ "type": "object", "properties": {} });
        let document = SchemaDocument::from(value.clone());
        assert_eq!(document.to_value(), value);
        assert_eq!(SchemaDocument::from(document.to_text()).to_value(), value);

        let broken = SchemaDocument::from("{not json");
        assert_eq!(broken.to_value(), Value::String("{not json".to_string()));
    }

    #[test]
    fn primitive_tokens_round_trip() {
        for kind in [
            PrimitiveKind::String,
            PrimitiveKind::Number,
            PrimitiveKind::Integer,
            PrimitiveKind::Boolean,
        ] {
            assert_eq!(PrimitiveKind::from_token(kind.as_str()), Some(kind));
        }
        assert_eq!(PrimitiveKind::from_token("null"), None);
    }
}
