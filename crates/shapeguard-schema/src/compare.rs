use serde_json::{Map, Value};

use crate::config::CompareConfig;
use crate::error::{Result, SchemaError};
use crate::node::{PrimitiveKind, SchemaDocument, SchemaNode};
use crate::result::ComparisonResult;

const NULL_REASON: &str = "Property exists in schema but is null/undefined in payload";
const MISSING_REASON: &str = "Missing required property";
const UNEXPECTED_REASON: &str = "Unexpected property not defined in schema";
const EXPECTED_PREFIX: &str = "Expected ";

/// Leading text of every reason the comparator emits after `"<path>: "`.
pub const REASON_PREFIXES: [&str; 4] =
    [NULL_REASON, MISSING_REASON, UNEXPECTED_REASON, EXPECTED_PREFIX];

/// Compare a payload against a schema tree with default limits.
pub fn compare(schema: &SchemaNode, payload: &Value) -> ComparisonResult {
    Comparator::new().compare(schema, payload)
}

/// Normalize a schema document and compare a payload against it with
/// default limits.
pub fn compare_document(document: &SchemaDocument, payload: &Value) -> ComparisonResult {
    Comparator::new().compare_document(document, payload)
}

/// Stateless structural comparator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Comparator {
    config: CompareConfig,
}

impl Comparator {
    pub fn new() -> Self {
        Self::with_config(CompareConfig::default())
    }

    pub fn with_config(config: CompareConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    /// Compare a payload against a schema tree.
    ///
    /// Never fails: internal errors are folded into an
    /// `InternalComparisonFailure` result.
    pub fn compare(&self, schema: &SchemaNode, payload: &Value) -> ComparisonResult {
        match self.differences(schema, payload) {
            Ok(differences) => ComparisonResult::from_differences(differences),
            Err(err) => {
                tracing::error!(error = %err, "schema comparison aborted");
                ComparisonResult::from(err)
            }
        }
    }

    /// Normalize a schema document, then compare.
    pub fn compare_document(&self, document: &SchemaDocument, payload: &Value) -> ComparisonResult {
        match SchemaNode::from_document(document) {
            Ok(schema) => self.compare(&schema, payload),
            Err(err) => {
                tracing::debug!(error = %err, "schema document rejected");
                ComparisonResult::from(err)
            }
        }
    }

    /// Collect every difference between payload and schema, in traversal
    /// order.
    pub fn differences(&self, schema: &SchemaNode, payload: &Value) -> Result<Vec<String>> {
        let mut walker = Walker {
            max_depth: self.config.max_depth,
            differences: Vec::new(),
        };
        walker.walk(schema, payload, "", 0)?;
        Ok(walker.differences)
    }
}

struct Walker {
    max_depth: usize,
    differences: Vec<String>,
}

impl Walker {
    fn walk(
        &mut self,
        node: &SchemaNode,
        value: &Value,
        path: &str,
        depth: usize,
    ) -> Result<bool> {
        if depth > self.max_depth {
            return Err(SchemaError::DepthExceeded {
                max: self.max_depth,
                path: path.to_string(),
            });
        }

        if matches!(node, SchemaNode::Unknown) {
            return Ok(true);
        }

        if value.is_null() {
            self.report(path, NULL_REASON);
            return Ok(false);
        }

        match node {
            SchemaNode::Unknown => Ok(true),
            SchemaNode::Primitive(kind) => Ok(self.check_primitive(*kind, value, path)),
            SchemaNode::Array { items } => match value {
                Value::Array(elements) => match items {
                    Some(item_schema) => self.walk_elements(item_schema, elements, path, depth),
                    None => Ok(true),
                },
                other => {
                    self.report(path, &format!("Expected array but got {}", kind_of(other)));
                    Ok(false)
                }
            },
            SchemaNode::Object { fields } => match value {
                Value::Object(map) => self.walk_object(fields, map, path, depth),
                other => {
                    self.report(path, &format!("Expected object but got {}", kind_of(other)));
                    Ok(false)
                }
            },
        }
    }

    fn walk_elements(
        &mut self,
        item_schema: &SchemaNode,
        elements: &[Value],
        path: &str,
        depth: usize,
    ) -> Result<bool> {
        let mut all_match = true;
        for (index, element) in elements.iter().enumerate() {
            let element_path = format!("{path}[{index}]");
            if !self.walk(item_schema, element, &element_path, depth + 1)? {
                all_match = false;
            }
        }
        Ok(all_match)
    }

    fn walk_object(
        &mut self,
        fields: &[(String, SchemaNode)],
        map: &Map<String, Value>,
        path: &str,
        depth: usize,
    ) -> Result<bool> {
        let mut all_match = true;

        for (name, _) in fields {
            if !map.contains_key(name) {
                self.report(&format!("{path}.{name}"), MISSING_REASON);
                all_match = false;
            }
        }

        for key in map.keys() {
            if !fields.iter().any(|(name, _)| name == key) {
                self.report(&format!("{path}.{key}"), UNEXPECTED_REASON);
                all_match = false;
            }
        }

        for (name, child) in fields {
            if let Some(child_value) = map.get(name) {
                let child_path = format!("{path}.{name}");
                if !self.walk(child, child_value, &child_path, depth + 1)? {
                    all_match = false;
                }
            }
        }

        Ok(all_match)
    }

    fn check_primitive(&mut self, kind: PrimitiveKind, value: &Value, path: &str) -> bool {
        let conforms = match kind {
            PrimitiveKind::String => value.is_string(),
            PrimitiveKind::Number => value.is_number(),
            PrimitiveKind::Integer => is_integral(value),
            PrimitiveKind::Boolean => value.is_boolean(),
        };
        if !conforms {
            self.report(
                path,
                &format!("Expected {kind} but got {} ({value})", kind_of(value)),
            );
        }
        conforms
    }

    fn report(&mut self, path: &str, reason: &str) {
        self.differences.push(format!("{path}: {reason}"));
    }
}

fn is_integral(value: &Value) -> bool {
    match value {
        Value::Number(number) => {
            number.is_i64()
                || number.is_u64()
                || number
                    .as_f64()
                    .is_some_and(|float| float.is_finite() && float.fract() == 0.0)
        }
        _ => false,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
