//! Declared document schemas.
//!
//! A [`Schema`] is an ordered-by-declaration list of [`FieldDescriptor`]s,
//! loaded from a YAML file or built programmatically. The field order drives
//! record assembly, so generated documents carry fields in declaration order.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading a schema file
    #[error("Failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Semantic type of a document field.
///
/// The set is closed: schema type tags outside the known universe
/// deserialize to [`FieldKind::Unsupported`] carrying the original tag, and
/// are handled uniformly as unsupported during generation rather than
/// falling into a default branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Boolean field
    Bool,
    /// Array field; the element kind lives on the descriptor
    Array,
    /// BSON ObjectId field
    ObjectId,
    /// String field
    String,
    /// Date/time field
    Date,
    /// Numeric field
    Number,
    /// Any tag outside the known universe
    Unsupported(std::string::String),
}

impl FieldKind {
    /// The schema tag for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::Array => "array",
            FieldKind::ObjectId => "object_id",
            FieldKind::String => "string",
            FieldKind::Date => "date",
            FieldKind::Number => "number",
            FieldKind::Unsupported(tag) => tag,
        }
    }

    /// Parse a schema tag. Unknown tags are preserved as `Unsupported`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "bool" => FieldKind::Bool,
            "array" => FieldKind::Array,
            "object_id" => FieldKind::ObjectId,
            "string" => FieldKind::String,
            "date" => FieldKind::Date,
            "number" => FieldKind::Number,
            other => FieldKind::Unsupported(other.to_string()),
        }
    }
}

impl Serialize for FieldKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = std::string::String::deserialize(deserializer)?;
        Ok(FieldKind::from_tag(&tag))
    }
}

/// Metadata describing one declared field.
///
/// Immutable once parsed from the schema. `element` is set only for array
/// fields and names the element kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name
    pub name: String,

    /// Semantic type of the field
    #[serde(rename = "type")]
    pub kind: FieldKind,

    /// Element kind, for array fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<FieldKind>,
}

impl FieldDescriptor {
    /// Create a new field descriptor.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            element: None,
        }
    }

    /// Create a new array field descriptor with the given element kind.
    pub fn array(name: impl Into<String>, element: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Array,
            element: Some(element),
        }
    }
}

/// Declared schema for one document model.
///
/// Fields are kept in declaration order; a cached name lookup backs
/// [`Schema::get_field`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    /// Field descriptors, in declaration order
    pub fields: Vec<FieldDescriptor>,

    /// Cached field lookup (not serialized)
    #[serde(skip)]
    field_map: HashMap<String, usize>,
}

impl Schema {
    /// Create a new schema from a list of field descriptors.
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        let mut schema = Self {
            fields,
            field_map: HashMap::new(),
        };
        schema.build_field_map();
        schema
    }

    /// Load a schema from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a schema from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let mut schema: Schema = serde_yaml::from_str(yaml)?;
        schema.build_field_map();
        Ok(schema)
    }

    /// Build the internal field lookup map.
    fn build_field_map(&mut self) {
        self.field_map = self
            .fields
            .iter()
            .enumerate()
            .map(|(idx, field)| (field.name.clone(), idx))
            .collect();
    }

    /// Get a field descriptor by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.field_map
            .get(name)
            .and_then(|&idx| self.fields.get(idx))
    }

    /// Get all field names, in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Add a field to the schema.
    pub fn add_field(&mut self, field: FieldDescriptor) {
        let idx = self.fields.len();
        self.field_map.insert(field.name.clone(), idx);
        self.fields.push(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SCHEMA: &str = r#"
fields:
  - name: _id
    type: object_id
  - name: email
    type: string
  - name: age
    type: number
  - name: tags
    type: array
    element: string
  - name: createdAt
    type: date
"#;

    #[test]
    fn test_parse_schema() {
        let schema = Schema::from_yaml(SAMPLE_SCHEMA).unwrap();

        assert_eq!(schema.fields.len(), 5);
        assert_eq!(
            schema.field_names(),
            vec!["_id", "email", "age", "tags", "createdAt"]
        );

        let tags = schema.get_field("tags").unwrap();
        assert_eq!(tags.kind, FieldKind::Array);
        assert_eq!(tags.element, Some(FieldKind::String));

        let email = schema.get_field("email").unwrap();
        assert_eq!(email.kind, FieldKind::String);
        assert!(email.element.is_none());
    }

    #[test]
    fn test_unknown_type_tag_is_preserved() {
        let schema = Schema::from_yaml(
            r#"
fields:
  - name: location
    type: geo_point
"#,
        )
        .unwrap();

        let field = schema.get_field("location").unwrap();
        assert_eq!(field.kind, FieldKind::Unsupported("geo_point".to_string()));
        assert_eq!(field.kind.as_str(), "geo_point");
    }

    #[test]
    fn test_field_kind_round_trip() {
        for tag in ["bool", "array", "object_id", "string", "date", "number"] {
            let kind = FieldKind::from_tag(tag);
            assert!(!matches!(kind, FieldKind::Unsupported(_)));
            assert_eq!(kind.as_str(), tag);
        }
    }

    #[test]
    fn test_get_field_missing() {
        let schema = Schema::from_yaml(SAMPLE_SCHEMA).unwrap();
        assert!(schema.get_field("nonexistent").is_none());
    }

    #[test]
    fn test_programmatic_schema() {
        let mut schema = Schema::new(vec![FieldDescriptor::new("_id", FieldKind::ObjectId)]);
        schema.add_field(FieldDescriptor::array("scores", FieldKind::Number));

        assert_eq!(schema.field_names(), vec!["_id", "scores"]);
        assert_eq!(
            schema.get_field("scores").unwrap().element,
            Some(FieldKind::Number)
        );
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            Schema::from_yaml("fields: 12"),
            Err(SchemaError::Yaml(_))
        ));
    }
}
