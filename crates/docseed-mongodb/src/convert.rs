//! Conversion between generated values and BSON.

use bson::{Bson, Document};
use docseed_core::{FieldValue, Record};
use std::collections::HashMap;
use tracing::warn;

/// Convert a generated value to BSON.
pub fn field_value_to_bson(value: &FieldValue) -> Bson {
    match value {
        FieldValue::Bool(b) => Bson::Boolean(*b),
        FieldValue::Int(i) => Bson::Int64(*i),
        FieldValue::Double(d) => Bson::Double(*d),
        FieldValue::String(s) => Bson::String(s.clone()),
        FieldValue::Date(d) => Bson::DateTime(bson::DateTime::from_chrono(*d)),
        FieldValue::ObjectId(oid) => Bson::ObjectId(*oid),
        FieldValue::Array(items) => {
            Bson::Array(items.iter().map(field_value_to_bson).collect())
        }
        FieldValue::Object(map) => Bson::Document(
            map.iter()
                .map(|(key, value)| (key.clone(), field_value_to_bson(value)))
                .collect(),
        ),
        FieldValue::Null => Bson::Null,
    }
}

/// Convert a BSON value back to a generated value.
///
/// BSON kinds outside the value universe (regexes, code, decimals, ...)
/// degrade to `Null` with a warning; tapped-in records stay usable as
/// dependency sources either way.
pub fn bson_to_field_value(value: &Bson) -> FieldValue {
    match value {
        Bson::Boolean(b) => FieldValue::Bool(*b),
        Bson::Int32(i) => FieldValue::Int(*i as i64),
        Bson::Int64(i) => FieldValue::Int(*i),
        Bson::Double(d) => FieldValue::Double(*d),
        Bson::String(s) => FieldValue::String(s.clone()),
        Bson::DateTime(d) => FieldValue::Date(d.to_chrono()),
        Bson::ObjectId(oid) => FieldValue::ObjectId(*oid),
        Bson::Array(items) => {
            FieldValue::Array(items.iter().map(bson_to_field_value).collect())
        }
        Bson::Document(doc) => FieldValue::Object(
            doc.iter()
                .map(|(key, value)| (key.clone(), bson_to_field_value(value)))
                .collect::<HashMap<_, _>>(),
        ),
        Bson::Null => FieldValue::Null,
        other => {
            warn!("unrepresentable BSON value {:?}; storing null", other.element_type());
            FieldValue::Null
        }
    }
}

/// Convert a generated record to a BSON document.
pub fn record_to_document(record: &Record) -> Document {
    let mut document = Document::new();
    for (field, value) in record {
        document.insert(field, field_value_to_bson(value));
    }
    document
}

/// Convert a BSON document to a record (the tap-in direction).
pub fn document_to_record(document: &Document) -> Record {
    document
        .iter()
        .map(|(field, value)| (field.clone(), bson_to_field_value(value)))
        .collect()
}
