//! Tuples: typed field values positioned against a schema.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, AttributeType};
use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::span::Span;

/// Runtime value of one tuple field. The variant must match the declared
/// [`AttributeType`] of the corresponding schema attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Field {
    Integer(i32),
    Long(i64),
    Double(f64),
    Boolean(bool),
    String(String),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    List(Vec<Span>),
    Id(String),
}

impl Field {
    pub fn field_type(&self) -> AttributeType {
        match self {
            Field::Integer(_) => AttributeType::Integer,
            Field::Long(_) => AttributeType::Long,
            Field::Double(_) => AttributeType::Double,
            Field::Boolean(_) => AttributeType::Boolean,
            Field::String(_) => AttributeType::String,
            Field::Text(_) => AttributeType::Text,
            Field::Date(_) => AttributeType::Date,
            Field::DateTime(_) => AttributeType::DateTime,
            Field::List(_) => AttributeType::List,
            Field::Id(_) => AttributeType::Id,
        }
    }

    /// Textual content for STRING/TEXT fields.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Field::String(s) | Field::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Span list for LIST fields.
    pub fn as_span_list(&self) -> Option<&[Span]> {
        match self {
            Field::List(spans) => Some(spans),
            _ => None,
        }
    }
}

/// One record flowing through the pipeline. Immutable; transformations build
/// a new tuple (and schema) rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuple {
    schema: Schema,
    fields: Vec<Field>,
}

impl Tuple {
    /// Build a tuple, checking arity and per-field type against the schema.
    pub fn new(schema: Schema, fields: Vec<Field>) -> Result<Self> {
        if fields.len() != schema.len() {
            return Err(Error::Schema(format!(
                "tuple has {} fields but schema declares {} attributes",
                fields.len(),
                schema.len()
            )));
        }
        for (attr, field) in schema.attributes().iter().zip(fields.iter()) {
            if field.field_type() != attr.attribute_type() {
                return Err(Error::Schema(format!(
                    "attribute '{}' declares {} but field holds {}",
                    attr.name(),
                    attr.attribute_type(),
                    field.field_type()
                )));
            }
        }
        Ok(Self { schema, fields })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Field value by attribute name (case-insensitive, per schema policy).
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.schema.index_of(name).map(|i| &self.fields[i])
    }

    /// New tuple with one more attribute/field pair appended. Fails on a
    /// schema name clash or a type mismatch.
    pub fn with_appended(&self, attribute: Attribute, field: Field) -> Result<Tuple> {
        if field.field_type() != attribute.attribute_type() {
            return Err(Error::Schema(format!(
                "attribute '{}' declares {} but field holds {}",
                attribute.name(),
                attribute.attribute_type(),
                field.field_type()
            )));
        }
        let schema = self.schema.with_appended(attribute)?;
        let mut fields = self.fields.clone();
        fields.push(field);
        Ok(Tuple { schema, fields })
    }
}
