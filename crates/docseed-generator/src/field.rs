//! Per-field value generation.

use crate::options::{FieldOptions, StringKind};
use crate::{random, resolve};
use bson::oid::ObjectId;
use docseed_core::{DataPool, FieldDescriptor, FieldKind, FieldValue};
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{error, warn};

/// Retry ceiling for uniqueness-constrained generation.
pub const MAX_UNIQUE_ATTEMPTS: usize = 100;

/// Error type for generation operations.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Array field with no declared element kind and no element options
    #[error("cannot infer the array element type and no element options were given for field '{0}'")]
    UntypedArray(String),
}

/// Generates values for one declared field.
///
/// A generator is created lazily per field and cached for the whole model
/// run, so the uniqueness seen-set accumulates across every record of that
/// model. The seen-set is keyed by the value's string form and is shared
/// between a container array and its elements.
pub struct FieldGenerator {
    name: String,
    kind: FieldKind,
    element: Option<FieldKind>,
    options: Option<Rc<FieldOptions>>,
    seen: HashSet<String>,
}

impl FieldGenerator {
    /// Create a generator for a declared field with its configured options.
    ///
    /// A `treat_as` override in the options replaces the declared kind.
    pub fn new(descriptor: &FieldDescriptor, options: Option<FieldOptions>) -> Self {
        let options = options.map(Rc::new);
        let kind = options
            .as_ref()
            .and_then(|o| o.treat_as.clone())
            .unwrap_or_else(|| descriptor.kind.clone());
        Self {
            name: descriptor.name.clone(),
            kind,
            element: descriptor.element.clone(),
            options,
            seen: HashSet::new(),
        }
    }

    /// The field name this generator serves.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The configured inclusion probability, if any.
    pub fn inclusion_probability(&self) -> Option<f64> {
        self.options.as_ref().and_then(|o| o.probability)
    }

    /// Generate one value using the generator's own kind and options.
    pub fn generate(&mut self, pool: &DataPool) -> Result<Option<FieldValue>, GenerateError> {
        let kind = self.kind.clone();
        let options = self.options.clone();
        self.generate_as(kind, options, pool)
    }

    /// Generate one value with an explicit kind and options.
    ///
    /// This is the entry used for recursive array-element generation, where
    /// the element's kind and options differ from the container's. The
    /// transform-then-uniqueness retry applies here regardless of kind.
    pub fn generate_as(
        &mut self,
        kind: FieldKind,
        options: Option<Rc<FieldOptions>>,
        pool: &DataPool,
    ) -> Result<Option<FieldValue>, GenerateError> {
        let ensure_unique = options.as_ref().is_some_and(|o| o.ensure_unique);
        let mut attempts = 0;

        loop {
            let mut value = self.produce(&kind, options.as_deref(), pool)?;

            if let Some(modify) = options.as_deref().and_then(|o| o.modify.as_ref()) {
                value = value.map(|v| modify(v));
            }

            let Some(value) = value else {
                return Ok(None);
            };
            if !ensure_unique {
                return Ok(Some(value));
            }

            if self.seen.insert(value.to_string()) {
                return Ok(Some(value));
            }

            attempts += 1;
            if attempts >= MAX_UNIQUE_ATTEMPTS {
                error!(
                    "failed to generate a unique value for field '{}' after {} attempts",
                    self.name, MAX_UNIQUE_ATTEMPTS
                );
                return Ok(None);
            }
        }
    }

    fn produce(
        &mut self,
        kind: &FieldKind,
        options: Option<&FieldOptions>,
        pool: &DataPool,
    ) -> Result<Option<FieldValue>, GenerateError> {
        let value = match kind {
            FieldKind::Bool => Some(FieldValue::Bool(random::random_bool())),
            FieldKind::Array => return self.produce_array(options, pool),
            FieldKind::ObjectId => self.produce_object_id(options, pool),
            FieldKind::String => self.produce_string(options, pool),
            FieldKind::Date => self.produce_date(options, pool),
            FieldKind::Number => self.produce_number(options, pool),
            FieldKind::Unsupported(tag) => {
                warn!("unsupported field type '{}' for field '{}'", tag, self.name);
                None
            }
        };
        Ok(value)
    }

    fn produce_array(
        &mut self,
        options: Option<&FieldOptions>,
        pool: &DataPool,
    ) -> Result<Option<FieldValue>, GenerateError> {
        let Some(spec) = options.and_then(|o| o.array.as_ref()) else {
            warn!("no array options for field '{}'", self.name);
            return Ok(Some(FieldValue::Array(Vec::new())));
        };

        let count = spec.repetitions.resolve();
        let element_options = Rc::clone(&spec.element);
        let element_kind = self.element.clone();
        let has_source = element_options.source.is_some();

        if !has_source && element_kind.is_none() {
            return Err(GenerateError::UntypedArray(self.name.clone()));
        }

        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            let produced = if has_source {
                resolve::resolve_option(&self.name, &element_options, pool)
            } else {
                let kind = element_kind
                    .clone()
                    .ok_or_else(|| GenerateError::UntypedArray(self.name.clone()))?;
                self.generate_as(kind, Some(Rc::clone(&element_options)), pool)?
            };
            if let Some(value) = produced {
                items.push(value);
            }
        }

        Ok(Some(FieldValue::Array(items)))
    }

    fn produce_object_id(
        &self,
        options: Option<&FieldOptions>,
        pool: &DataPool,
    ) -> Option<FieldValue> {
        if let Some(options) = options {
            if options.source.is_some() {
                return resolve::resolve_option(&self.name, options, pool);
            }
        }
        Some(FieldValue::ObjectId(ObjectId::new()))
    }

    fn produce_string(
        &self,
        options: Option<&FieldOptions>,
        pool: &DataPool,
    ) -> Option<FieldValue> {
        let Some(options) = options else {
            return Some(FieldValue::String(random::words(None)));
        };
        if options.source.is_some() {
            return resolve::resolve_option(&self.name, options, pool);
        }
        match options.string_kind {
            Some(StringKind::Email) => Some(FieldValue::String(random::email())),
            None => Some(FieldValue::String(random::words(options.int_range()))),
        }
    }

    fn produce_date(&self, options: Option<&FieldOptions>, pool: &DataPool) -> Option<FieldValue> {
        if let Some(options) = options {
            // A resolved dependency value is used directly as the date
            if options.depends_on.is_some() || options.source.is_some() {
                return resolve::resolve_option(&self.name, options, pool);
            }
        }
        let range = options.and_then(|o| o.date_range());
        Some(FieldValue::Date(random::date_in_range(range)))
    }

    fn produce_number(
        &self,
        options: Option<&FieldOptions>,
        pool: &DataPool,
    ) -> Option<FieldValue> {
        if let Some(options) = options {
            if options.source.is_some() {
                return resolve::resolve_option(&self.name, options, pool);
            }
        }
        let range = options.and_then(|o| o.int_range());
        Some(FieldValue::Int(random::int_in_range(range)))
    }
}
