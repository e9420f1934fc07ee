//! Per-field and per-model generation configuration.
//!
//! The configuration is discriminated per concern rather than duck-typed:
//! static option lists and derive functions are the two arms of
//! [`OptionSource`], numeric and date ranges are the two arms of
//! [`ValueRange`], and array element configuration is its own recursive
//! [`ArraySpec`]. Options carry user callbacks (dependency accessors,
//! derivations, transforms), so they are built with `with_*` methods rather
//! than loaded from config files.

use chrono::{DateTime, Utc};
use docseed_core::{DataPool, DependencyValue, FieldKind, FieldValue};
use std::rc::Rc;

/// Dependency accessor: reads already-generated collections from the pool.
pub type DependsOnFn = Box<dyn Fn(&DataPool) -> DependencyValue>;

/// Derivation over a resolved dependency value.
pub type DeriveFn = Box<dyn Fn(&DependencyValue) -> Option<FieldValue>>;

/// Post-generation transform over a single produced value.
pub type ModifyFn = Box<dyn Fn(FieldValue) -> FieldValue>;

/// Where a configured field value comes from.
pub enum OptionSource {
    /// A static list; one element is picked uniformly at random
    List(Vec<FieldValue>),
    /// A function deriving the value from a resolved dependency
    Derive(DeriveFn),
}

/// A repetition count: a literal, or a function producing one per use.
pub enum Count {
    /// Fixed count
    Fixed(usize),
    /// Count produced per use
    Dynamic(Box<dyn Fn() -> usize>),
}

impl Count {
    /// Resolve the count for one use.
    pub fn resolve(&self) -> usize {
        match self {
            Count::Fixed(count) => *count,
            Count::Dynamic(f) => f(),
        }
    }
}

impl Default for Count {
    fn default() -> Self {
        Count::Fixed(0)
    }
}

impl From<usize> for Count {
    fn from(count: usize) -> Self {
        Count::Fixed(count)
    }
}

/// An inclusive generation range, numeric or temporal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueRange {
    /// Inclusive integer bounds; also the token-count range for strings
    Int(i64, i64),
    /// Inclusive date bounds
    Date(DateTime<Utc>, DateTime<Utc>),
}

/// Recognized string subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringKind {
    /// Email-shaped strings
    Email,
}

/// Element configuration for an array field.
///
/// The element options are a full [`FieldOptions`]: uniqueness, ranges,
/// subtypes, and dependencies all apply per element. They sit behind an
/// `Rc` so container and element generation share one generator instance
/// (and therefore one uniqueness seen-set).
pub struct ArraySpec {
    /// How many elements to generate per record
    pub repetitions: Count,
    /// Options applied to each element
    pub element: Rc<FieldOptions>,
}

impl ArraySpec {
    /// Create an array spec with default (empty) element options.
    pub fn new(repetitions: impl Into<Count>) -> Self {
        Self {
            repetitions: repetitions.into(),
            element: Rc::new(FieldOptions::default()),
        }
    }

    /// Set the element options.
    pub fn with_element(mut self, element: FieldOptions) -> Self {
        self.element = Rc::new(element);
        self
    }
}

/// Generation options for one declared field.
#[derive(Default)]
pub struct FieldOptions {
    /// Probability of including the field, in [0, 1]; default always include
    pub probability: Option<f64>,
    /// Static list or derive function
    pub source: Option<OptionSource>,
    /// Dependency accessor into the pool
    pub depends_on: Option<DependsOnFn>,
    /// String subtype
    pub string_kind: Option<StringKind>,
    /// Enforce pairwise-distinct values for this field
    pub ensure_unique: bool,
    /// Generate as this kind instead of the declared one
    pub treat_as: Option<FieldKind>,
    /// Value range for numbers, dates, and string token counts
    pub range: Option<ValueRange>,
    /// Array element configuration
    pub array: Option<ArraySpec>,
    /// Post-generation transform, applied before the uniqueness check
    pub modify: Option<ModifyFn>,
}

impl FieldOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the probability of including the field.
    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = Some(probability);
        self
    }

    /// Use a static option list.
    pub fn with_options<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        self.source = Some(OptionSource::List(
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Use a derive function over the resolved dependency.
    pub fn with_derive(
        mut self,
        derive: impl Fn(&DependencyValue) -> Option<FieldValue> + 'static,
    ) -> Self {
        self.source = Some(OptionSource::Derive(Box::new(derive)));
        self
    }

    /// Set the dependency accessor.
    pub fn with_depends_on(
        mut self,
        depends_on: impl Fn(&DataPool) -> DependencyValue + 'static,
    ) -> Self {
        self.depends_on = Some(Box::new(depends_on));
        self
    }

    /// Set the string subtype.
    pub fn with_string_kind(mut self, kind: StringKind) -> Self {
        self.string_kind = Some(kind);
        self
    }

    /// Enforce pairwise-distinct values for this field.
    pub fn ensure_unique(mut self) -> Self {
        self.ensure_unique = true;
        self
    }

    /// Generate as this kind instead of the declared one.
    pub fn treat_as(mut self, kind: FieldKind) -> Self {
        self.treat_as = Some(kind);
        self
    }

    /// Set an inclusive integer range (numbers and string token counts).
    pub fn with_int_range(mut self, lo: i64, hi: i64) -> Self {
        self.range = Some(ValueRange::Int(lo, hi));
        self
    }

    /// Set an inclusive date range.
    pub fn with_date_range(mut self, lo: DateTime<Utc>, hi: DateTime<Utc>) -> Self {
        self.range = Some(ValueRange::Date(lo, hi));
        self
    }

    /// Configure array element generation.
    pub fn with_array(mut self, array: ArraySpec) -> Self {
        self.array = Some(array);
        self
    }

    /// Set the post-generation transform.
    pub fn with_modify(mut self, modify: impl Fn(FieldValue) -> FieldValue + 'static) -> Self {
        self.modify = Some(Box::new(modify));
        self
    }

    /// The configured integer range, if any.
    pub fn int_range(&self) -> Option<(i64, i64)> {
        match self.range {
            Some(ValueRange::Int(lo, hi)) => Some((lo, hi)),
            _ => None,
        }
    }

    /// The configured date range, if any.
    pub fn date_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match self.range {
            Some(ValueRange::Date(lo, hi)) => Some((lo, hi)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_resolution() {
        assert_eq!(Count::Fixed(5).resolve(), 5);
        assert_eq!(Count::from(3).resolve(), 3);

        let dynamic = Count::Dynamic(Box::new(|| 7));
        assert_eq!(dynamic.resolve(), 7);
        assert_eq!(Count::default().resolve(), 0);
    }

    #[test]
    fn test_range_accessors() {
        let options = FieldOptions::new().with_int_range(1, 9);
        assert_eq!(options.int_range(), Some((1, 9)));
        assert_eq!(options.date_range(), None);
    }

    #[test]
    fn test_builders_compose() {
        let options = FieldOptions::new()
            .with_probability(0.5)
            .with_options([1i64, 2, 3])
            .ensure_unique();

        assert_eq!(options.probability, Some(0.5));
        assert!(options.ensure_unique);
        match options.source {
            Some(OptionSource::List(ref values)) => assert_eq!(values.len(), 3),
            _ => panic!("expected a static option list"),
        }
    }
}
