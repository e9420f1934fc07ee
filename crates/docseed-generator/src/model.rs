//! Whole-model record assembly.

use crate::field::{FieldGenerator, GenerateError};
use crate::options::{Count, FieldOptions};
use docseed_core::{DataPool, FieldDescriptor, FieldValue, Record, Schema};
use rand::Rng;
use std::collections::HashMap;
use tracing::warn;

/// Fields skipped by default; the version marker is bookkeeping, not data.
const DEFAULT_IGNORED_FIELDS: &[&str] = &["__v"];

const CREATED_AT: &str = "createdAt";
const UPDATED_AT: &str = "updatedAt";

/// Predicate over a finished record, for required-on-case rules.
pub type CasePredicate = Box<dyn Fn(&Record) -> bool>;

/// Transform over the whole produced collection.
pub type CollectionModifyFn = Box<dyn Fn(Vec<Record>) -> Vec<Record>>;

/// Assembly settings for one model.
#[derive(Default)]
pub struct ModelSettings {
    /// How many fully-random records to produce
    pub repetitions: Count,
    /// Fields to skip during generation; default is the version marker only
    pub ignored_fields: Option<Vec<String>>,
    /// Partial seed records guaranteed to appear in the output
    pub must_include: Vec<Record>,
    /// Field name to predicate: when the predicate holds on a finished
    /// record, the field is force-regenerated onto it
    pub required_on_case: Vec<(String, CasePredicate)>,
    /// Transform applied to the whole produced collection
    pub modify: Option<CollectionModifyFn>,
}

impl ModelSettings {
    /// Create settings with a repetition count.
    pub fn new(repetitions: impl Into<Count>) -> Self {
        Self {
            repetitions: repetitions.into(),
            ..Self::default()
        }
    }

    /// Replace the default ignore list.
    pub fn with_ignored_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Add partial seed records guaranteed to appear in the output.
    pub fn with_must_include(mut self, records: Vec<Record>) -> Self {
        self.must_include = records;
        self
    }

    /// Add a required-on-case rule for a field.
    pub fn require_when(
        mut self,
        field: impl Into<String>,
        predicate: impl Fn(&Record) -> bool + 'static,
    ) -> Self {
        self.required_on_case.push((field.into(), Box::new(predicate)));
        self
    }

    /// Set the whole-collection transform.
    pub fn with_modify(mut self, modify: impl Fn(Vec<Record>) -> Vec<Record> + 'static) -> Self {
        self.modify = Some(Box::new(modify));
        self
    }
}

/// Assembles whole records for one declared model.
///
/// Field generators are created lazily on first visit and cached for the
/// assembler's lifetime, so uniqueness tracking spans must-include seeds,
/// randomized records, and required-on-case forcing alike.
pub struct ModelAssembler {
    schema: Schema,
    settings: ModelSettings,
    field_options: HashMap<String, FieldOptions>,
    generators: HashMap<String, FieldGenerator>,
}

impl ModelAssembler {
    /// Create an assembler for a schema with settings and per-field options.
    pub fn new(
        schema: Schema,
        settings: ModelSettings,
        field_options: HashMap<String, FieldOptions>,
    ) -> Self {
        Self {
            schema,
            settings,
            field_options,
            generators: HashMap::new(),
        }
    }

    /// Produce the model's records.
    ///
    /// Seed records from the must-include list come first with their unset
    /// fields back-filled (inclusion probabilities do not apply to them),
    /// followed by the configured number of fully-random records. Per-field
    /// failures degrade to omitted fields; only configuration errors abort.
    pub fn assemble(&mut self, pool: &DataPool) -> Result<Vec<Record>, GenerateError> {
        let mut records = Vec::new();

        for seed in self.settings.must_include.clone() {
            records.push(self.fill_record(seed, true, pool)?);
        }

        let count = self.settings.repetitions.resolve();
        for _ in 0..count {
            records.push(self.fill_record(Record::new(), false, pool)?);
        }

        self.apply_required_on_case(&mut records, pool)?;
        correct_timestamps(&mut records);

        if let Some(modify) = self.settings.modify.as_ref() {
            records = modify(records);
        }

        Ok(records)
    }

    /// Fill every declared field of one partial record, in declaration order.
    fn fill_record(
        &mut self,
        mut record: Record,
        ignore_probability: bool,
        pool: &DataPool,
    ) -> Result<Record, GenerateError> {
        for idx in 0..self.schema.fields.len() {
            let descriptor = self.schema.fields[idx].clone();
            self.ensure_generator(&descriptor);

            if !self.should_fill(&descriptor.name, &record, ignore_probability) {
                continue;
            }
            if let Some(generator) = self.generators.get_mut(&descriptor.name) {
                if let Some(value) = generator.generate(pool)? {
                    record.insert(descriptor.name.clone(), value);
                }
            }
        }
        Ok(record)
    }

    /// Create and cache the field's generator on first visit.
    fn ensure_generator(&mut self, descriptor: &FieldDescriptor) {
        if self.generators.contains_key(&descriptor.name) {
            return;
        }
        let options = self.field_options.remove(&descriptor.name);
        self.generators
            .insert(descriptor.name.clone(), FieldGenerator::new(descriptor, options));
    }

    /// The per-field inclusion rule: skip ignored or already-present fields;
    /// otherwise gate on the configured probability unless told not to.
    fn should_fill(&self, field: &str, record: &Record, ignore_probability: bool) -> bool {
        if self.is_ignored(field) || record.contains_key(field) {
            return false;
        }
        if ignore_probability {
            return true;
        }
        match self.generators.get(field).and_then(FieldGenerator::inclusion_probability) {
            Some(probability) => probability > rand::rng().random::<f64>(),
            None => true,
        }
    }

    fn is_ignored(&self, field: &str) -> bool {
        match &self.settings.ignored_fields {
            Some(fields) => fields.iter().any(|f| f == field),
            None => DEFAULT_IGNORED_FIELDS.contains(&field),
        }
    }

    /// Force-generate fields whose required-on-case predicate holds,
    /// regardless of prior presence or probability.
    fn apply_required_on_case(
        &mut self,
        records: &mut [Record],
        pool: &DataPool,
    ) -> Result<(), GenerateError> {
        if self.settings.required_on_case.is_empty() {
            return Ok(());
        }

        for record in records.iter_mut() {
            for rule_idx in 0..self.settings.required_on_case.len() {
                let (field, predicate) = &self.settings.required_on_case[rule_idx];
                if !predicate(record) {
                    continue;
                }
                match self.generators.get_mut(field.as_str()) {
                    Some(generator) => {
                        let name = generator.name().to_string();
                        if let Some(value) = generator.generate(pool)? {
                            record.insert(name, value);
                        }
                    }
                    None => {
                        warn!("no field generator for required-on-case rule '{field}'");
                    }
                }
            }
        }
        Ok(())
    }
}

/// Swap `createdAt`/`updatedAt` when they are out of order. The original
/// pair is kept; nothing is re-generated.
fn correct_timestamps(records: &mut [Record]) {
    for record in records.iter_mut() {
        if !(record.contains_key(CREATED_AT) && record.contains_key(UPDATED_AT)) {
            continue;
        }
        let created = record.get(CREATED_AT).and_then(FieldValue::as_date);
        let updated = record.get(UPDATED_AT).and_then(FieldValue::as_date);

        match (created, updated) {
            (Some(created), Some(updated)) if updated < created => {
                record.insert(CREATED_AT.to_string(), FieldValue::Date(updated));
                record.insert(UPDATED_AT.to_string(), FieldValue::Date(created));
            }
            (Some(_), Some(_)) => {}
            _ => warn!("createdAt/updatedAt present but not both temporal; leaving them untouched"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use docseed_core::FieldKind;

    fn user_schema() -> Schema {
        Schema::from_yaml(
            r#"
fields:
  - name: _id
    type: object_id
  - name: name
    type: string
  - name: age
    type: number
  - name: __v
    type: number
"#,
        )
        .unwrap()
    }

    fn timestamped_schema() -> Schema {
        Schema::from_yaml(
            r#"
fields:
  - name: _id
    type: object_id
  - name: createdAt
    type: date
  - name: updatedAt
    type: date
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_literal_repetition_count() {
        let mut assembler =
            ModelAssembler::new(user_schema(), ModelSettings::new(5), HashMap::new());
        let records = assembler.assemble(&DataPool::new()).unwrap();

        assert_eq!(records.len(), 5);
        for record in &records {
            assert!(record.contains_key("_id"));
            assert!(record.contains_key("name"));
            assert!(record.contains_key("age"));
        }
    }

    #[test]
    fn test_dynamic_repetition_count() {
        for _ in 0..20 {
            let settings = ModelSettings {
                repetitions: Count::Dynamic(Box::new(|| {
                    crate::random::count_in_range((0, 3), None) as usize
                })),
                ..ModelSettings::default()
            };
            let mut assembler = ModelAssembler::new(user_schema(), settings, HashMap::new());
            let records = assembler.assemble(&DataPool::new()).unwrap();
            assert!(records.len() <= 3);
        }
    }

    #[test]
    fn test_version_marker_is_ignored_by_default() {
        let mut assembler =
            ModelAssembler::new(user_schema(), ModelSettings::new(3), HashMap::new());
        let records = assembler.assemble(&DataPool::new()).unwrap();

        for record in &records {
            assert!(!record.contains_key("__v"));
        }
    }

    #[test]
    fn test_custom_ignore_list() {
        let settings = ModelSettings::new(2).with_ignored_fields(["age"]);
        let mut assembler = ModelAssembler::new(user_schema(), settings, HashMap::new());
        let records = assembler.assemble(&DataPool::new()).unwrap();

        for record in &records {
            assert!(!record.contains_key("age"));
            // The default list no longer applies once replaced
            assert!(record.contains_key("__v"));
        }
    }

    #[test]
    fn test_must_include_backfills_missing_fields_only() {
        let mut seed = Record::new();
        seed.insert("name".to_string(), FieldValue::String("Ada".to_string()));

        let settings = ModelSettings::new(0).with_must_include(vec![seed]);
        let mut assembler = ModelAssembler::new(user_schema(), settings, HashMap::new());
        let records = assembler.assemble(&DataPool::new()).unwrap();

        assert_eq!(records.len(), 1);
        // The supplied field survives untouched; the rest are back-filled
        assert_eq!(records[0].get("name"), Some(&FieldValue::String("Ada".to_string())));
        assert!(records[0].contains_key("_id"));
        assert!(records[0].contains_key("age"));
    }

    #[test]
    fn test_must_include_ignores_probability() {
        let mut seed = Record::new();
        seed.insert("name".to_string(), FieldValue::String("Ada".to_string()));

        let mut field_options = HashMap::new();
        field_options.insert("age".to_string(), FieldOptions::new().with_probability(0.0));

        let settings = ModelSettings::new(0).with_must_include(vec![seed]);
        let mut assembler = ModelAssembler::new(user_schema(), settings, field_options);
        let records = assembler.assemble(&DataPool::new()).unwrap();

        // Probability gates do not apply to seed back-fill
        assert!(records[0].contains_key("age"));
    }

    #[test]
    fn test_probability_zero_omits_field() {
        let mut field_options = HashMap::new();
        field_options.insert("age".to_string(), FieldOptions::new().with_probability(0.0));

        let mut assembler =
            ModelAssembler::new(user_schema(), ModelSettings::new(10), field_options);
        let records = assembler.assemble(&DataPool::new()).unwrap();

        for record in &records {
            assert!(!record.contains_key("age"));
        }
    }

    #[test]
    fn test_probability_one_keeps_field() {
        let mut field_options = HashMap::new();
        field_options.insert("age".to_string(), FieldOptions::new().with_probability(1.0));

        let mut assembler =
            ModelAssembler::new(user_schema(), ModelSettings::new(10), field_options);
        let records = assembler.assemble(&DataPool::new()).unwrap();

        for record in &records {
            assert!(record.contains_key("age"));
        }
    }

    #[test]
    fn test_required_on_case_forces_field() {
        let mut field_options = HashMap::new();
        field_options.insert("age".to_string(), FieldOptions::new().with_probability(0.0));

        let settings = ModelSettings::new(5).require_when("age", |_| true);
        let mut assembler = ModelAssembler::new(user_schema(), settings, field_options);
        let records = assembler.assemble(&DataPool::new()).unwrap();

        // The probability gate dropped the field; the rule forces it back
        for record in &records {
            assert!(record.contains_key("age"));
        }
    }

    #[test]
    fn test_required_on_case_unknown_field_is_skipped() {
        let settings = ModelSettings::new(2).require_when("nickname", |_| true);
        let mut assembler = ModelAssembler::new(user_schema(), settings, HashMap::new());

        // The rule names a field the schema never declares; assembly continues
        let records = assembler.assemble(&DataPool::new()).unwrap();
        assert_eq!(records.len(), 2);
        for record in &records {
            assert!(!record.contains_key("nickname"));
        }
    }

    #[test]
    fn test_timestamp_swap_keeps_original_pair() {
        let earlier = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let mut seed = Record::new();
        seed.insert(CREATED_AT.to_string(), FieldValue::Date(later));
        seed.insert(UPDATED_AT.to_string(), FieldValue::Date(earlier));

        let settings = ModelSettings::new(0).with_must_include(vec![seed]);
        let mut assembler = ModelAssembler::new(timestamped_schema(), settings, HashMap::new());
        let records = assembler.assemble(&DataPool::new()).unwrap();

        // Swapped, never re-generated
        assert_eq!(records[0].get(CREATED_AT), Some(&FieldValue::Date(earlier)));
        assert_eq!(records[0].get(UPDATED_AT), Some(&FieldValue::Date(later)));
    }

    #[test]
    fn test_timestamps_in_order_are_untouched() {
        let mut assembler =
            ModelAssembler::new(timestamped_schema(), ModelSettings::new(20), HashMap::new());
        let records = assembler.assemble(&DataPool::new()).unwrap();

        for record in &records {
            let created = record.get(CREATED_AT).and_then(FieldValue::as_date).unwrap();
            let updated = record.get(UPDATED_AT).and_then(FieldValue::as_date).unwrap();
            assert!(created <= updated);
        }
    }

    #[test]
    fn test_non_temporal_timestamps_are_left_alone() {
        let mut seed = Record::new();
        seed.insert(CREATED_AT.to_string(), FieldValue::String("yesterday".to_string()));
        seed.insert(UPDATED_AT.to_string(), FieldValue::Date(Utc::now()));

        let settings = ModelSettings::new(0).with_must_include(vec![seed.clone()]);
        let mut assembler = ModelAssembler::new(timestamped_schema(), settings, HashMap::new());
        let records = assembler.assemble(&DataPool::new()).unwrap();

        assert_eq!(records[0].get(CREATED_AT), seed.get(CREATED_AT));
        assert_eq!(records[0].get(UPDATED_AT), seed.get(UPDATED_AT));
    }

    #[test]
    fn test_collection_modify_replaces_output() {
        let settings = ModelSettings::new(4).with_modify(|mut records| {
            records.truncate(1);
            records
        });
        let mut assembler = ModelAssembler::new(user_schema(), settings, HashMap::new());
        let records = assembler.assemble(&DataPool::new()).unwrap();

        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_uniqueness_spans_all_records_of_the_run() {
        let mut field_options = HashMap::new();
        field_options.insert(
            "age".to_string(),
            FieldOptions::new().with_int_range(0, 100_000).ensure_unique(),
        );

        let mut assembler =
            ModelAssembler::new(user_schema(), ModelSettings::new(30), field_options);
        let records = assembler.assemble(&DataPool::new()).unwrap();

        let ages: std::collections::HashSet<i64> = records
            .iter()
            .filter_map(|r| r.get("age").and_then(FieldValue::as_i64))
            .collect();
        assert_eq!(ages.len(), 30);
    }

    #[test]
    fn test_cross_model_dependency_membership() {
        let mut owners = ModelAssembler::new(user_schema(), ModelSettings::new(4), HashMap::new());
        let owner_records = owners.assemble(&DataPool::new()).unwrap();

        let mut pool = DataPool::new();
        pool.insert("owners", owner_records);

        let post_schema = Schema::new(vec![
            FieldDescriptor::new("_id", FieldKind::ObjectId),
            FieldDescriptor::new("author", FieldKind::ObjectId),
        ]);
        let mut field_options = HashMap::new();
        field_options.insert(
            "author".to_string(),
            FieldOptions::new()
                .with_depends_on(|pool| pool.dependency("owners"))
                .with_derive(|dependency| {
                    let records = dependency.records()?;
                    let picked = crate::random::random_element(records, None)?;
                    picked.get("_id").cloned()
                }),
        );

        let owner_ids: Vec<FieldValue> = pool
            .get("owners")
            .unwrap()
            .iter()
            .filter_map(|r| r.get("_id").cloned())
            .collect();

        let mut posts = ModelAssembler::new(post_schema, ModelSettings::new(10), field_options);
        let records = posts.assemble(&pool).unwrap();

        for record in &records {
            let author = record.get("author").unwrap();
            assert!(owner_ids.contains(author));
        }
    }
}
