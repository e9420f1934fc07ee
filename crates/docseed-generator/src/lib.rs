//! Field generation and model assembly for the docseed fixture data seeder.
//!
//! This crate is the generation engine: given a declared [`Schema`] and
//! per-field options, it produces type-correct random records, resolving
//! cross-model dependencies against the session [`DataPool`] and enforcing
//! uniqueness constraints with a bounded retry.
//!
//! # Architecture
//!
//! ```text
//! Schema (YAML)          FieldOptions / ModelSettings
//!       │                          │
//!       ▼                          ▼
//! ┌────────────────────────────────────────┐
//! │             ModelAssembler             │
//! │                                        │
//! │  - lazy per-field generator registry   │
//! │  - must-include backfill               │
//! │  - probability gates                   │
//! │  - required-on-case forcing            │
//! │  - timestamp correction                │
//! └───────────────────┬────────────────────┘
//!                     │ one value at a time
//!                     ▼
//!            ┌─────────────────┐       reads
//!            │  FieldGenerator  │ ───────────────▶  DataPool
//!            │  (seen-set,      │   (dependencies)
//!            │   retry ceiling) │
//!            └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use docseed_core::{DataPool, Schema};
//! use docseed_generator::{FieldOptions, ModelAssembler, ModelSettings};
//! use std::collections::HashMap;
//!
//! let schema = Schema::from_yaml(r#"
//! fields:
//!   - name: _id
//!     type: object_id
//!   - name: age
//!     type: number
//! "#).unwrap();
//!
//! let mut field_options = HashMap::new();
//! field_options.insert("age".to_string(), FieldOptions::new().with_int_range(18, 80));
//!
//! let mut assembler = ModelAssembler::new(schema, ModelSettings::new(10), field_options);
//! let records = assembler.assemble(&DataPool::new()).unwrap();
//! assert_eq!(records.len(), 10);
//! ```

pub mod field;
pub mod model;
pub mod options;
pub mod random;
pub mod resolve;

// Re-exports for convenience
pub use field::{FieldGenerator, GenerateError, MAX_UNIQUE_ATTEMPTS};
pub use model::{CasePredicate, CollectionModifyFn, ModelAssembler, ModelSettings};
pub use options::{
    ArraySpec, Count, DependsOnFn, DeriveFn, FieldOptions, ModifyFn, OptionSource, StringKind,
    ValueRange,
};
pub use resolve::resolve_option;

#[doc(inline)]
pub use docseed_core::{DataPool, Schema};
