//! Core types for the docseed fixture data seeder.
//!
//! This crate provides the foundational types used across the seeder:
//!
//! - [`FieldKind`] - Closed enum of document field types
//! - [`FieldDescriptor`] / [`Schema`] - Declared document schemas, loaded from YAML
//! - [`FieldValue`] / [`Record`] - Generated values and whole records
//! - [`DataPool`] - The session-scoped map of generated collections
//!
//! # Architecture
//!
//! The docseed-core crate sits at the foundation of the workspace:
//!
//! ```text
//! docseed-core (this crate)
//!    │
//!    ├─── docseed-generator  (field generation and model assembly)
//!    │
//!    └─── docseed-mongodb    (BSON conversion, chunked flush, tap-in)
//! ```
//!
//! # Example
//!
//! ```rust
//! use docseed_core::Schema;
//!
//! let schema = Schema::from_yaml(r#"
//! fields:
//!   - name: _id
//!     type: object_id
//!   - name: email
//!     type: string
//!   - name: tags
//!     type: array
//!     element: string
//! "#).unwrap();
//!
//! assert_eq!(schema.field_names(), vec!["_id", "email", "tags"]);
//! ```

pub mod pool;
pub mod schema;
pub mod values;

// Re-exports for convenience
pub use pool::{DataPool, DependencyValue};
pub use schema::{FieldDescriptor, FieldKind, Schema, SchemaError};
pub use values::{FieldValue, Record};
