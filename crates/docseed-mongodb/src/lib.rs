//! MongoDB persistence for the docseed fixture data seeder.
//!
//! This crate supplies the [`Seeder`] orchestrator: it generates records
//! through `docseed-generator`, keeps them in the session pool as dependency
//! sources, loads existing collections via [`Seeder::tap_into`], and
//! persists everything with [`Seeder::flush`]: collections are cleared first
//! (configurable), records are inserted in fixed-size chunks, and independent
//! models flush in bounded parallel groups.
//!
//! # Example
//!
//! ```ignore
//! use docseed_core::Schema;
//! use docseed_generator::{FieldOptions, ModelSettings, StringKind};
//! use docseed_mongodb::{ModelPlan, Seeder};
//!
//! let mut seeder = Seeder::connect("mongodb://localhost:27017", "dev_fixtures").await?;
//!
//! let schema = Schema::from_file("schemas/users.yaml")?;
//! seeder.generate_model(
//!     ModelPlan::new("users")
//!         .with_schema(schema)
//!         .for_collection("users")
//!         .with_settings(ModelSettings::new(1000))
//!         .with_field_option(
//!             "email",
//!             FieldOptions::new()
//!                 .with_string_kind(StringKind::Email)
//!                 .ensure_unique(),
//!         ),
//! )?;
//!
//! seeder.flush().await?;
//! ```

pub mod convert;
pub mod error;
pub mod insert;
pub mod seeder;

// Re-exports for convenience
pub use error::SeederError;
pub use insert::DEFAULT_CHUNK_SIZE;
pub use seeder::{ModelPlan, Seeder, SeederOptions, DEFAULT_MAX_PARALLEL_FLUSHES};
