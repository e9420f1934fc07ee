//! Error types for the MongoDB seeder.

use docseed_generator::GenerateError;
use thiserror::Error;

/// Errors that can occur while seeding MongoDB.
#[derive(Error, Debug)]
pub enum SeederError {
    /// MongoDB connection or query error.
    #[error("MongoDB error: {0}")]
    MongoDB(#[from] mongodb::error::Error),

    /// A model plan was submitted without a schema.
    #[error("model plan for '{0}' is missing a schema")]
    MissingSchema(String),

    /// A model plan was submitted without a collection binding.
    #[error("model plan for '{0}' is missing a collection binding")]
    MissingCollection(String),

    /// The tapped collection does not exist in the database.
    #[error("collection '{0}' does not exist in the database")]
    CollectionNotFound(String),

    /// Generation failed with a configuration error.
    #[error(transparent)]
    Generate(#[from] GenerateError),
}
