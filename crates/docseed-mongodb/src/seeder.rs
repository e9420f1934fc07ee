//! The seeding orchestrator: generation, tap-in loading, and flushing.

use crate::convert;
use crate::error::SeederError;
use crate::insert::{self, DEFAULT_CHUNK_SIZE};
use bson::{doc, Document};
use docseed_core::{DataPool, Record, Schema};
use docseed_generator::{FieldOptions, ModelAssembler, ModelSettings};
use futures::TryStreamExt;
use mongodb::{Client, Database};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Default number of models flushed concurrently.
pub const DEFAULT_MAX_PARALLEL_FLUSHES: usize = 15;

/// Behavioral knobs for the seeder.
#[derive(Debug, Clone)]
pub struct SeederOptions {
    /// Clear each bound collection before inserting its records
    pub clear_collections: bool,
    /// Number of records per insert chunk
    pub insert_chunk_size: usize,
    /// Maximum number of models flushed concurrently
    pub max_parallel_flushes: usize,
}

impl Default for SeederOptions {
    fn default() -> Self {
        Self {
            clear_collections: true,
            insert_chunk_size: DEFAULT_CHUNK_SIZE,
            max_parallel_flushes: DEFAULT_MAX_PARALLEL_FLUSHES,
        }
    }
}

impl SeederOptions {
    /// Keep existing records instead of clearing collections before insert.
    pub fn keep_collections(mut self) -> Self {
        self.clear_collections = false;
        self
    }

    /// Set the insert chunk size (minimum 1).
    pub fn with_insert_chunk_size(mut self, chunk_size: usize) -> Self {
        self.insert_chunk_size = chunk_size.max(1);
        self
    }

    /// Set the number of models flushed concurrently (minimum 1).
    pub fn with_max_parallel_flushes(mut self, max_parallel: usize) -> Self {
        self.max_parallel_flushes = max_parallel.max(1);
        self
    }
}

/// Everything needed to generate one model's records.
pub struct ModelPlan {
    /// Identifier the records are registered under in the pool
    pub model_id: String,
    /// Declared schema for the model
    pub schema: Option<Schema>,
    /// Collection the records flush into; optional for helper data
    pub collection: Option<String>,
    /// Assembly settings
    pub settings: ModelSettings,
    /// Per-field generation options
    pub field_options: HashMap<String, FieldOptions>,
}

impl ModelPlan {
    /// Create a plan for a model id.
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            schema: None,
            collection: None,
            settings: ModelSettings::default(),
            field_options: HashMap::new(),
        }
    }

    /// Set the declared schema.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Bind the model to a collection for flushing.
    pub fn for_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Set the assembly settings.
    pub fn with_settings(mut self, settings: ModelSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Add generation options for one field.
    pub fn with_field_option(
        mut self,
        field: impl Into<String>,
        options: FieldOptions,
    ) -> Self {
        self.field_options.insert(field.into(), options);
        self
    }
}

/// Generates fixture data and persists it to MongoDB.
///
/// The seeder owns the session [`DataPool`]: every generated (or tapped-in)
/// collection is registered there, stays readable as a dependency source for
/// later models, and is dropped from the pool once flushed.
pub struct Seeder {
    database: Database,
    options: SeederOptions,
    pool: DataPool,
    bindings: HashMap<String, String>,
}

impl Seeder {
    /// Connect to MongoDB and create a seeder with default options.
    ///
    /// The connection is verified by listing collection names.
    pub async fn connect(
        connection_string: &str,
        database_name: &str,
    ) -> Result<Self, SeederError> {
        Self::connect_with_options(connection_string, database_name, SeederOptions::default())
            .await
    }

    /// Connect to MongoDB and create a seeder with the given options.
    pub async fn connect_with_options(
        connection_string: &str,
        database_name: &str,
        options: SeederOptions,
    ) -> Result<Self, SeederError> {
        let client = Client::with_uri_str(connection_string).await?;
        let database = client.database(database_name);

        // Probe the connection before accepting any work
        database.list_collection_names().await?;
        info!("connected to MongoDB database '{}'", database_name);

        Ok(Self::with_database(database, options))
    }

    /// Create a seeder over an existing database handle.
    pub fn with_database(database: Database, options: SeederOptions) -> Self {
        Self {
            database,
            options,
            pool: DataPool::new(),
            bindings: HashMap::new(),
        }
    }

    /// The session pool of generated collections.
    pub fn pool(&self) -> &DataPool {
        &self.pool
    }

    /// Bind a model id to a collection for flushing.
    pub fn register(&mut self, model_id: impl Into<String>, collection: impl Into<String>) {
        self.bindings.insert(model_id.into(), collection.into());
    }

    /// Generate records for a collection-bound model.
    ///
    /// The plan must carry both a schema and a collection binding. The
    /// records are registered in the pool and flushed on [`Seeder::flush`].
    pub fn generate_model(&mut self, plan: ModelPlan) -> Result<Vec<Record>, SeederError> {
        let collection = plan
            .collection
            .clone()
            .ok_or_else(|| SeederError::MissingCollection(plan.model_id.clone()))?;
        self.bindings.insert(plan.model_id.clone(), collection);
        self.generate_records(plan)
    }

    /// Generate helper records without a collection binding.
    ///
    /// The records are registered in the pool as a dependency source for
    /// later models but are never flushed.
    pub fn generate_records(&mut self, plan: ModelPlan) -> Result<Vec<Record>, SeederError> {
        let ModelPlan {
            model_id,
            schema,
            settings,
            field_options,
            ..
        } = plan;
        let schema = schema.ok_or_else(|| SeederError::MissingSchema(model_id.clone()))?;

        let mut assembler = ModelAssembler::new(schema, settings, field_options);
        let records = assembler.assemble(&self.pool)?;
        debug!("generated {} records for model '{}'", records.len(), model_id);

        self.pool.insert(model_id, records.clone());
        Ok(records)
    }

    /// Load an existing collection into the pool as a dependency source.
    ///
    /// The collection must exist; an empty collection is loaded with a
    /// warning. The loaded records are never flushed back.
    pub async fn tap_into(
        &mut self,
        model_id: impl Into<String>,
        collection_name: &str,
    ) -> Result<(), SeederError> {
        let names = self.database.list_collection_names().await?;
        if !names.iter().any(|name| name == collection_name) {
            return Err(SeederError::CollectionNotFound(collection_name.to_string()));
        }

        let collection = self.database.collection::<Document>(collection_name);
        let mut cursor = collection.find(doc! {}).await?;

        let mut records = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            records.push(convert::document_to_record(&document));
        }
        if records.is_empty() {
            warn!("tapped collection '{}' is empty", collection_name);
        }

        let model_id = model_id.into();
        info!(
            "tapped {} records from collection '{}' into model '{}'",
            records.len(),
            collection_name,
            model_id
        );
        self.pool.insert(model_id, records);
        Ok(())
    }

    /// Persist every collection-bound model in the pool.
    ///
    /// Models flush in parallel groups bounded by `max_parallel_flushes`; a
    /// failed model aborts the remaining work and surfaces as the flush
    /// error. Successfully persisted models are dropped from the pool and
    /// their bindings removed; unbound helper data stays in the pool.
    pub async fn flush(&mut self) -> Result<(), SeederError> {
        let model_ids: Vec<String> = self
            .pool
            .model_ids()
            .into_iter()
            .map(str::to_string)
            .collect();

        let group_size = self.options.max_parallel_flushes.max(1);
        for group in model_ids.chunks(group_size) {
            let flushes = group.iter().map(|model_id| self.flush_model(model_id));
            let persisted = futures::future::try_join_all(flushes).await?;

            for (model_id, persisted) in group.iter().zip(persisted) {
                if persisted {
                    self.pool.remove(model_id);
                    self.bindings.remove(model_id);
                }
            }
        }

        info!("flush completed");
        Ok(())
    }

    async fn flush_model(&self, model_id: &str) -> Result<bool, SeederError> {
        let Some(collection_name) = self.bindings.get(model_id) else {
            debug!("model '{}' has no collection binding; keeping in pool", model_id);
            return Ok(false);
        };
        let Some(records) = self.pool.get(model_id) else {
            return Ok(false);
        };
        if records.is_empty() {
            debug!("model '{}' has no records to flush", model_id);
            return Ok(false);
        }

        let collection = self.database.collection::<Document>(collection_name);
        if self.options.clear_collections {
            insert::clear_collection(&collection).await?;
        }

        let inserted = insert::insert_chunks(
            &collection,
            model_id,
            records,
            self.options.insert_chunk_size,
        )
        .await?;
        info!(
            "flushed {} records to collection '{}' for model '{}'",
            inserted, collection_name, model_id
        );
        Ok(true)
    }
}
