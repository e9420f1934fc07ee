//! Chunked insertion and collection clearing.

use crate::convert;
use crate::error::SeederError;
use bson::{doc, Document};
use docseed_core::Record;
use mongodb::Collection;
use tracing::debug;

/// Default number of records per insert chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 5000;

/// Insert a model's records in fixed-size chunks, sequentially.
///
/// Returns the number of documents inserted. Chunk progress is logged only
/// when the data spans more than one chunk.
pub async fn insert_chunks(
    collection: &Collection<Document>,
    model_id: &str,
    records: &[Record],
    chunk_size: usize,
) -> Result<u64, SeederError> {
    if records.is_empty() {
        return Ok(0);
    }

    let chunk_size = chunk_size.max(1);
    let total_chunks = records.len().div_ceil(chunk_size);
    let mut inserted = 0u64;

    for (chunk_index, chunk) in records.chunks(chunk_size).enumerate() {
        let documents: Vec<Document> = chunk.iter().map(convert::record_to_document).collect();
        let result = collection.insert_many(documents).await?;
        inserted += result.inserted_ids.len() as u64;

        if total_chunks > 1 {
            debug!(
                "flushed chunk {} of {} ({} records) for model '{}'",
                chunk_index + 1,
                total_chunks,
                chunk.len(),
                model_id
            );
        }
    }

    Ok(inserted)
}

/// Clear all existing records from a collection.
pub async fn clear_collection(collection: &Collection<Document>) -> Result<(), SeederError> {
    collection.delete_many(doc! {}).await?;
    Ok(())
}
