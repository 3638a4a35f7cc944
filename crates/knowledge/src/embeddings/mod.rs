//! Embedding generation for document chunks and questions.
//!
//! Provider-agnostic: a document is embedded in batches through whichever
//! [`EmbeddingProvider`] the service was configured with, and every result
//! is checked for count and dimensionality before it reaches an index.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt, TryStreamExt};
use helper_core::{AppError, AppResult};

/// Batches in flight at once.
const CONCURRENT_BATCHES: usize = 4;

/// Embed `texts` in batches of `batch_size`, preserving order.
pub async fn embed_all(
    provider: &dyn EmbeddingProvider,
    texts: &[String],
    batch_size: usize,
) -> AppResult<Vec<Vec<f32>>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let batch_size = batch_size.max(1);

    tracing::info!(
        "Embedding {} texts in batches of {} using provider '{}' (model: {})",
        texts.len(),
        batch_size,
        provider.provider_name(),
        provider.model_name()
    );

    // Boxed up front so the stream's future stays Send for axum handlers.
    let requests: Vec<BoxFuture<'_, AppResult<Vec<Vec<f32>>>>> = texts
        .chunks(batch_size)
        .map(|batch| {
            async move {
                let embeddings = provider.embed_batch(batch).await?;
                check_batch(provider, batch.len(), &embeddings)?;
                Ok(embeddings)
            }
            .boxed()
        })
        .collect();

    let batches: Vec<Vec<Vec<f32>>> = stream::iter(requests)
        .buffered(CONCURRENT_BATCHES)
        .try_collect()
        .await?;

    let embeddings: Vec<Vec<f32>> = batches.into_iter().flatten().collect();

    tracing::debug!(
        "Generated {} embeddings of dimension {}",
        embeddings.len(),
        provider.dimensions()
    );

    Ok(embeddings)
}

/// Embed a single question and check its dimensionality.
pub async fn embed_query(provider: &dyn EmbeddingProvider, query: &str) -> AppResult<Vec<f32>> {
    let embedding = provider.embed(query).await?;
    check_batch(provider, 1, std::slice::from_ref(&embedding))?;
    Ok(embedding)
}

fn check_batch(
    provider: &dyn EmbeddingProvider,
    expected: usize,
    embeddings: &[Vec<f32>],
) -> AppResult<()> {
    if embeddings.len() != expected {
        return Err(AppError::Embedding(format!(
            "Provider '{}' returned {} embeddings for {} texts",
            provider.provider_name(),
            embeddings.len(),
            expected
        )));
    }

    if let Some(bad) = embeddings.iter().find(|e| e.len() != provider.dimensions()) {
        return Err(AppError::Embedding(format!(
            "Provider '{}' returned {} dimensions, expected {}",
            provider.provider_name(),
            bad.len(),
            provider.dimensions()
        )));
    }

    Ok(())
}
