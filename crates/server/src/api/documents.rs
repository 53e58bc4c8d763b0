//! Document endpoints: the upload pipeline (extract → chunk → embed →
//! persist), semantic search, listing, and deletion. All operations are
//! scoped to the authenticated user.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use docchat_ingest::document::{self, chunker, ExtractionError};

use crate::state::AppState;
use crate::vector_store::{self, ChunkInsert};

use super::{authenticate, check_retrieval_deps, embed_query};

/// Chunks per embedding API call; large documents go up in several
/// requests to stay under provider timeouts.
const EMBED_BATCH_SIZE: usize = 64;

const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

// ── Request/Response types ────────────────────────

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    #[schema(value_type = String)]
    pub document_id: Uuid,
    pub filename: String,
    pub chunk_count: usize,
    pub file_size: i64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SearchResponse {
    #[schema(value_type = Vec<Object>)]
    pub results: Vec<vector_store::SearchResult>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DocumentListResponse {
    #[schema(value_type = Vec<Object>)]
    pub documents: Vec<vector_store::DocumentRecord>,
}

// ── POST /upload ──────────────────────────────────

/// Upload a PDF for chat
///
/// Accepts multipart/form-data with a file field. The PDF text is
/// extracted, chunked, embedded, and stored in pgvector under the
/// authenticated user.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "Documents",
    request_body(content_type = "multipart/form-data", description = "PDF file upload"),
    responses(
        (status = 200, description = "Document uploaded and chunked", body = UploadResponse),
        (status = 400, description = "Upload error", body = String),
        (status = 401, description = "Unauthorized", body = String)
    )
)]
pub async fn upload(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, String)> {
    let user = authenticate(&state, &headers).await?;
    let (pool, embedder) = check_retrieval_deps(&state)?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Multipart error: {e}")))?
        .ok_or((StatusCode::BAD_REQUEST, "No file provided".to_string()))?;

    let filename = field.file_name().unwrap_or("unnamed.pdf").to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read file: {e}")))?;

    let file_size = bytes.len() as i64;
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err((
            StatusCode::PAYLOAD_TOO_LARGE,
            "File exceeds 50MB limit".to_string(),
        ));
    }

    let text = document::extract_text(&bytes, &filename).map_err(|e| match e {
        ExtractionError::UnsupportedType(_) => {
            (StatusCode::BAD_REQUEST, "File must be a PDF".to_string())
        }
        e => (
            StatusCode::BAD_REQUEST,
            format!("Text extraction failed: {e}"),
        ),
    })?;

    if text.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            format!(
                "Document '{}' contains no extractable text. Ensure the PDF has a \
                 text layer (scanned/image PDFs are not supported).",
                filename
            ),
        ));
    }

    let chunk_config = chunker::ChunkConfig {
        chunk_size: state.config.chunking.chunk_size,
        overlap: state.config.chunking.overlap,
    };
    let chunks = chunker::chunk_text(&text, &chunk_config);

    info!(
        "Extracted '{}': {} chars, {} chunks",
        filename,
        text.chars().count(),
        chunks.len()
    );

    // Embed chunks in batches to avoid API timeouts on large documents.
    let total_batches = (chunks.len() + EMBED_BATCH_SIZE - 1) / EMBED_BATCH_SIZE;
    let mut embeddings: Vec<Vec<f32>> = Vec::with_capacity(chunks.len());
    for (i, batch) in chunks.chunks(EMBED_BATCH_SIZE).enumerate() {
        info!(
            "Embedding batch {}/{} ({} chunks)",
            i + 1,
            total_batches,
            batch.len()
        );
        let texts: Vec<&str> = batch.iter().map(|c| c.as_str()).collect();
        let batch_embeddings = embedder.embed_batch(&texts).await.map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Embedding failed (batch {}): {e}", i + 1),
            )
        })?;
        embeddings.extend(batch_embeddings);
    }

    let document_id = vector_store::insert_document(pool, user.id, &filename, file_size)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("DB insert failed: {e}"),
            )
        })?;

    let chunk_inserts: Vec<ChunkInsert> = chunks
        .into_iter()
        .zip(embeddings)
        .enumerate()
        .map(|(i, (content, embedding))| ChunkInsert {
            chunk_index: i,
            content,
            embedding,
        })
        .collect();

    let chunk_count = chunk_inserts.len();
    vector_store::insert_chunks(pool, document_id, chunk_inserts)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Chunk insert failed: {e}"),
            )
        })?;

    info!(
        "Uploaded '{}' for user {}: {} chunks embedded",
        filename, user.id, chunk_count
    );

    Ok(Json(UploadResponse {
        document_id,
        filename,
        chunk_count,
        file_size,
    }))
}

// ── POST /search ──────────────────────────────────

/// Semantic search across the user's documents
///
/// Embeds the query text and performs a cosine-similarity search against
/// the caller's stored chunks via pgvector.
#[utoipa::path(
    post,
    path = "/search",
    tag = "Documents",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Search results ranked by similarity", body = SearchResponse),
        (status = 401, description = "Unauthorized", body = String),
        (status = 503, description = "Retrieval service unavailable", body = String)
    )
)]
pub async fn search(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let user = authenticate(&state, &headers).await?;
    let (pool, embedder) = check_retrieval_deps(&state)?;

    let query_embedding = embed_query(&state, embedder, &req.query).await?;

    let results = vector_store::search(
        pool,
        query_embedding,
        user.id,
        state.config.retrieval.match_threshold,
        req.limit,
    )
    .await
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Search failed: {e}"),
        )
    })?;

    Ok(Json(SearchResponse { results }))
}

// ── GET /documents ────────────────────────────────

/// List the user's uploaded documents
#[utoipa::path(
    get,
    path = "/documents",
    tag = "Documents",
    responses(
        (status = 200, description = "List of uploaded documents", body = DocumentListResponse),
        (status = 401, description = "Unauthorized", body = String),
        (status = 503, description = "PostgreSQL not configured", body = String)
    )
)]
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<DocumentListResponse>, (StatusCode, String)> {
    let user = authenticate(&state, &headers).await?;
    let pool = state.pg_pool.as_ref().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "PostgreSQL not configured".to_string(),
    ))?;

    let documents = vector_store::list_documents(pool, user.id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to list documents: {e}"),
            )
        })?;

    Ok(Json(DocumentListResponse { documents }))
}

// ── DELETE /documents/{id} ────────────────────────

/// Delete one of the user's documents and its chunks
#[utoipa::path(
    delete,
    path = "/documents/{id}",
    tag = "Documents",
    params(("id" = String, Path, description = "Document UUID")),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 401, description = "Unauthorized", body = String),
        (status = 404, description = "Document not found", body = String)
    )
)]
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let user = authenticate(&state, &headers).await?;
    let pool = state.pg_pool.as_ref().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "PostgreSQL not configured".to_string(),
    ))?;

    let deleted = vector_store::delete_document(pool, id, user.id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Delete failed: {e}"),
            )
        })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, format!("Document not found: {id}")))
    }
}
