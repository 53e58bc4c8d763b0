//! pgvector-backed storage and similarity search for document chunks.
//!
//! Every row is owned by a user; search, listing, and deletion are always
//! scoped to the owner so one user's documents never answer another's
//! questions.

use chrono::{DateTime, Utc};
use pgvector::Vector;
use serde::Serialize;
use sqlx::{PgPool, Row};
use uuid::Uuid;

// ── Types ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub filename: String,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
    pub chunk_count: i64,
}

#[derive(Debug, Serialize)]
pub struct SearchResult {
    pub chunk_id: Uuid,
    pub document_id: Uuid,
    pub filename: String,
    pub content: String,
    pub chunk_index: i32,
    pub similarity: f64,
}

pub struct ChunkInsert {
    pub chunk_index: usize,
    pub content: String,
    pub embedding: Vec<f32>,
}

// ── Operations ─────────────────────────────────────

/// Insert a new document record owned by `user_id`.
pub async fn insert_document(
    pool: &PgPool,
    user_id: Uuid,
    filename: &str,
    file_size: i64,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO documents (id, user_id, filename, file_size) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(user_id)
        .bind(filename)
        .bind(file_size)
        .execute(pool)
        .await?;
    Ok(id)
}

/// Insert chunks with embeddings for a document.
pub async fn insert_chunks(
    pool: &PgPool,
    document_id: Uuid,
    chunks: Vec<ChunkInsert>,
) -> Result<(), sqlx::Error> {
    for chunk in chunks {
        let embedding = Vector::from(chunk.embedding);
        sqlx::query(
            "INSERT INTO chunks (id, document_id, chunk_index, content, embedding) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(Uuid::new_v4())
        .bind(document_id)
        .bind(chunk.chunk_index as i32)
        .bind(&chunk.content)
        .bind(&embedding)
        .execute(pool)
        .await?;
    }
    Ok(())
}

/// Search the user's chunks by cosine similarity, keeping only matches
/// above `threshold`, ranked best-first.
pub async fn search(
    pool: &PgPool,
    query_embedding: Vec<f32>,
    user_id: Uuid,
    threshold: f64,
    limit: i64,
) -> Result<Vec<SearchResult>, sqlx::Error> {
    let embedding = Vector::from(query_embedding);
    let rows = sqlx::query(
        "SELECT c.id, c.document_id, d.filename, c.content, c.chunk_index, \
         1.0 - (c.embedding <=> $1::vector) as similarity \
         FROM chunks c \
         JOIN documents d ON d.id = c.document_id \
         WHERE d.user_id = $2 \
         AND 1.0 - (c.embedding <=> $1::vector) > $3 \
         ORDER BY c.embedding <=> $1::vector \
         LIMIT $4",
    )
    .bind(&embedding)
    .bind(user_id)
    .bind(threshold)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let results = rows
        .iter()
        .map(|row| SearchResult {
            chunk_id: row.get("id"),
            document_id: row.get("document_id"),
            filename: row.get("filename"),
            content: row.get("content"),
            chunk_index: row.get("chunk_index"),
            similarity: row.get("similarity"),
        })
        .collect();
    Ok(results)
}

/// List the user's documents with chunk counts, newest first.
pub async fn list_documents(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<DocumentRecord>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT d.id, d.filename, d.file_size, d.uploaded_at, \
         COUNT(c.id) as chunk_count \
         FROM documents d \
         LEFT JOIN chunks c ON c.document_id = d.id \
         WHERE d.user_id = $1 \
         GROUP BY d.id \
         ORDER BY d.uploaded_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let docs = rows
        .iter()
        .map(|row| DocumentRecord {
            id: row.get("id"),
            filename: row.get("filename"),
            file_size: row.get("file_size"),
            uploaded_at: row.get("uploaded_at"),
            chunk_count: row.get("chunk_count"),
        })
        .collect();
    Ok(docs)
}

/// Delete a document and its chunks (CASCADE) if the user owns it.
pub async fn delete_document(
    pool: &PgPool,
    document_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM documents WHERE id = $1 AND user_id = $2")
        .bind(document_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_insert_construction() {
        let chunk = ChunkInsert {
            chunk_index: 0,
            content: "Hello world".to_string(),
            embedding: vec![0.1, 0.2, 0.3],
        };
        assert_eq!(chunk.chunk_index, 0);
        assert_eq!(chunk.embedding.len(), 3);
    }

    #[test]
    fn document_record_serializes() {
        let rec = DocumentRecord {
            id: Uuid::nil(),
            filename: "paper.pdf".to_string(),
            file_size: 1024,
            uploaded_at: chrono::Utc::now(),
            chunk_count: 5,
        };
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("\"filename\":\"paper.pdf\""));
        assert!(json.contains("\"chunk_count\":5"));
    }

    #[test]
    fn search_result_serializes() {
        let res = SearchResult {
            chunk_id: Uuid::nil(),
            document_id: Uuid::nil(),
            filename: "paper.pdf".to_string(),
            content: "some text".to_string(),
            chunk_index: 2,
            similarity: 0.95,
        };
        let json = serde_json::to_string(&res).unwrap();
        assert!(json.contains("\"similarity\":0.95"));
        assert!(json.contains("\"chunk_index\":2"));
    }
}
