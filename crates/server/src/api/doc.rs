//! OpenAPI documentation aggregator.
//!
//! Collects all `#[utoipa::path]`-annotated handlers and `ToSchema`-derived
//! types into one OpenAPI spec, served via Scalar UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "docchat API",
        version = "0.1.0",
        description = "PDF chat: upload documents, retrieve relevant chunks, chat with streaming answers.",
    ),
    tags(
        (name = "Health", description = "Server liveness and collaborator configuration"),
        (name = "Documents", description = "PDF upload, semantic search, listing, deletion"),
        (name = "Chat", description = "Retrieval-augmented chat with token streaming"),
    ),
    paths(
        crate::api::health::health,
        crate::api::documents::upload,
        crate::api::documents::search,
        crate::api::documents::list_documents,
        crate::api::documents::delete_document,
        crate::api::chat::chat,
    )
)]
pub struct ApiDoc;
