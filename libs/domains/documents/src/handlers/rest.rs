//! Resource-style handlers on the configured collection.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use axum_helpers::{
    ValidatedJson, ValidatedQuery,
    errors::responses::{BadRequestValidationResponse, InternalServerErrorResponse, NotFoundResponse},
};

use super::{DocumentsState, audit};
use crate::error::DocumentResult;
use crate::models::{
    CreateDocumentRequest, Document, DocumentIdResponse, MessageResponse, RetrieveResponse,
    SearchDocumentsParams, UpdateDocumentTextRequest,
};
use crate::repository::VectorRepository;

/// Store a document under a generated id
#[utoipa::path(
    post,
    path = "/documents",
    tag = "documents",
    request_body = CreateDocumentRequest,
    responses(
        (status = 201, description = "Document stored", body = DocumentIdResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn create_document<R: VectorRepository>(
    State(state): State<DocumentsState<R>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateDocumentRequest>,
) -> DocumentResult<impl IntoResponse> {
    let result = state
        .service
        .insert_document(&state.collection, None, &input.text)
        .await;
    let resource = match &result {
        Ok(id) => format!("{}/{}", state.collection, id),
        Err(_) => state.collection.to_string(),
    };
    audit(&headers, "document.insert", resource, &result);
    let document_id = result?;

    Ok((StatusCode::CREATED, Json(DocumentIdResponse { document_id })))
}

/// Search the collection by similarity to a query text
#[utoipa::path(
    get,
    path = "/documents",
    tag = "documents",
    params(SearchDocumentsParams),
    responses(
        (status = 200, description = "Ranked `[doc_id, text, score]` tuples", body = RetrieveResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn search_documents<R: VectorRepository>(
    State(state): State<DocumentsState<R>>,
    ValidatedQuery(params): ValidatedQuery<SearchDocumentsParams>,
) -> DocumentResult<Json<RetrieveResponse>> {
    let results = state
        .service
        .retrieve(&state.collection, &params.query_text, params.n)
        .await?;
    Ok(Json(RetrieveResponse { results }))
}

/// Fetch a document by id
#[utoipa::path(
    get,
    path = "/documents/{id}",
    tag = "documents",
    params(("id" = String, Path, description = "Document id")),
    responses(
        (status = 200, description = "Document found", body = Document),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn get_document<R: VectorRepository>(
    State(state): State<DocumentsState<R>>,
    Path(id): Path<String>,
) -> DocumentResult<Json<Document>> {
    let document = state.service.get_document(&state.collection, &id).await?;
    Ok(Json(document))
}

/// Replace a document's text
#[utoipa::path(
    put,
    path = "/documents/{id}",
    tag = "documents",
    params(("id" = String, Path, description = "Document id")),
    request_body = UpdateDocumentTextRequest,
    responses(
        (status = 200, description = "Document updated", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn update_document<R: VectorRepository>(
    State(state): State<DocumentsState<R>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateDocumentTextRequest>,
) -> DocumentResult<Json<MessageResponse>> {
    let result = state
        .service
        .update_document(&state.collection, &id, &input.new_text)
        .await;
    audit(
        &headers,
        "document.update",
        format!("{}/{}", state.collection, id),
        &result,
    );
    result?;

    Ok(Json(MessageResponse::new(format!("Document {} updated.", id))))
}

/// Delete a document
#[utoipa::path(
    delete,
    path = "/documents/{id}",
    tag = "documents",
    params(("id" = String, Path, description = "Document id")),
    responses(
        (status = 200, description = "Document deleted", body = MessageResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn delete_document<R: VectorRepository>(
    State(state): State<DocumentsState<R>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> DocumentResult<Json<MessageResponse>> {
    let result = state.service.delete_document(&state.collection, &id).await;
    audit(
        &headers,
        "document.delete",
        format!("{}/{}", state.collection, id),
        &result,
    );
    result?;

    Ok(Json(MessageResponse::new(format!("Document {} deleted.", id))))
}
