//! Action-style handlers: collection and document addressed in the request.

use axum::{Json, extract::State, http::HeaderMap};
use axum_helpers::{
    ValidatedJson, ValidatedQuery,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};

use super::audit;
use crate::error::DocumentResult;
use crate::models::{
    CollectionParams, DocumentParams, InsertDocumentRequest, MessageResponse, RetrieveRequest,
    RetrieveResponse, UpdateDocumentRequest,
};
use crate::repository::VectorRepository;
use crate::service::DocumentService;

/// Create a collection, or reuse it if it already exists
#[utoipa::path(
    post,
    path = "/create_collection",
    tag = "actions",
    params(CollectionParams),
    responses(
        (status = 200, description = "Collection created or reused", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn create_collection<R: VectorRepository>(
    State(service): State<DocumentService<R>>,
    headers: HeaderMap,
    ValidatedQuery(params): ValidatedQuery<CollectionParams>,
) -> DocumentResult<Json<MessageResponse>> {
    let name = params.collection_name;
    let result = service.create_collection(&name).await;
    audit(&headers, "collection.create", name.clone(), &result);
    result?;

    Ok(Json(MessageResponse::new(format!(
        "Collection '{}' created.",
        name
    ))))
}

/// Delete a collection; succeeds when it does not exist
#[utoipa::path(
    delete,
    path = "/delete_collection",
    tag = "actions",
    params(CollectionParams),
    responses(
        (status = 200, description = "Collection deleted or absent", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn delete_collection<R: VectorRepository>(
    State(service): State<DocumentService<R>>,
    headers: HeaderMap,
    ValidatedQuery(params): ValidatedQuery<CollectionParams>,
) -> DocumentResult<Json<MessageResponse>> {
    let name = params.collection_name;
    let result = service.delete_collection(&name).await;
    audit(&headers, "collection.delete", name.clone(), &result);
    result?;

    Ok(Json(MessageResponse::new(format!(
        "Collection '{}' deleted.",
        name
    ))))
}

/// Insert a document, creating the collection if needed
#[utoipa::path(
    post,
    path = "/insert_document",
    tag = "actions",
    request_body = InsertDocumentRequest,
    responses(
        (status = 200, description = "Document inserted", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn insert_document<R: VectorRepository>(
    State(service): State<DocumentService<R>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<InsertDocumentRequest>,
) -> DocumentResult<Json<MessageResponse>> {
    let result = service
        .insert_document(&input.collection_name, input.doc_id.clone(), &input.text)
        .await;
    let resource = match (&result, &input.doc_id) {
        (Ok(id), _) | (Err(_), Some(id)) => format!("{}/{}", input.collection_name, id),
        (Err(_), None) => input.collection_name.clone(),
    };
    audit(&headers, "document.insert", resource, &result);
    let doc_id = result?;

    Ok(Json(MessageResponse::new(format!(
        "Document '{}' inserted.",
        doc_id
    ))))
}

/// Replace the text of an existing document
#[utoipa::path(
    post,
    path = "/update_document",
    tag = "actions",
    request_body = UpdateDocumentRequest,
    responses(
        (status = 200, description = "Document updated", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn update_document<R: VectorRepository>(
    State(service): State<DocumentService<R>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<UpdateDocumentRequest>,
) -> DocumentResult<Json<MessageResponse>> {
    let result = service
        .update_document(&input.collection_name, &input.doc_id, &input.text)
        .await;
    audit(
        &headers,
        "document.update",
        format!("{}/{}", input.collection_name, input.doc_id),
        &result,
    );
    result?;

    Ok(Json(MessageResponse::new(format!(
        "Document '{}' updated.",
        input.doc_id
    ))))
}

/// Delete a document
#[utoipa::path(
    delete,
    path = "/delete_document",
    tag = "actions",
    params(DocumentParams),
    responses(
        (status = 200, description = "Document deleted", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn delete_document<R: VectorRepository>(
    State(service): State<DocumentService<R>>,
    headers: HeaderMap,
    ValidatedQuery(params): ValidatedQuery<DocumentParams>,
) -> DocumentResult<Json<MessageResponse>> {
    let result = service
        .delete_document(&params.collection_name, &params.doc_id)
        .await;
    audit(
        &headers,
        "document.delete",
        format!("{}/{}", params.collection_name, params.doc_id),
        &result,
    );
    result?;

    Ok(Json(MessageResponse::new(format!(
        "Document '{}' deleted from '{}'.",
        params.doc_id, params.collection_name
    ))))
}

/// Retrieve the documents most similar to a query text
#[utoipa::path(
    post,
    path = "/retrieve",
    tag = "actions",
    request_body = RetrieveRequest,
    responses(
        (status = 200, description = "Ranked `[doc_id, text, score]` tuples", body = RetrieveResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn retrieve<R: VectorRepository>(
    State(service): State<DocumentService<R>>,
    ValidatedJson(input): ValidatedJson<RetrieveRequest>,
) -> DocumentResult<Json<RetrieveResponse>> {
    let results = service
        .retrieve(&input.collection_name, &input.query_text, input.top_n)
        .await?;
    Ok(Json(RetrieveResponse { results }))
}
