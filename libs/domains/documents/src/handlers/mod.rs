//! HTTP surfaces over [`DocumentService`].
//!
//! - action routes (`/create_collection`, `/insert_document`, ...) carry the
//!   collection name and document id in each request
//! - resource routes (`/documents`, `/documents/{id}`) work on one configured
//!   collection with server-generated ids

pub mod rest;
pub mod rpc;

use axum::{
    Router,
    http::HeaderMap,
    routing::{delete, get, post},
};
use axum_helpers::{
    AuditEvent, AuditOutcome,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::DocumentResult;
use crate::models::{
    CreateDocumentRequest, Document, DocumentIdResponse, InsertDocumentRequest, MessageResponse,
    RetrieveRequest, RetrieveResponse, UpdateDocumentRequest, UpdateDocumentTextRequest,
};
use crate::repository::VectorRepository;
use crate::service::DocumentService;

/// OpenAPI documentation for both document surfaces
#[derive(OpenApi)]
#[openapi(
    paths(
        rpc::create_collection,
        rpc::delete_collection,
        rpc::insert_document,
        rpc::update_document,
        rpc::delete_document,
        rpc::retrieve,
        rest::create_document,
        rest::search_documents,
        rest::get_document,
        rest::update_document,
        rest::delete_document,
    ),
    components(
        schemas(
            InsertDocumentRequest, UpdateDocumentRequest, RetrieveRequest, RetrieveResponse,
            MessageResponse, CreateDocumentRequest, DocumentIdResponse,
            UpdateDocumentTextRequest, Document
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "actions", description = "Collection and document operations addressed by name and id"),
        (name = "documents", description = "Documents in the default collection")
    )
)]
pub struct ApiDoc;

/// State for the resource routes: the service plus the collection they serve.
pub struct DocumentsState<R: VectorRepository> {
    pub service: DocumentService<R>,
    pub collection: Arc<str>,
}

impl<R: VectorRepository> Clone for DocumentsState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            collection: Arc::clone(&self.collection),
        }
    }
}

/// Action-style routes
pub fn action_router<R: VectorRepository + 'static>(service: DocumentService<R>) -> Router {
    Router::new()
        .route("/create_collection", post(rpc::create_collection))
        .route("/delete_collection", delete(rpc::delete_collection))
        .route("/insert_document", post(rpc::insert_document))
        .route("/update_document", post(rpc::update_document))
        .route("/delete_document", delete(rpc::delete_document))
        .route("/retrieve", post(rpc::retrieve))
        .with_state(service)
}

/// Resource-style routes on `collection`
pub fn resource_router<R: VectorRepository + 'static>(
    service: DocumentService<R>,
    collection: impl Into<Arc<str>>,
) -> Router {
    let state = DocumentsState {
        service,
        collection: collection.into(),
    };

    Router::new()
        .route(
            "/documents",
            get(rest::search_documents).post(rest::create_document),
        )
        .route(
            "/documents/{id}",
            get(rest::get_document)
                .put(rest::update_document)
                .delete(rest::delete_document),
        )
        .with_state(state)
}

/// Both surfaces on one router
pub fn router<R: VectorRepository + 'static>(
    service: DocumentService<R>,
    collection: impl Into<Arc<str>>,
) -> Router {
    action_router(service.clone()).merge(resource_router(service, collection))
}

/// Records a mutation outcome on the audit log.
fn audit<T>(headers: &HeaderMap, action: &str, resource: String, result: &DocumentResult<T>) {
    let event = match result {
        Ok(_) => AuditEvent::new(action, Some(resource), AuditOutcome::Success),
        Err(e) => AuditEvent::new(action, Some(resource), AuditOutcome::Failure)
            .with_details(json!({ "error": e.to_string() })),
    };
    event.with_client(headers).log();
}
