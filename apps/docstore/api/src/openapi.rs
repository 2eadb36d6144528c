use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Docstore API",
        version = "0.1.0",
        description = "Store text documents as embeddings in named collections and retrieve them by similarity"
    )
)]
struct BaseApiDoc;

/// Combined OpenAPI document: shared error schema plus the documents routes,
/// which are mounted at the root.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        BaseApiDoc::openapi().merge_from(domain_documents::handlers::ApiDoc::openapi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_both_surfaces() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/create_collection",
            "/delete_collection",
            "/insert_document",
            "/update_document",
            "/delete_document",
            "/retrieve",
            "/documents",
            "/documents/{id}",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_openapi_keeps_error_schema() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.schemas.contains_key("ErrorResponse"));
        assert_eq!(doc.info.title, "Docstore API");
    }
}
