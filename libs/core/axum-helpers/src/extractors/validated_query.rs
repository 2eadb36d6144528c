//! Query-string extractor with validation.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Query extractor that runs `Validate` on the parsed parameters.
///
/// Missing or unparsable parameters and failed validation both return 400
/// with the standard error body.
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        params
            .validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ValidatedQuery(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Search {
        #[validate(length(min = 1))]
        q: String,
        #[validate(range(min = 1))]
        n: u32,
    }

    fn app() -> Router {
        Router::new().route(
            "/search",
            get(|ValidatedQuery(s): ValidatedQuery<Search>| async move {
                format!("{}:{}", s.q, s.n)
            }),
        )
    }

    #[tokio::test]
    async fn test_valid_query_passes() {
        let response = app()
            .oneshot(Request::get("/search?q=rust&n=2").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_query_is_bad_request() {
        for uri in ["/search?q=&n=2", "/search?q=rust&n=0", "/search?n=2"] {
            let response = app()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }
    }
}
