use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::api::error::ApiError;

/// Path parameters whose parse failures become `ApiError::Bind`.
///
/// Ids in the route (`/:id`, `/class/:class_id/...`) are parsed here, so a
/// handler only ever sees well-formed numbers.
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::Bind(format!(
                "invalid path: {}",
                rejection.body_text()
            ))),
        }
    }
}

/// JSON body whose parse failures become `ApiError::Bind`.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::Bind(format!(
                "unable to bind JSON to struct: {}",
                rejection.body_text()
            ))),
        }
    }
}

/// Body taken verbatim as UTF-8 text
#[derive(Debug)]
pub struct RawText(pub String);

#[async_trait]
impl<S> FromRequest<S> for RawText
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match String::from_request(req, state).await {
            Ok(text) => Ok(Self(text)),
            Err(rejection) => Err(ApiError::Bind(format!(
                "unable to read request body: {}",
                rejection.body_text()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;

    #[derive(Debug, serde::Deserialize)]
    struct Named {
        name: String,
    }

    #[tokio::test]
    async fn test_json_rejection_becomes_bind_error() {
        let req = axum::http::Request::builder()
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{\"nam\": 1}"))
            .unwrap();
        let result = ApiJson::<Named>::from_request(req, &()).await;
        assert!(matches!(result, Err(ApiError::Bind(_))));
    }

    #[tokio::test]
    async fn test_json_accepted() {
        let req = axum::http::Request::builder()
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{\"name\": \"volume\"}"))
            .unwrap();
        let ApiJson(named) = ApiJson::<Named>::from_request(req, &()).await.unwrap();
        assert_eq!(named.name, "volume");
    }

    #[tokio::test]
    async fn test_raw_text_keeps_body_verbatim() {
        let req = axum::http::Request::builder()
            .body(Body::from("port: 8080\n"))
            .unwrap();
        let RawText(text) = RawText::from_request(req, &()).await.unwrap();
        assert_eq!(text, "port: 8080\n");
    }

    #[tokio::test]
    async fn test_raw_text_rejects_invalid_utf8() {
        let req = axum::http::Request::builder()
            .body(Body::from(vec![0xff, 0xfe]))
            .unwrap();
        let result = RawText::from_request(req, &()).await;
        assert!(matches!(result, Err(ApiError::Bind(_))));
    }
}
