//! Extractors whose rejections use the [`ErrorResponse`] envelope.
//!
//! Plain `axum::Json` / `axum::extract::Path` answer with a text body; these
//! wrappers translate the rejection into a field-level [`ApiError`] instead.

use axum::extract::path::ErrorKind;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, RawPathParams, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::app::errors::{ApiError, ApiErrorReason, ErrorResponse, LOCATION_BODY, LOCATION_PARAMETER};

/// JSON body extractor; rejections become `invalidArgument` body errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ErrorResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

/// Path extractor; rejections become `invalidParameter` errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiPath<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ErrorResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => {
                let keys: Vec<String> = match RawPathParams::from_request_parts(parts, state).await {
                    Ok(params) => params.iter().map(|(key, _)| key.to_owned()).collect(),
                    Err(_) => Vec::new(),
                };
                Err(path_rejection(rejection, &keys))
            }
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> ErrorResponse {
    let status = rejection.status();
    let message = rejection.body_text();
    let location = match &rejection {
        JsonRejection::JsonDataError(_) => body_location(&message),
        _ => String::new(),
    };
    let error = ApiError::new(message, ApiErrorReason::InvalidArgument, LOCATION_BODY, location);
    tracing::debug!(%status, message = %error.message, "rejected json body");
    ErrorResponse::new(status, error.message.clone(), vec![error])
}

/// Field path named by a serde data error, e.g. `address.city`.
///
/// Reads the `<path>: <error>` prefix and `missing field` detail from the
/// rejection text; empty when neither is present.
fn body_location(message: &str) -> String {
    let detail = message
        .split_once("target type: ")
        .map_or(message, |(_, detail)| detail);

    let (path, rest) = match detail.split_once(": ") {
        Some((path, rest)) if !path.is_empty() && !path.contains(' ') => (path, rest),
        _ => ("", detail),
    };
    let missing = rest
        .split_once("missing field `")
        .and_then(|(_, tail)| tail.split_once('`'))
        .map(|(field, _)| field);

    match (path, missing) {
        ("", Some(field)) => field.to_owned(),
        (path, Some(field)) => format!("{path}.{field}"),
        (path, None) => path.to_owned(),
    }
}

/// `keys` are the route's captured parameter names, used when the error
/// itself does not say which parameter failed.
fn path_rejection(rejection: PathRejection, keys: &[String]) -> ErrorResponse {
    let status = rejection.status();
    let named = match &rejection {
        PathRejection::FailedToDeserializePathParams(err) => match err.kind() {
            ErrorKind::ParseErrorAtKey { key, .. }
            | ErrorKind::InvalidUtf8InPathParam { key } => Some(key.clone()),
            _ => None,
        },
        _ => None,
    };
    let location = match (named, keys) {
        (Some(key), _) => key,
        (None, [only]) => only.clone(),
        (None, _) => keys.join(","),
    };
    let error = ApiError::new(
        rejection.body_text(),
        ApiErrorReason::InvalidParameter,
        LOCATION_PARAMETER,
        location,
    );
    tracing::debug!(%status, message = %error.message, "rejected path parameters");
    ErrorResponse::new(status, error.message.clone(), vec![error])
}
