use crate::http_api::counter::NoValueProvided;
use counter::{schema::UrlError, ErrorPayload};
use uuid::Uuid;
use warp::{
    filters::body::BodyDeserializeError,
    http::StatusCode,
    reject::{LengthRequired, MethodNotAllowed, PayloadTooLarge, UnsupportedMediaType},
    Rejection, Reply,
};

/// An error on its way to becoming an [`ErrorPayload`] response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub error_code: Option<&'static str>,
    pub message: String,
}

impl warp::reject::Reject for ApiError {}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            error_code: None,
            message: message.into(),
        }
    }

    pub fn with_error_code(self, error_code: &'static str) -> Self {
        Self {
            error_code: Some(error_code),
            ..self
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found").with_error_code("NotFound")
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            .with_error_code("Internal")
    }

    /// Attach a fresh request id; the id is logged so the response can be
    /// traced back to this line.
    pub fn into_payload(self) -> (StatusCode, ErrorPayload) {
        let request_id = Uuid::new_v4().to_string();

        if self.status.is_server_error() {
            tracing::error!(%request_id, "{}", self);
        } else {
            tracing::info!(%request_id, "{}", self);
        }

        let payload = ErrorPayload {
            error_code: self.error_code.map(ToOwned::to_owned),
            message: self.message,
            request_id,
        };

        (self.status, payload)
    }
}

pub fn from_anyhow(e: anyhow::Error) -> ApiError {
    let e = match e.downcast::<ApiError>() {
        Ok(error) => return error,
        Err(e) => e,
    };

    if let Some(NoValueProvided) = e.downcast_ref::<NoValueProvided>() {
        return ApiError::new(StatusCode::BAD_REQUEST, NoValueProvided.to_string());
    }

    if let Some(UrlError::InvalidKey(key)) = e.downcast_ref::<UrlError>() {
        tracing::debug!("rejecting invalid key {:?}", key);
        return ApiError::not_found();
    }

    tracing::error!("internal error occurred: {:#}", e);

    ApiError::internal()
}

fn from_rejection(rejection: &Rejection) -> ApiError {
    if let Some(error) = rejection.find::<ApiError>() {
        return error.clone();
    }

    if rejection.is_not_found() {
        return ApiError::not_found();
    }

    if let Some(e) = rejection.find::<BodyDeserializeError>() {
        return ApiError::new(StatusCode::BAD_REQUEST, e.to_string()).with_error_code("BadRequest");
    }

    if rejection.find::<UnsupportedMediaType>().is_some() {
        return ApiError::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected a body of type application/json",
        )
        .with_error_code("UnsupportedMediaType");
    }

    if rejection.find::<PayloadTooLarge>().is_some() {
        return ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large")
            .with_error_code("PayloadTooLarge");
    }

    if rejection.find::<LengthRequired>().is_some() {
        return ApiError::new(StatusCode::LENGTH_REQUIRED, "Length Required")
            .with_error_code("BadRequest");
    }

    if rejection.find::<MethodNotAllowed>().is_some() {
        return ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
            .with_error_code("MethodNotAllowed");
    }

    tracing::error!("unhandled rejection: {:?}", rejection);

    ApiError::internal()
}

/// Turns every rejection into an [`ErrorPayload`] response, so that no
/// 4xx or 5xx leaves the server without one.
pub async fn unpack_problem(rejection: Rejection) -> Result<impl Reply, Rejection> {
    let (status, payload) = from_rejection(&rejection).into_payload();

    let reply = warp::reply::json(&payload);
    let reply = warp::reply::with_status(reply, status);

    Ok(reply)
}
