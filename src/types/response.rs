use axum::{
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// 201 Created carrying the resource as body, optionally with a `Location`.
pub struct Created<T: Serialize> {
    location: Option<String>,
    body: T,
}

impl<T: Serialize> Created<T> {
    pub fn new(body: T) -> Self {
        Self {
            location: None,
            body,
        }
    }

    /// Created response pointing at the new resource
    pub fn at(location: impl Into<String>, body: T) -> Self {
        Self {
            location: Some(location.into()),
            body,
        }
    }
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        match self.location {
            Some(location) => {
                (StatusCode::CREATED, [(LOCATION, location)], Json(self.body)).into_response()
            }
            None => (StatusCode::CREATED, Json(self.body)).into_response(),
        }
    }
}

/// No content response helper
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> Response {
        StatusCode::NO_CONTENT.into_response()
    }
}
