use axum::{
    response::{IntoResponse, Response},
    Json,
};
use redude_http::error::AppError;

/// What a rating operation could not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    User,
    Book,
    Rating,
}

impl Missing {
    pub fn as_str(self) -> &'static str {
        match self {
            Missing::User => "user",
            Missing::Book => "book",
            Missing::Rating => "rating",
        }
    }
}

/// Result of a rating create or delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingOutcome {
    Rated(i64),
    Deleted(i64),
    AuthFailed,
    NotFound(Missing),
    /// The rating exists but belongs to another user or book.
    Forbidden,
}

impl RatingOutcome {
    pub fn id(self) -> Option<i64> {
        match self {
            RatingOutcome::Rated(id) | RatingOutcome::Deleted(id) => Some(id),
            _ => None,
        }
    }

    /// Legacy response body: the rating id, or `0` for any failure.
    pub fn sentinel(self) -> i64 {
        self.id().unwrap_or(0)
    }

    fn into_error(self) -> Option<AppError> {
        match self {
            RatingOutcome::Rated(_) | RatingOutcome::Deleted(_) => None,
            RatingOutcome::AuthFailed => Some(AppError::unauthorized(
                "identity token missing or rejected",
            )),
            RatingOutcome::NotFound(missing) => Some(AppError::not_found_resource(
                missing.as_str(),
                format!("{} not found", missing.as_str()),
            )),
            RatingOutcome::Forbidden => Some(AppError::forbidden(
                "rating belongs to another user or book",
            )),
        }
    }
}

/// HTTP rendering of a [`RatingOutcome`].
///
/// With `sentinel_responses` every outcome answers 200 with the id or `0`;
/// otherwise failures render through [`AppError`].
pub struct RatingReply {
    pub outcome: RatingOutcome,
    pub sentinel_responses: bool,
}

impl IntoResponse for RatingReply {
    fn into_response(self) -> Response {
        if self.sentinel_responses {
            return Json(self.outcome.sentinel()).into_response();
        }
        match self.outcome.into_error() {
            Some(error) => error.into_response(),
            None => Json(self.outcome.sentinel()).into_response(),
        }
    }
}
