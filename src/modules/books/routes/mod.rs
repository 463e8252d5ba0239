//! HTTP handlers of the books module.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use redude_authz::{verify_bearer, BearerToken};
use redude_http::error::AppError;

use super::mapper::BookMapper;
use super::models::{BookDto, SearchParams};
use super::ratings::{flow, RatingDto, RatingOutcome, RatingReply};
use super::BooksState;

const ACTIVITY: &str = "redude::activity";

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "books module is healthy"
}

/// `GET /books?q=...`: search the external catalog.
pub async fn search_books(
    State(state): State<BooksState>,
    token: BearerToken,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<BookDto>>, AppError> {
    if verify_bearer(state.services.verifier.as_ref(), &token)
        .await
        .is_none()
    {
        tracing::info!(target: ACTIVITY, action = "search", outcome = "auth_failed");
        if state.sentinel_responses {
            return Ok(Json(Vec::new()));
        }
        return Err(AppError::unauthorized("identity token missing or rejected"));
    }

    let books = state
        .services
        .catalog
        .search(&params.q, params.extended)
        .await
        .map_err(anyhow::Error::from)?;

    tracing::info!(
        target: ACTIVITY,
        action = "search",
        query = %params.q,
        extended = params.extended,
        results = books.len()
    );
    Ok(Json(BookMapper.to_dto_list(&books)))
}

/// `POST /books/{google_id}`: rate a book.
pub async fn rate_book(
    State(state): State<BooksState>,
    token: BearerToken,
    Path(google_id): Path<String>,
    Json(dto): Json<RatingDto>,
) -> Result<RatingReply, AppError> {
    let outcome = flow::rate_book(&state, &token, &google_id, &dto).await?;
    log_outcome("rate", &google_id, outcome);
    Ok(reply(&state, outcome))
}

/// `DELETE /books`: delete a rating named by the body.
pub async fn delete_rating(
    State(state): State<BooksState>,
    token: BearerToken,
    Json(dto): Json<RatingDto>,
) -> Result<RatingReply, AppError> {
    let outcome = flow::delete_rating(&state, &token, &dto).await?;
    log_outcome("delete", &dto.book_dto.google_id, outcome);
    Ok(reply(&state, outcome))
}

/// `GET /books/{google_id}/ratings`: ratings of a book. Other users'
/// ratings are listed without their user.
pub async fn list_ratings(
    State(state): State<BooksState>,
    token: BearerToken,
    Path(google_id): Path<String>,
) -> Result<Json<Vec<RatingDto>>, AppError> {
    let Some(identity) = verify_bearer(state.services.verifier.as_ref(), &token).await else {
        return Err(AppError::unauthorized("identity token missing or rejected"));
    };

    let ratings = state
        .services
        .ratings
        .list_for_book(&google_id)
        .await
        .map_err(anyhow::Error::from)?;

    let mut dtos = state.mapper.to_dto_list(&ratings);
    for dto in &mut dtos {
        let owned = dto
            .user_dto
            .as_ref()
            .is_some_and(|user| user.google_id == identity.google_id);
        if !owned {
            dto.user_dto = None;
        }
    }
    Ok(Json(dtos))
}

fn reply(state: &BooksState, outcome: RatingOutcome) -> RatingReply {
    RatingReply {
        outcome,
        sentinel_responses: state.sentinel_responses,
    }
}

fn log_outcome(action: &'static str, google_id: &str, outcome: RatingOutcome) {
    match outcome.id() {
        Some(rating_id) => {
            tracing::info!(target: ACTIVITY, action, google_id, rating_id, "rating request succeeded")
        }
        None => {
            tracing::info!(target: ACTIVITY, action, google_id, ?outcome, "rating request refused")
        }
    }
}
