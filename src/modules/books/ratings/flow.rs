//! Rating create/delete pipelines.
//!
//! Each step either advances or ends the request with a failed
//! [`RatingOutcome`]. Store failures are not outcomes; they surface as
//! internal errors.

use redude_authz::{verify_bearer, BearerToken};
use redude_http::error::AppError;

use super::models::RatingDto;
use super::outcome::{Missing, RatingOutcome};
use crate::modules::books::BooksState;

/// Rate the book `google_id` on behalf of the token's user.
///
/// A book missing from the store is created from the payload. The acting user
/// always comes from the token, never from the payload.
pub async fn rate_book(
    state: &BooksState,
    token: &BearerToken,
    google_id: &str,
    dto: &RatingDto,
) -> Result<RatingOutcome, AppError> {
    let services = &state.services;

    let Some(identity) = verify_bearer(services.verifier.as_ref(), token).await else {
        return Ok(RatingOutcome::AuthFailed);
    };

    let Some(user) = services
        .users
        .find_by_google_id(&identity.google_id)
        .await
        .map_err(anyhow::Error::from)?
    else {
        return Ok(RatingOutcome::NotFound(Missing::User));
    };

    let book = match services
        .books
        .find_by_google_id(google_id)
        .await
        .map_err(anyhow::Error::from)?
    {
        Some(book) => book,
        None => {
            let mut book = state.mapper.to_domain_without_user(dto).book;
            book.google_id = google_id.to_string();
            tracing::info!(google_id, "storing newly rated book");
            services
                .books
                .save_or_update(book)
                .await
                .map_err(anyhow::Error::from)?
        }
    };

    let mut rating = state.mapper.to_domain_without_user(dto);
    rating.id = None;
    rating.user = Some(user);
    rating.book = book;

    let saved = services
        .ratings
        .save(rating)
        .await
        .map_err(anyhow::Error::from)?;

    Ok(saved.id.map_or(
        RatingOutcome::NotFound(Missing::Rating),
        RatingOutcome::Rated,
    ))
}

/// Delete the rating named by `dto.id` if it belongs to the token's user and
/// to the book named by `dto.book_dto`.
pub async fn delete_rating(
    state: &BooksState,
    token: &BearerToken,
    dto: &RatingDto,
) -> Result<RatingOutcome, AppError> {
    let services = &state.services;

    let Some(identity) = verify_bearer(services.verifier.as_ref(), token).await else {
        return Ok(RatingOutcome::AuthFailed);
    };

    let Some(user) = services
        .users
        .find_by_google_id(&identity.google_id)
        .await
        .map_err(anyhow::Error::from)?
    else {
        return Ok(RatingOutcome::NotFound(Missing::User));
    };

    let Some(book) = services
        .books
        .find_by_google_id(&dto.book_dto.google_id)
        .await
        .map_err(anyhow::Error::from)?
    else {
        return Ok(RatingOutcome::NotFound(Missing::Book));
    };

    let rating = match dto.id {
        Some(id) => services
            .ratings
            .get_by_id(id)
            .await
            .map_err(anyhow::Error::from)?,
        None => None,
    };
    let Some(rating) = rating else {
        return Ok(RatingOutcome::NotFound(Missing::Rating));
    };

    let owned_by_user = rating.user.as_ref().map(|owner| owner.id) == Some(user.id);
    if !owned_by_user || rating.book.google_id != book.google_id {
        return Ok(RatingOutcome::Forbidden);
    }

    services
        .ratings
        .delete(&rating)
        .await
        .map_err(anyhow::Error::from)?;

    Ok(rating.id.map_or(
        RatingOutcome::NotFound(Missing::Rating),
        RatingOutcome::Deleted,
    ))
}
