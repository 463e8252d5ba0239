use super::models::{Rating, RatingDto};
use crate::modules::books::mapper::BookMapper;
use crate::modules::users::mapper::UserMapper;

/// Translation between [`Rating`] and [`RatingDto`]; nested users and books
/// go through their own mappers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingMapper {
    users: UserMapper,
    books: BookMapper,
}

impl RatingMapper {
    pub fn new(users: UserMapper, books: BookMapper) -> Self {
        Self { users, books }
    }

    pub fn to_dto(&self, rating: &Rating) -> RatingDto {
        RatingDto {
            id: rating.id,
            user_dto: rating.user.as_ref().map(|user| self.users.to_dto(user)),
            book_dto: self.books.to_dto(&rating.book),
            value: rating.value,
            comment: rating.comment.clone(),
        }
    }

    pub fn to_domain(&self, dto: &RatingDto) -> Rating {
        Rating {
            user: dto.user_dto.as_ref().map(|user| self.users.to_domain(user)),
            ..self.to_domain_without_user(dto)
        }
    }

    /// Like [`RatingMapper::to_domain`], but the user is always absent.
    pub fn to_domain_without_user(&self, dto: &RatingDto) -> Rating {
        Rating {
            id: dto.id,
            user: None,
            book: self.books.to_domain(&dto.book_dto),
            value: dto.value,
            comment: dto.comment.clone(),
        }
    }

    pub fn to_dto_list(&self, ratings: &[Rating]) -> Vec<RatingDto> {
        ratings.iter().map(|rating| self.to_dto(rating)).collect()
    }
}
