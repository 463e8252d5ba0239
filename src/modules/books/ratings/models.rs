use serde::{Deserialize, Serialize};

use crate::modules::books::models::{Book, BookDto};
use crate::modules::users::models::{User, UserDto};
use crate::modules::wire::null_as_default;

/// A user's score and comment for a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rating {
    /// Absent until the rating is stored.
    pub id: Option<i64>,
    /// Absent in anonymised projections; required to store the rating.
    pub user: Option<User>,
    pub book: Book,
    pub value: i32,
    pub comment: String,
}

/// Wire form of [`Rating`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RatingDto {
    pub id: Option<i64>,
    pub user_dto: Option<UserDto>,
    #[serde(deserialize_with = "null_as_default")]
    pub book_dto: BookDto,
    #[serde(deserialize_with = "null_as_default")]
    pub value: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub comment: String,
}
