use serde::{Deserialize, Serialize};

use crate::modules::wire::null_as_default;

/// A book known to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    /// Internal id, absent until the book is stored.
    pub id: Option<i64>,
    /// Google Books volume id, the key books are looked up by.
    pub google_id: String,
    pub title: String,
    pub author: String,
    /// Comma separated category names.
    pub categories: String,
}

/// Wire form of [`Book`]; carries no internal id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookDto {
    #[serde(deserialize_with = "null_as_default")]
    pub google_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(deserialize_with = "null_as_default")]
    pub categories: String,
}

/// Query string of `GET /books`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub q: String,
    /// Fetch a larger page of results.
    pub extended: bool,
}
