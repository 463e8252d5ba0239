use serde::{Deserialize, Serialize};

use redude_authz::Identity;

use crate::modules::wire::null_as_default;

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    /// Google account subject the user signs in with.
    pub google_id: String,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub picture_url: String,
}

/// Profile data used to create or refresh a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub google_id: String,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub picture_url: String,
}

impl NewUser {
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            google_id: self.google_id,
            name: self.name,
            lastname: self.lastname,
            email: self.email,
            picture_url: self.picture_url,
        }
    }
}

impl From<Identity> for NewUser {
    fn from(identity: Identity) -> Self {
        Self {
            google_id: identity.google_id,
            name: identity.name,
            lastname: identity.lastname,
            email: identity.email,
            picture_url: identity.picture_url,
        }
    }
}

/// Wire form of [`User`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDto {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub google_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub lastname: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub picture_url: String,
}
