use super::models::{User, UserDto};

/// Field-by-field translation between [`User`] and [`UserDto`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UserMapper;

impl UserMapper {
    pub fn to_dto(&self, user: &User) -> UserDto {
        UserDto {
            id: user.id,
            google_id: user.google_id.clone(),
            name: user.name.clone(),
            lastname: user.lastname.clone(),
            email: user.email.clone(),
            picture_url: user.picture_url.clone(),
        }
    }

    pub fn to_domain(&self, dto: &UserDto) -> User {
        User {
            id: dto.id,
            google_id: dto.google_id.clone(),
            name: dto.name.clone(),
            lastname: dto.lastname.clone(),
            email: dto.email.clone(),
            picture_url: dto.picture_url.clone(),
        }
    }
}
