pub mod mapper;
pub mod models;
pub mod repository;

use async_trait::async_trait;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use redude_authz::{verify_bearer, BearerToken};
use redude_http::error::AppError;
use redude_kernel::{InitCtx, Module};
use serde_json::json;

use crate::app::AppServices;
use mapper::UserMapper;
use models::{NewUser, UserDto};

/// Sign-in and profile module
pub struct UsersModule {
    services: AppServices,
}

impl UsersModule {
    pub fn new(services: AppServices) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Module for UsersModule {
    fn name(&self) -> &'static str {
        "users"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "users module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", post(sign_in))
            .route("/me", get(get_profile))
            .route("/health", get(health_check))
            .with_state(self.services.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "post": {
                        "summary": "Sign in with a Google ID token",
                        "tags": ["Users"],
                        "parameters": [
                            { "name": "Authorization", "in": "header", "required": true, "schema": { "type": "string" } }
                        ],
                        "responses": {
                            "200": {
                                "description": "Stored user",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/UserDto" }
                                    }
                                }
                            },
                            "401": {
                                "description": "Missing or rejected token",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/me": {
                    "get": {
                        "summary": "Profile of the signed-in user",
                        "tags": ["Users"],
                        "responses": {
                            "200": {
                                "description": "User profile",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/UserDto" }
                                    }
                                }
                            },
                            "404": {
                                "description": "User has not signed in yet",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Users health check",
                        "tags": ["Users"],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": { "text/plain": { "schema": { "type": "string" } } }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "UserDto": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "googleId": { "type": "string", "description": "Google account id" },
                            "name": { "type": "string" },
                            "lastname": { "type": "string" },
                            "email": { "type": "string", "format": "email" },
                            "pictureUrl": { "type": "string", "format": "uri" }
                        },
                        "required": ["id", "googleId"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "users module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "users module stopped");
        Ok(())
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "users module is healthy"
}

/// Create or refresh the caller's user from the token claims.
async fn sign_in(
    State(services): State<AppServices>,
    token: BearerToken,
) -> Result<Json<UserDto>, AppError> {
    let Some(identity) = verify_bearer(services.verifier.as_ref(), &token).await else {
        return Err(AppError::unauthorized("identity token missing or rejected"));
    };

    let user = services
        .users
        .upsert(NewUser::from(identity))
        .await
        .map_err(anyhow::Error::from)?;

    tracing::info!(target: "redude::activity", action = "sign_in", user_id = user.id);
    Ok(Json(UserMapper.to_dto(&user)))
}

/// Profile of the caller.
async fn get_profile(
    State(services): State<AppServices>,
    token: BearerToken,
) -> Result<Json<UserDto>, AppError> {
    let Some(identity) = verify_bearer(services.verifier.as_ref(), &token).await else {
        return Err(AppError::unauthorized("identity token missing or rejected"));
    };

    let user = services
        .users
        .find_by_google_id(&identity.google_id)
        .await
        .map_err(anyhow::Error::from)?
        .ok_or_else(|| AppError::not_found_resource("user", "user has not signed in"))?;

    Ok(Json(UserMapper.to_dto(&user)))
}
