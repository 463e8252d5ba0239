pub mod catalog;
pub mod mapper;
pub mod models;
pub mod ratings;
pub mod repository;
pub mod routes;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use axum::{
    routing::{get, post},
    Router,
};
use redude_kernel::{InitCtx, Module};
use serde_json::json;

use crate::app::AppServices;
use ratings::RatingMapper;

/// State shared by the books handlers.
#[derive(Clone)]
pub struct BooksState {
    pub services: AppServices,
    pub mapper: RatingMapper,
    /// Answer failed rating operations with HTTP 200 and `0`.
    pub sentinel_responses: bool,
}

/// Book search and rating module
pub struct BooksModule {
    state: BooksState,
}

impl BooksModule {
    pub fn new(services: AppServices, sentinel_responses: bool) -> Self {
        Self {
            state: BooksState {
                services,
                mapper: RatingMapper::default(),
                sentinel_responses,
            },
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            sentinel_responses = self.state.sentinel_responses,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route(
                "/",
                get(routes::search_books).delete(routes::delete_rating),
            )
            .route("/health", get(routes::health_check))
            .route("/{google_id}", post(routes::rate_book))
            .route("/{google_id}/ratings", get(routes::list_ratings))
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let rating_response = if self.state.sentinel_responses {
            "Rating id, or 0 when the token, user, book or rating check failed"
        } else {
            "Rating id"
        };

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "Search the book catalog",
                        "tags": ["Books"],
                        "parameters": [
                            { "name": "q", "in": "query", "required": true, "schema": { "type": "string" } },
                            { "name": "extended", "in": "query", "required": false, "schema": { "type": "boolean" } },
                            { "name": "Authorization", "in": "header", "required": true, "schema": { "type": "string" } }
                        ],
                        "responses": {
                            "200": {
                                "description": "Matching books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/BookDto" }
                                        }
                                    }
                                }
                            },
                            "500": {
                                "description": "Catalog unavailable",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "delete": {
                        "summary": "Delete one of the caller's ratings",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/RatingDto" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": rating_response,
                                "content": { "application/json": { "schema": { "type": "integer" } } }
                            }
                        }
                    }
                },
                "/{googleId}": {
                    "post": {
                        "summary": "Rate a book",
                        "tags": ["Books"],
                        "parameters": [
                            { "name": "googleId", "in": "path", "required": true, "schema": { "type": "string" } }
                        ],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/RatingDto" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": rating_response,
                                "content": { "application/json": { "schema": { "type": "integer" } } }
                            }
                        }
                    }
                },
                "/{googleId}/ratings": {
                    "get": {
                        "summary": "List the ratings of a book",
                        "tags": ["Books"],
                        "parameters": [
                            { "name": "googleId", "in": "path", "required": true, "schema": { "type": "string" } }
                        ],
                        "responses": {
                            "200": {
                                "description": "Ratings, oldest first",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/RatingDto" }
                                        }
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
                "/health": {
                    "get": {
                        "summary": "Books health check",
                        "tags": ["Books"],
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
                    "BookDto": {
                        "type": "object",
                        "properties": {
                            "googleId": { "type": "string", "description": "Google Books volume id" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "categories": { "type": "string" }
                        },
                        "required": ["googleId"]
                    },
                    "RatingDto": {
                        "type": "object",
                        "properties": {
                            "id": { "type": ["integer", "null"], "format": "int64" },
                            "userDto": {
                                "oneOf": [
                                    { "$ref": "#/components/schemas/UserDto" },
                                    { "type": "null" }
                                ]
                            },
                            "bookDto": { "$ref": "#/components/schemas/BookDto" },
                            "value": { "type": "integer", "format": "int32" },
                            "comment": { "type": "string" }
                        },
                        "required": ["bookDto", "value"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}
