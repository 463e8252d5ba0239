use axum::http::StatusCode;
use redude_kernel::{settings::Settings, Module};
use serde_json::json;

use super::BooksModule;
use super::ratings::RatingService;
use super::repository::BookRepository;
use crate::app::build_registry;
use crate::test_support::{
    self, delete_json, get, harness, identity, other_identity, post_json, rating_json, send,
    Harness, OTHER_TOKEN, TOKEN, UNREACHABLE_TOKEN,
};

fn router(harness: &Harness) -> axum::Router {
    BooksModule::new(harness.services.clone(), true).routes()
}

fn strict_router(harness: &Harness) -> axum::Router {
    BooksModule::new(harness.services.clone(), false).routes()
}

#[tokio::test]
async fn search_returns_catalog_matches() {
    let harness = harness();

    let (status, body) = send(&router(&harness), get("/?q=Dune", Some(TOKEN))).await;

    assert_eq!(status, StatusCode::OK);
    let books = body.as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["googleId"], "googleId");
    assert_eq!(books[0]["title"], "Dune");
}

#[tokio::test]
async fn extended_search_returns_more() {
    let harness = harness();

    let (_, body) = send(&router(&harness), get("/?q=Dune&extended=true", Some(TOKEN))).await;

    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn search_without_valid_token() {
    let harness = harness();

    let (status, body) = send(&router(&harness), get("/?q=Dune", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = send(&strict_router(&harness), get("/?q=Dune", Some("forged"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rate_book_succeeds() {
    let harness = harness();
    let user = harness.sign_in(identity()).await;
    let book = harness.store_book("googleId1").await;
    harness.journal.clear();

    let (status, body) = send(
        &router(&harness),
        post_json("/googleId1", TOKEN, &rating_json(1, "googleId")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let rating_id = body.as_i64().unwrap();
    assert!(rating_id > 0);
    assert_eq!(
        harness.journal.calls(),
        [
            "users.find_by_google_id",
            "books.find_by_google_id",
            "ratings.save"
        ]
    );

    let saved = harness
        .services
        .ratings
        .get_by_id(rating_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.user, Some(user));
    assert_eq!(saved.book, book);
    assert_eq!(saved.value, 10);
    assert_eq!(saved.comment, "comment1");
}

#[tokio::test]
async fn rate_book_creates_missing_book() {
    let harness = harness();
    harness.sign_in(identity()).await;
    harness.journal.clear();

    let (status, body) = send(
        &router(&harness),
        post_json("/googleId1", TOKEN, &rating_json(1, "googleId")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.as_i64().unwrap() > 0);
    assert_eq!(
        harness.journal.calls(),
        [
            "users.find_by_google_id",
            "books.find_by_google_id",
            "books.save_or_update",
            "ratings.save"
        ]
    );

    let stored = harness
        .services
        .books
        .find_by_google_id("googleId1")
        .await
        .unwrap()
        .unwrap();
    assert!(stored.id.is_some());
    assert_eq!(stored.title, "title1");
    assert_eq!(stored.author, "author1");
}

#[tokio::test]
async fn rate_book_user_not_found() {
    let harness = harness();

    let (status, body) = send(
        &router(&harness),
        post_json("/googleId1", TOKEN, &rating_json(1, "googleId")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(0));
    assert_eq!(harness.journal.calls(), ["users.find_by_google_id"]);
}

#[tokio::test]
async fn rate_book_verification_failed() {
    let harness = harness();
    harness.sign_in(identity()).await;
    harness.journal.clear();

    for token in ["forged", UNREACHABLE_TOKEN] {
        let (status, body) = send(
            &router(&harness),
            post_json("/googleId1", token, &rating_json(1, "googleId")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(0));
    }
    assert!(harness.journal.calls().is_empty());
}

#[tokio::test]
async fn rate_book_ignores_payload_user() {
    let harness = harness();
    harness.sign_in(identity()).await;
    let other = harness.sign_in(other_identity()).await;

    let (_, body) = send(
        &router(&harness),
        post_json("/googleId1", OTHER_TOKEN, &rating_json(1, "googleId")),
    )
    .await;

    let saved = harness
        .services
        .ratings
        .get_by_id(body.as_i64().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.user, Some(other));
}

#[tokio::test]
async fn delete_rating_succeeds() {
    let harness = harness();
    let user = harness.sign_in(identity()).await;
    let book = harness.store_book("googleId").await;
    let rating = harness.store_rating(&user, &book).await;
    let rating_id = rating.id.unwrap();
    harness.journal.clear();

    let (status, body) = send(
        &router(&harness),
        delete_json("/", TOKEN, &rating_json(rating_id, "googleId")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_i64(), Some(rating_id));
    assert!(rating_id > 0);
    assert_eq!(
        harness.journal.calls(),
        [
            "users.find_by_google_id",
            "books.find_by_google_id",
            "ratings.get_by_id",
            "ratings.delete"
        ]
    );
    assert!(harness
        .services
        .ratings
        .get_by_id(rating_id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn delete_rating_book_not_found() {
    let harness = harness();
    harness.sign_in(identity()).await;
    harness.journal.clear();

    let (status, body) = send(
        &router(&harness),
        delete_json("/", TOKEN, &rating_json(1, "googleId")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(0));
    assert_eq!(
        harness.journal.calls(),
        ["users.find_by_google_id", "books.find_by_google_id"]
    );
}

#[tokio::test]
async fn delete_rating_user_not_found() {
    let harness = harness();
    harness.store_book("googleId").await;
    harness.journal.clear();

    let (status, body) = send(
        &router(&harness),
        delete_json("/", TOKEN, &rating_json(1, "googleId")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(0));
    assert_eq!(harness.journal.calls(), ["users.find_by_google_id"]);
}

#[tokio::test]
async fn delete_rating_not_found() {
    let harness = harness();
    harness.sign_in(identity()).await;
    harness.store_book("googleId").await;

    let (status, body) = send(
        &router(&harness),
        delete_json("/", TOKEN, &rating_json(1, "googleId")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(0));

    let mut without_id = rating_json(1, "googleId");
    without_id["id"] = serde_json::Value::Null;
    let (_, body) = send(&router(&harness), delete_json("/", TOKEN, &without_id)).await;
    assert_eq!(body, json!(0));
}

#[tokio::test]
async fn delete_rating_verification_failed() {
    let harness = harness();

    let (status, body) = send(
        &router(&harness),
        delete_json("/", "forged", &rating_json(1, "googleId")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(0));
    assert!(harness.journal.calls().is_empty());
}

#[tokio::test]
async fn delete_rating_of_another_user_is_refused() {
    let harness = harness();
    let owner = harness.sign_in(identity()).await;
    harness.sign_in(other_identity()).await;
    let book = harness.store_book("googleId").await;
    let rating = harness.store_rating(&owner, &book).await;
    let rating_id = rating.id.unwrap();

    let (_, body) = send(
        &router(&harness),
        delete_json("/", OTHER_TOKEN, &rating_json(rating_id, "googleId")),
    )
    .await;
    assert_eq!(body, json!(0));

    let (status, _) = send(
        &strict_router(&harness),
        delete_json("/", OTHER_TOKEN, &rating_json(rating_id, "googleId")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert!(harness
        .services
        .ratings
        .get_by_id(rating_id)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn delete_rating_named_under_another_book_is_refused() {
    let harness = harness();
    let user = harness.sign_in(identity()).await;
    let book = harness.store_book("googleId").await;
    harness.store_book("googleId2").await;
    let rating = harness.store_rating(&user, &book).await;

    let (_, body) = send(
        &router(&harness),
        delete_json("/", TOKEN, &rating_json(rating.id.unwrap(), "googleId2")),
    )
    .await;

    assert_eq!(body, json!(0));
}

#[tokio::test]
async fn strict_mode_uses_status_codes() {
    let harness = harness();
    let router = strict_router(&harness);

    let (status, body) = send(
        &router,
        post_json("/googleId1", "forged", &rating_json(1, "googleId")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "unauthorized");

    let (status, body) = send(
        &router,
        post_json("/googleId1", TOKEN, &rating_json(1, "googleId")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["details"][0]["resource"], "user");

    harness.sign_in(identity()).await;
    let (status, body) = send(
        &router,
        post_json("/googleId1", TOKEN, &rating_json(1, "googleId")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_i64().unwrap() > 0);
}

#[tokio::test]
async fn list_ratings_hides_other_users() {
    let harness = harness();
    let me = harness.sign_in(identity()).await;
    let other = harness.sign_in(other_identity()).await;
    let book = harness.store_book("googleId").await;
    harness.store_rating(&me, &book).await;
    harness.store_rating(&other, &book).await;

    let (status, body) = send(&router(&harness), get("/googleId/ratings", Some(TOKEN))).await;

    assert_eq!(status, StatusCode::OK);
    let ratings = body.as_array().unwrap();
    assert_eq!(ratings.len(), 2);
    assert_eq!(ratings[0]["userDto"]["googleId"], "googleId1");
    assert!(ratings[1]["userDto"].is_null());
    assert_eq!(ratings[1]["bookDto"]["googleId"], "googleId");

    let (_, body) = send(&router(&harness), get("/unknown/ratings", Some(TOKEN))).await;
    assert_eq!(body, json!([]));

    let (status, _) = send(&router(&harness), get("/googleId/ratings", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn full_application_routes_under_api_prefix() {
    let harness = harness();
    harness.sign_in(identity()).await;
    let settings = Settings::default();
    let registry = build_registry(&settings, &harness.services).unwrap();
    let app = redude_http::build_router(&registry, &settings);

    let (status, body) = send(
        &app,
        post_json("/v1/books/googleId1", TOKEN, &rating_json(1, "googleId")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rating_id = body.as_i64().unwrap();
    assert!(rating_id > 0);

    let (status, body) = send(&app, get("/v1/books?q=Dune", Some(TOKEN))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = send(
        &app,
        delete_json("/v1/books", TOKEN, &rating_json(rating_id, "googleId1")),
    )
    .await;
    assert_eq!(body.as_i64(), Some(rating_id));

    let (status, body) = send(&app, get("/v1/books/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("books module is healthy"));

    let (_, spec) = send(&app, get("/docs/openapi.json", None)).await;
    assert!(spec["paths"]["/v1/books"]["delete"].is_object());
    assert!(spec["paths"]["/v1/books/{googleId}"]["post"].is_object());
    assert!(spec["paths"]["/v1/users/me"]["get"].is_object());
    assert!(spec["components"]["schemas"]["RatingDto"].is_object());
}

#[test]
fn module_name_is_the_mount_segment() {
    let module = BooksModule::new(test_support::services(), true);
    assert_eq!(module.name(), "books");
}

fn with_nulls(id: i64, book_google_id: &str) -> serde_json::Value {
    let mut payload = rating_json(id, book_google_id);
    payload["comment"] = serde_json::Value::Null;
    payload["userDto"]["id"] = serde_json::Value::Null;
    payload["userDto"]["pictureUrl"] = serde_json::Value::Null;
    payload["bookDto"]["categories"] = serde_json::Value::Null;
    payload
}

#[tokio::test]
async fn rate_book_accepts_null_fields() {
    let harness = harness();
    harness.sign_in(identity()).await;

    let (status, body) = send(
        &router(&harness),
        post_json("/googleId1", TOKEN, &with_nulls(1, "googleId")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let saved = harness
        .services
        .ratings
        .get_by_id(body.as_i64().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.comment, "");
    assert_eq!(saved.book.categories, "");
}

#[tokio::test]
async fn delete_rating_accepts_null_fields() {
    let harness = harness();
    let user = harness.sign_in(identity()).await;
    let book = harness.store_book("googleId").await;
    let rating_id = harness.store_rating(&user, &book).await.id.unwrap();

    let (status, body) = send(
        &router(&harness),
        delete_json("/", TOKEN, &with_nulls(rating_id, "googleId")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_i64(), Some(rating_id));
}
