//! Doubles and request helpers for handler tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use redude_authz::{Identity, TokenVerifier, VerifyError};
use redude_db::StoreError;
use serde_json::Value;
use tower::ServiceExt;

use crate::app::AppServices;
use crate::modules::books::catalog::{BookCatalog, CatalogError};
use crate::modules::books::models::Book;
use crate::modules::books::ratings::{MemoryRatingService, Rating, RatingService};
use crate::modules::books::repository::{BookRepository, MemoryBookRepository};
use crate::modules::users::models::{NewUser, User};
use crate::modules::users::repository::{MemoryUserRepository, UserRepository};

/// Token the static verifier accepts for [`identity`].
pub const TOKEN: &str = "token";
/// Token the static verifier accepts for [`other_identity`].
pub const OTHER_TOKEN: &str = "other-token";
/// Token whose verification fails as if the verifier were down.
pub const UNREACHABLE_TOKEN: &str = "unreachable";

pub fn identity() -> Identity {
    Identity {
        google_id: "googleId1".to_string(),
        name: "name1".to_string(),
        lastname: "lastname1".to_string(),
        email: "email1".to_string(),
        picture_url: "pictureUrl1".to_string(),
    }
}

pub fn other_identity() -> Identity {
    Identity {
        google_id: "googleId2".to_string(),
        name: "name2".to_string(),
        lastname: "lastname2".to_string(),
        email: "email2".to_string(),
        picture_url: "pictureUrl2".to_string(),
    }
}

pub fn book(google_id: &str) -> Book {
    Book {
        id: None,
        google_id: google_id.to_string(),
        title: "title1".to_string(),
        author: "author1".to_string(),
        categories: "categories1".to_string(),
    }
}

/// Rating payload as the web client sends it.
pub fn rating_json(id: i64, book_google_id: &str) -> Value {
    serde_json::json!({
        "id": id,
        "userDto": {
            "id": 1,
            "googleId": "googleId1",
            "name": "name1",
            "lastname": "lastname1",
            "email": "email1",
            "pictureUrl": "pictureUrl1"
        },
        "bookDto": {
            "googleId": book_google_id,
            "title": "title1",
            "author": "author1",
            "categories": "categories1"
        },
        "value": 10,
        "comment": "comment1"
    })
}

/// Names of the store calls made, in order.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<&'static str>>>);

impl Journal {
    fn record(&self, call: &'static str) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

struct StaticVerifier {
    identities: HashMap<&'static str, Identity>,
}

#[async_trait]
impl TokenVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<Option<Identity>, VerifyError> {
        if token == UNREACHABLE_TOKEN {
            return Err(VerifyError::Upstream { status: 503 });
        }
        Ok(self.identities.get(token).cloned())
    }
}

struct StaticCatalog {
    books: Vec<Book>,
}

#[async_trait]
impl BookCatalog for StaticCatalog {
    async fn search(&self, query: &str, extended: bool) -> Result<Vec<Book>, CatalogError> {
        let limit = if extended { usize::MAX } else { 1 };
        Ok(self
            .books
            .iter()
            .filter(|book| book.title.contains(query))
            .take(limit)
            .cloned()
            .collect())
    }
}

struct RecordingUsers {
    inner: MemoryUserRepository,
    journal: Journal,
}

#[async_trait]
impl UserRepository for RecordingUsers {
    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>, StoreError> {
        self.journal.record("users.find_by_google_id");
        self.inner.find_by_google_id(google_id).await
    }

    async fn upsert(&self, profile: NewUser) -> Result<User, StoreError> {
        self.journal.record("users.upsert");
        self.inner.upsert(profile).await
    }
}

struct RecordingBooks {
    inner: MemoryBookRepository,
    journal: Journal,
}

#[async_trait]
impl BookRepository for RecordingBooks {
    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<Book>, StoreError> {
        self.journal.record("books.find_by_google_id");
        self.inner.find_by_google_id(google_id).await
    }

    async fn save_or_update(&self, book: Book) -> Result<Book, StoreError> {
        self.journal.record("books.save_or_update");
        self.inner.save_or_update(book).await
    }
}

struct RecordingRatings {
    inner: MemoryRatingService,
    journal: Journal,
}

#[async_trait]
impl RatingService for RecordingRatings {
    async fn save(&self, rating: Rating) -> Result<Rating, StoreError> {
        self.journal.record("ratings.save");
        self.inner.save(rating).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Rating>, StoreError> {
        self.journal.record("ratings.get_by_id");
        self.inner.get_by_id(id).await
    }

    async fn delete(&self, rating: &Rating) -> Result<(), StoreError> {
        self.journal.record("ratings.delete");
        self.inner.delete(rating).await
    }

    async fn list_for_book(&self, google_id: &str) -> Result<Vec<Rating>, StoreError> {
        self.journal.record("ratings.list_for_book");
        self.inner.list_for_book(google_id).await
    }
}

/// Services over doubles plus the journal of store calls.
pub struct Harness {
    pub services: AppServices,
    pub journal: Journal,
}

impl Harness {
    pub async fn sign_in(&self, identity: Identity) -> User {
        self.services
            .users
            .upsert(NewUser::from(identity))
            .await
            .unwrap()
    }

    pub async fn store_book(&self, google_id: &str) -> Book {
        self.services
            .books
            .save_or_update(book(google_id))
            .await
            .unwrap()
    }

    pub async fn store_rating(&self, user: &User, book: &Book) -> Rating {
        self.services
            .ratings
            .save(Rating {
                id: None,
                user: Some(user.clone()),
                book: book.clone(),
                value: 10,
                comment: "comment1".to_string(),
            })
            .await
            .unwrap()
    }
}

pub fn harness() -> Harness {
    let journal = Journal::default();
    let identities = HashMap::from([(TOKEN, identity()), (OTHER_TOKEN, other_identity())]);
    let mut catalog_book = book("googleId");
    catalog_book.title = "Dune".to_string();
    let mut second_book = book("googleId2");
    second_book.title = "Dune Messiah".to_string();

    let services = AppServices {
        verifier: Arc::new(StaticVerifier { identities }),
        catalog: Arc::new(StaticCatalog {
            books: vec![catalog_book, second_book],
        }),
        users: Arc::new(RecordingUsers {
            inner: MemoryUserRepository::new(),
            journal: journal.clone(),
        }),
        books: Arc::new(RecordingBooks {
            inner: MemoryBookRepository::new(),
            journal: journal.clone(),
        }),
        ratings: Arc::new(RecordingRatings {
            inner: MemoryRatingService::new(),
            journal: journal.clone(),
        }),
    };

    Harness { services, journal }
}

pub fn services() -> AppServices {
    harness().services
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    builder.body(Body::empty()).unwrap()
}

fn with_json(method: &str, uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub fn post_json(uri: &str, token: &str, body: &Value) -> Request<Body> {
    with_json("POST", uri, token, body)
}

pub fn delete_json(uri: &str, token: &str, body: &Value) -> Request<Body> {
    with_json("DELETE", uri, token, body)
}

/// Send `request` through `router`; non-JSON bodies come back as strings.
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}
