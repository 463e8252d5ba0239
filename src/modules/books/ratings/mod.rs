//! Ratings users give to books.

pub mod flow;
pub mod mapper;
pub mod models;
pub mod outcome;
pub mod service;

pub use mapper::RatingMapper;
pub use models::{Rating, RatingDto};
pub use outcome::{Missing, RatingOutcome, RatingReply};
pub use service::{MemoryRatingService, RatingService};
