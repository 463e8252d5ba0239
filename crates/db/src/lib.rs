//! In-memory tables with id sequences.
//!
//! Repositories in the application crate persist their records here. Each
//! [`Table`] hands out strictly increasing ids starting at 1, so an id of `0`
//! never names a stored row.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use tokio::sync::RwLock;

/// Errors raised by storage backends.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A read or write failed while executing.
    #[error("store query failed: {message}")]
    Query { message: String },
}

impl StoreError {
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// A named collection of rows keyed by a generated `i64` id.
pub struct Table<T> {
    name: &'static str,
    next_id: AtomicI64,
    rows: RwLock<BTreeMap<i64, T>>,
}

impl<T: Clone> Table<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            next_id: AtomicI64::new(1),
            rows: RwLock::new(BTreeMap::new()),
        }
    }

    /// Allocate an id, build the row from it, and store it.
    pub async fn insert_with<F>(&self, build: F) -> T
    where
        F: FnOnce(i64) -> T,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let row = build(id);
        self.rows.write().await.insert(id, row.clone());
        tracing::debug!(table = self.name, id, "row inserted");
        row
    }

    /// Rebuild the first row matching `predicate` under its existing id, or
    /// insert a new row under a fresh id. Runs under one write lock.
    pub async fn upsert_by<P, F>(&self, predicate: P, build: F) -> T
    where
        P: Fn(&T) -> bool,
        F: FnOnce(i64) -> T,
    {
        let mut rows = self.rows.write().await;
        let existing = rows
            .iter()
            .find(|(_, row)| predicate(row))
            .map(|(id, _)| *id);
        let id = existing.unwrap_or_else(|| self.next_id.fetch_add(1, Ordering::Relaxed));
        let row = build(id);
        rows.insert(id, row.clone());
        tracing::debug!(table = self.name, id, updated = existing.is_some(), "row upserted");
        row
    }

    pub async fn get(&self, id: i64) -> Option<T> {
        self.rows.read().await.get(&id).cloned()
    }

    /// First row, in id order, matching `predicate`.
    pub async fn find<P>(&self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        self.rows
            .read()
            .await
            .values()
            .find(|row| predicate(row))
            .cloned()
    }

    /// Every row, in id order, matching `predicate`.
    pub async fn filter<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.rows
            .read()
            .await
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }

    pub async fn remove(&self, id: i64) -> Option<T> {
        let removed = self.rows.write().await.remove(&id);
        if removed.is_some() {
            tracing::debug!(table = self.name, id, "row removed");
        }
        removed
    }}
