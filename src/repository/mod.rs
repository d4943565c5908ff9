//! Repository layer for book storage

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::book::{Book, BookId},
};

pub use memory::MemoryBookStore;
pub use postgres::PgBookStore;

/// Storage contract shared by every book backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Store a new book under the next free identifier
    async fn add(&self, name: &str, author: &str) -> AppResult<Book>;

    /// Snapshot of all stored books, ordered by id
    async fn list(&self) -> AppResult<Vec<Book>>;

    /// Look up a single book; absence is `Ok(None)`
    async fn get_by_id(&self, id: BookId) -> AppResult<Option<Book>>;

    async fn count(&self) -> AppResult<u64>;
}

/// Main repository handle shared by the services
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookRepository>,
}

impl Repository {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }

    /// Repository backed by the in-process store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBookStore::new()))
    }

    /// Repository backed by PostgreSQL through the given pool
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self::new(Arc::new(PgBookStore::new(pool)))
    }
}
