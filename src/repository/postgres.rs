//! PostgreSQL book store

use async_trait::async_trait;
use sqlx::{FromRow, Pool, Postgres};

use super::BookRepository;
use crate::{
    error::AppResult,
    models::book::{Book, BookId},
};

#[derive(Debug, FromRow)]
struct BookRow {
    id: i64,
    name: String,
    author: String,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            // BIGSERIAL starts at 1
            id: row.id as BookId,
            name: row.name,
            author: row.author,
        }
    }
}

fn to_row_id(id: BookId) -> Option<i64> {
    i64::try_from(id).ok()
}

/// Book store over the `books` table
#[derive(Clone)]
pub struct PgBookStore {
    pool: Pool<Postgres>,
}

impl PgBookStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for PgBookStore {
    async fn add(&self, name: &str, author: &str) -> AppResult<Book> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"
            INSERT INTO books (name, author)
            VALUES ($1, $2)
            RETURNING id, name, author
            "#,
        )
        .bind(name)
        .bind(author)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn list(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>("SELECT id, name, author FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn get_by_id(&self, id: BookId) -> AppResult<Option<Book>> {
        // Ids past the BIGSERIAL range cannot exist
        let Some(id) = to_row_id(id) else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, BookRow>("SELECT id, name, author FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Book::from))
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
