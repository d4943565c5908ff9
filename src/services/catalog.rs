//! Catalog management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookId, CreateBook},
    repository::Repository,
};

/// Books inserted into an empty store at startup
pub const SAMPLE_BOOKS: [(&str, &str); 3] = [
    ("The Go Programming Language", "Alan Donovan"),
    ("Clean Code", "Robert Martin"),
    ("The Pragmatic Programmer", "David Thomas"),
];

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Validate and store a new book
    pub async fn create_book(&self, data: &CreateBook) -> AppResult<Book> {
        data.validate()?;
        let book = self.repository.books.add(&data.name, &data.author).await?;
        tracing::debug!("Catalog create: book id={} \"{}\"", book.id, book.name);
        Ok(book)
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Get a book by ID, failing with `NotFound` when absent
    pub async fn get_book(&self, id: BookId) -> AppResult<Book> {
        self.repository
            .books
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    pub async fn count_books(&self) -> AppResult<u64> {
        self.repository.books.count().await
    }

    /// Insert the sample books when the store is empty.
    /// Returns the number of books inserted.
    pub async fn seed_samples(&self) -> AppResult<usize> {
        if self.count_books().await? > 0 {
            return Ok(0);
        }
        for (name, author) in SAMPLE_BOOKS {
            self.repository.books.add(name, author).await?;
        }
        tracing::info!("Sample books added to the catalog");
        Ok(SAMPLE_BOOKS.len())
    }
}
