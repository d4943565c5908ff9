//! In-process book store

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::BookRepository;
use crate::{
    error::AppResult,
    models::book::{Book, BookId},
};

#[derive(Debug)]
struct Inner {
    books: BTreeMap<BookId, Book>,
    next_id: BookId,
}

/// Book registry guarded by a single reader-writer lock.
///
/// Identifiers start at 1 and are handed out in the order writers acquire
/// the lock; they are never reused. Clones share the same registry.
#[derive(Debug, Clone)]
pub struct MemoryBookStore {
    inner: Arc<RwLock<Inner>>,
}

impl Default for MemoryBookStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                books: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }

    /// Allocate the next id and store a new book under it
    pub async fn add(&self, name: &str, author: &str) -> Book {
        let mut inner = self.inner.write().await;
        let book = Book {
            id: inner.next_id,
            name: name.to_string(),
            author: author.to_string(),
        };
        inner.next_id += 1;
        inner.books.insert(book.id, book.clone());
        book
    }

    /// Copy of every stored book, ordered by id
    pub async fn list(&self) -> Vec<Book> {
        self.inner.read().await.books.values().cloned().collect()
    }

    pub async fn get_by_id(&self, id: BookId) -> Option<Book> {
        self.inner.read().await.books.get(&id).cloned()
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.books.len()
    }
}

#[async_trait]
impl BookRepository for MemoryBookStore {
    async fn add(&self, name: &str, author: &str) -> AppResult<Book> {
        Ok(MemoryBookStore::add(self, name, author).await)
    }

    async fn list(&self) -> AppResult<Vec<Book>> {
        Ok(MemoryBookStore::list(self).await)
    }

    async fn get_by_id(&self, id: BookId) -> AppResult<Option<Book>> {
        Ok(MemoryBookStore::get_by_id(self, id).await)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(MemoryBookStore::count(self).await as u64)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[tokio::test]
    async fn test_add_then_get() {
        let store = MemoryBookStore::new();

        let book = store.add("Dune", "Herbert").await;
        assert_eq!(
            book,
            Book {
                id: 1,
                name: "Dune".to_string(),
                author: "Herbert".to_string(),
            }
        );
        assert_eq!(store.get_by_id(1).await, Some(book));
        assert_eq!(store.get_by_id(999).await, None);
    }

    #[tokio::test]
    async fn test_ids_strictly_increase() {
        let store = MemoryBookStore::new();
        let mut last = 0;
        for i in 0..20 {
            let book = store.add(&format!("Title {}", i), "Anon").await;
            assert!(book.id > last);
            last = book.id;
        }
        assert_eq!(last, 20);
    }

    #[tokio::test]
    async fn test_list_returns_every_added_book() {
        let store = MemoryBookStore::new();
        assert!(store.list().await.is_empty());

        let added = vec![
            store.add("Clean Code", "Robert Martin").await,
            store.add("The Pragmatic Programmer", "David Thomas").await,
            store.add("Clean Code", "Robert Martin").await,
        ];

        let listed = store.list().await;
        assert_eq!(listed, added);
        assert_eq!(store.count().await, 3);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryBookStore::new();
        let other = store.clone();
        other.add("Dune", "Herbert").await;
        assert_eq!(store.count().await, 1);
        assert_eq!(store.add("Emma", "Austen").await.id, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_allocate_contiguous_ids() {
        let store = MemoryBookStore::new();

        let handles: Vec<_> = (0..100)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.add(&format!("Book {}", i), "Author").await })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            let book = handle.await.unwrap();
            assert!(ids.insert(book.id), "duplicate id {}", book.id);
        }

        assert_eq!(ids, (1..=100).collect::<HashSet<_>>());
        assert_eq!(store.count().await, 100);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_see_consistent_snapshots() {
        let store = MemoryBookStore::new();

        let writer = {
            let store = store.clone();
            tokio::spawn(async move {
                for i in 0..50 {
                    store.add(&format!("Book {}", i), "Author").await;
                }
            })
        };
        let reader = {
            let store = store.clone();
            tokio::spawn(async move {
                for _ in 0..50 {
                    let books = store.list().await;
                    let ids: Vec<_> = books.iter().map(|b| b.id).collect();
                    let expected: Vec<_> = (1..=books.len() as BookId).collect();
                    assert_eq!(ids, expected);
                }
            })
        };

        writer.await.unwrap();
        reader.await.unwrap();
        assert_eq!(store.list().await.len(), 50);
    }

    #[tokio::test]
    async fn test_trait_object_dispatch() {
        let repo: Arc<dyn BookRepository> = Arc::new(MemoryBookStore::new());
        let book = repo.add("Dune", "Herbert").await.unwrap();
        assert_eq!(repo.get_by_id(book.id).await.unwrap(), Some(book));
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
