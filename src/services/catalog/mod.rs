//! Book catalog loading
//!
//! The catalog is read from CSV over HTTP, a local CSV file or the `books`
//! table, and kept in memory for the lifetime of the process. A failed load
//! is not remembered, so the next caller retries.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookFilter},
};

pub mod csv;
pub mod postgres;

pub use self::csv::{parse_books, LocalCsv, RemoteCsv};
pub use self::postgres::PgCatalog;

/// Trait for catalog sources
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Load every book, in source order
    async fn load(&self) -> AppResult<Vec<Book>>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// A fixed list of books
pub struct StaticCatalog(pub Vec<Book>);

#[async_trait::async_trait]
impl CatalogSource for StaticCatalog {
    async fn load(&self) -> AppResult<Vec<Book>> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Process-wide, lazily loaded book catalog
pub struct Catalog {
    source: Box<dyn CatalogSource>,
    books: OnceCell<Arc<Vec<Book>>>,
}

impl Catalog {
    pub fn new(source: Box<dyn CatalogSource>) -> Self {
        Self {
            source,
            books: OnceCell::new(),
        }
    }

    /// Catalog backed by a fixed list of books
    pub fn from_books(books: Vec<Book>) -> Self {
        Self::new(Box::new(StaticCatalog(books)))
    }

    /// All books, loading them on first use
    pub async fn books(&self) -> AppResult<Arc<Vec<Book>>> {
        self.books
            .get_or_try_init(|| async {
                let books = self.source.load().await?;
                tracing::info!(
                    source = self.source.name(),
                    book_count = books.len(),
                    "Catalog loaded"
                );
                Ok::<_, AppError>(Arc::new(books))
            })
            .await
            .map(Arc::clone)
    }

    /// Look up a book by id
    pub async fn find(&self, id: i64) -> AppResult<Book> {
        self.books()
            .await?
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Books matching the filter, in catalog order
    pub async fn search(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        Ok(self
            .books()
            .await?
            .iter()
            .filter(|book| filter.matches(book))
            .cloned()
            .collect())
    }

    /// Distinct genres in order of first appearance
    pub async fn genres(&self) -> AppResult<Vec<String>> {
        let books = self.books().await?;
        let mut genres: Vec<String> = Vec::new();
        for book in books.iter() {
            if !genres.contains(&book.genre) {
                genres.push(book.genre.clone());
            }
        }
        Ok(genres)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::book;

    fn sample() -> Vec<Book> {
        vec![
            book(1, "Anush", "Դրամա", 120, "Հայերեն"),
            book(2, "Samvel", "Պատմական", 450, "Հայերեն"),
            book(3, "Pepo", "Դրամա", 90, "Հայերեն"),
        ]
    }

    #[tokio::test]
    async fn test_source_is_loaded_once() {
        let mut source = MockCatalogSource::new();
        source.expect_load().times(1).returning(|| Ok(sample()));
        source.expect_name().return_const("mock");

        let catalog = Catalog::new(Box::new(source));
        assert_eq!(catalog.books().await.unwrap().len(), 3);
        assert_eq!(catalog.books().await.unwrap().len(), 3);
        assert_eq!(catalog.find(2).await.unwrap().title, "Samvel");
    }

    #[tokio::test]
    async fn test_failed_load_is_retried() {
        let mut source = MockCatalogSource::new();
        let mut seq = mockall::Sequence::new();
        source
            .expect_load()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(AppError::ExternalApi("catalog unavailable".to_string())));
        source
            .expect_load()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(sample()));
        source.expect_name().return_const("mock");

        let catalog = Catalog::new(Box::new(source));
        assert!(catalog.books().await.is_err());
        assert_eq!(catalog.books().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_find_unknown_book() {
        let catalog = Catalog::from_books(sample());
        assert!(matches!(catalog.find(99).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_search_and_genres() {
        let catalog = Catalog::from_books(sample());

        let dramas = catalog
            .search(&BookFilter {
                genre: Some("Դրամա".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let ids: Vec<i64> = dramas.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 3]);

        assert_eq!(
            catalog.genres().await.unwrap(),
            vec!["Դրամա".to_string(), "Պատմական".to_string()]
        );
    }
}
