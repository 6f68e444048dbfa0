use sqlx::PgPool;

use crate::{error::AppResult, models::Book, services::catalog::CatalogSource};

/// Catalog read from the `books` table
#[derive(Clone)]
pub struct PgCatalog {
    db_pool: PgPool,
}

impl PgCatalog {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait::async_trait]
impl CatalogSource for PgCatalog {
    async fn load(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, genre, pages, language, publication_year, link, description
            FROM books
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(books)
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
