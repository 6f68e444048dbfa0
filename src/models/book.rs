use serde::{Deserialize, Serialize};

/// A single row of the book catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Book {
    /// Catalog identifier
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genre: String,
    /// Page count
    pub pages: i32,
    pub language: String,
    #[serde(default)]
    pub publication_year: Option<i32>,
    /// Link to a readable copy of the book (usually a PDF)
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Catalog search parameters
///
/// Title and author match case-insensitive substrings, genre matches exactly.
/// Missing or blank fields match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        contains_ignore_case(&book.title, self.title.as_deref())
            && contains_ignore_case(&book.author, self.author.as_deref())
            && match non_blank(self.genre.as_deref()) {
                Some(genre) => book.genre == genre,
                None => true,
            }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match non_blank(needle) {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Book;

    pub fn book(id: i64, title: &str, genre: &str, pages: i32, language: &str) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: "Hovhannes Tumanyan".to_string(),
            genre: genre.to_string(),
            pages,
            language: language.to_string(),
            publication_year: None,
            link: None,
            description: None,
        }
    }
}
