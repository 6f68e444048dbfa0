use std::path::PathBuf;

use reqwest::Client as HttpClient;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::Book,
    services::catalog::CatalogSource,
};

const CATALOG_CACHE_TTL: u64 = 3600; // 1 hour
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const REQUIRED_COLUMNS: [&str; 6] = ["id", "title", "author", "genre", "pages", "language"];

/// Parse catalog CSV.
///
/// Accepts an optional UTF-8 BOM and whitespace around headers and fields.
/// Rows that do not parse are skipped with a warning.
pub fn parse_books(data: &[u8]) -> AppResult<Vec<Book>> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(AppError::ExternalApi(format!(
            "Catalog is missing the '{}' column",
            missing
        )));
    }

    let mut books = Vec::new();
    let mut skipped = 0;
    for (index, row) in reader.deserialize::<Book>().enumerate() {
        match row {
            Ok(book) => books.push(book),
            Err(e) => {
                skipped += 1;
                tracing::warn!(row = index + 1, error = %e, "Skipping malformed catalog row");
            }
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, parsed = books.len(), "Catalog parsed with errors");
    }

    Ok(books)
}

/// Catalog CSV fetched over HTTP, optionally cached in Redis
#[derive(Clone)]
pub struct RemoteCsv {
    http_client: HttpClient,
    url: String,
    cache: Option<Cache>,
}

impl RemoteCsv {
    pub fn new(url: String, cache: Option<Cache>) -> Self {
        Self {
            http_client: HttpClient::new(),
            url,
            cache,
        }
    }

    async fn download(&self) -> AppResult<String> {
        tracing::debug!(url = %self.url, "Downloading catalog");
        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }

    async fn cached_download(&self, cache: &Cache) -> AppResult<String> {
        let key = CacheKey::Catalog(self.url.clone());
        cached!(cache, key, CATALOG_CACHE_TTL, self.download())
    }
}

#[async_trait::async_trait]
impl CatalogSource for RemoteCsv {
    async fn load(&self) -> AppResult<Vec<Book>> {
        let body = match &self.cache {
            Some(cache) => self.cached_download(cache).await?,
            None => self.download().await?,
        };
        parse_books(body.as_bytes())
    }

    fn name(&self) -> &'static str {
        "remote_csv"
    }
}

/// Catalog CSV read from local disk
pub struct LocalCsv {
    path: PathBuf,
}

impl LocalCsv {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl CatalogSource for LocalCsv {
    async fn load(&self) -> AppResult<Vec<Book>> {
        let data = tokio::fs::read(&self.path).await.map_err(|e| {
            AppError::Internal(format!(
                "Failed to read catalog file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        parse_books(&data)
    }

    fn name(&self) -> &'static str {
        "local_csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SAMPLE: &str = "\u{feff}id, title ,author,genre,pages,language,publication_year,link,description\n\
        1,Անուշ,Հովհաննես Թումանյան,Բանաստեղծություններ,120,Հայերեն,1892,https://example.am/anush.pdf,Պոեմ\n\
        2,Սամվել,Րաֆֆի,Պատմական,450,Հայերեն,,,\n";

    #[test]
    fn test_parse_with_bom_and_padded_headers() {
        let books = parse_books(SAMPLE.as_bytes()).unwrap();
        assert_eq!(books.len(), 2);

        assert_eq!(books[0].id, 1);
        assert_eq!(books[0].title, "Անուշ");
        assert_eq!(books[0].publication_year, Some(1892));
        assert_eq!(books[0].link.as_deref(), Some("https://example.am/anush.pdf"));

        assert_eq!(books[1].pages, 450);
        assert_eq!(books[1].publication_year, None);
        assert_eq!(books[1].link, None);
        assert_eq!(books[1].description, None);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let data = "id,title,author,genre,pages,language\n\
            1,Good,Author,Դրամա,100,Հայերեն\n\
            x,Bad id,Author,Դրամա,100,Հայերեն\n\
            3,Bad pages,Author,Դրամա,many,Հայերեն\n\
            4,Also good,Author,Դրամա,80,Հայերեն\n";
        let ids: Vec<i64> = parse_books(data.as_bytes())
            .unwrap()
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let data = "id,title,author,genre,language\n1,T,A,G,L\n";
        assert!(matches!(
            parse_books(data.as_bytes()),
            Err(AppError::ExternalApi(_))
        ));
    }

    #[test]
    fn test_local_csv_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = LocalCsv::new(file.path());
        let books = tokio_test::block_on(source.load()).unwrap();
        assert_eq!(books.len(), 2);
    }

    #[test]
    fn test_local_csv_missing_file() {
        let source = LocalCsv::new("/definitely/not/here.csv");
        assert!(matches!(
            tokio_test::block_on(source.load()),
            Err(AppError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn test_remote_csv_downloads_catalog() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/books.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE))
            .mount(&server)
            .await;

        let source = RemoteCsv::new(format!("{}/books.csv", server.uri()), None);
        let books = source.load().await.unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[1].title, "Սամվել");
    }

    #[tokio::test]
    async fn test_remote_csv_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let source = RemoteCsv::new(format!("{}/books.csv", server.uri()), None);
        assert!(matches!(source.load().await, Err(AppError::HttpClient(_))));
    }
}
