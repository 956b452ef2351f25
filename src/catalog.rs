//! Catalog loading.
//!
//! A catalog is plain text with one `title,author` pair per line. Books get
//! ids 1..N in file order; blank lines are skipped and do not consume an id.

use std::{fs, path::Path};

use log::info;
use thiserror::Error;

use crate::book::{Book, BookId};

/// Errors raised while reading a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read
    #[error("failed to read catalog `{path}`: {source}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A line had no comma separating title and author
    #[error("catalog line {line} is not `title,author`: {content:?}")]
    MalformedLine {
        /// 1-based line number in the input
        line: usize,
        /// The offending line
        content: String,
    },

    /// More books than ids available
    #[error("catalog holds more than {max} books", max = BookId::MAX)]
    TooManyBooks,
}

/// Parse catalog text into books with ids assigned in order.
///
/// Each line is split at its first comma, so authors may contain commas but
/// titles may not.
///
/// # Errors
///
/// Returns `CatalogError::MalformedLine` for a non-blank line without a comma.
pub fn parse_catalog(text: &str) -> Result<Vec<Book>, CatalogError> {
    let mut books = Vec::new();
    let mut next_id: BookId = 1;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let Some((title, author)) = line.split_once(',') else {
            return Err(CatalogError::MalformedLine {
                line: idx.saturating_add(1),
                content: raw.to_string(),
            });
        };
        books.push(Book::new(next_id, title.trim(), author.trim()));
        next_id = next_id.checked_add(1).ok_or(CatalogError::TooManyBooks)?;
    }

    Ok(books)
}

/// Read and parse a catalog file
///
/// # Errors
///
/// Returns `CatalogError::Io` when the file cannot be read, or any error
/// from [`parse_catalog`].
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<Book>, CatalogError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|source| CatalogError::Io { path: path.display().to_string(), source })?;
    let books = parse_catalog(&text)?;
    info!("event=catalog_load path={} books={}", path.display(), books.len());
    Ok(books)
}
