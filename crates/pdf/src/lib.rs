use thiserror::Error;

pub mod backend;
pub mod extract;

use backend::PdfBackend;
pub use extract::TextToken;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("Document is encrypted")]
    Encrypted,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// A loaded PDF document ready for token extraction.
///
/// Constructed via [`ParsedDocument::from_bytes`] or
/// [`ParsedDocument::from_path`]. Holds the parsed document so repeated
/// extraction calls do not re-parse from bytes.
#[derive(Debug)]
pub struct ParsedDocument {
    backend: backend::LopdfBackend,
}

impl ParsedDocument {
    /// Parse PDF bytes into a document.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        let backend = backend::LopdfBackend::load_bytes(bytes)?;
        Ok(ParsedDocument { backend })
    }

    /// Read and parse a PDF file.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Total number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.backend.page_count()
    }

    /// Extract positioned tokens from every page, in page order.
    ///
    /// Returns `(page_number, tokens)` pairs with 1-based page numbers.
    pub fn extract_tokens(&self) -> Result<Vec<(usize, Vec<TextToken>)>, PdfError> {
        extract::extract_all_pages(&self.backend)
    }

    /// Extract positioned tokens from a single page (1-based).
    pub fn extract_page(&self, page_number: usize) -> Result<Vec<TextToken>, PdfError> {
        let page_id = self
            .backend
            .pages()
            .get(&(page_number as u32))
            .copied()
            .ok_or_else(|| PdfError::Parse(format!("page {} not found", page_number)))?;
        extract::extract_page_tokens(&self.backend, page_id)
    }
}

// ---------------------------------------------------------------------------
// Convenience free functions (stateless, re-parse each call)
// ---------------------------------------------------------------------------

/// Extract positioned tokens from PDF bytes, one entry per page.
pub fn extract_tokens(bytes: &[u8]) -> Result<Vec<(usize, Vec<TextToken>)>, PdfError> {
    ParsedDocument::from_bytes(bytes)?.extract_tokens()
}
