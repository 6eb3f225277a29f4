use thiserror::Error;

/// Store failures are passed through verbatim: the wrapped text becomes the
/// `message` field of the HTTP error body, untranslated.
#[derive(Error, Debug)]
pub enum Error {
    /// Lookup failed, or a field the caller needs is missing from the
    /// document. Answered with 404.
    #[error("{0}")]
    NotFound(String),

    /// The store rejected or failed a query or update. Answered with 500.
    #[error("{0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, Error>;
