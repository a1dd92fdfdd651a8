//! Error types for rs-dom-chain.
//!
//! Only malformed input is an error. A selector that matches nothing, or a
//! pick index outside the match set, is reported through
//! [`Resolution::failed`](crate::Resolution) instead.

/// Error type for document loading and selector compilation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The selector uses a form this crate refuses to compile.
    ///
    /// Currently raised for attribute-name patterns that combine a namespace
    /// separator (`:`) with a wildcard (`*`).
    #[error("invalid selector attribute `{0}`: can't combine ':' and '*' in one name")]
    InvalidSelector(String),

    /// The input does not look like HTML or XML at all.
    #[error("invalid HTML/XML markup: {0}")]
    InvalidMarkup(String),
}

/// Result type alias for document and selector operations.
pub type Result<T> = std::result::Result<T, Error>;
