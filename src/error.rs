use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a single post file could not be turned into a [`crate::post::Post`].
///
/// These never escape [`crate::post_repository::PostRepository::load`]; the
/// offending file is logged and skipped.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("the '### Content' delimiter is missing")]
    MissingDelimiter,
    #[error("required header field '{0}' is missing")]
    MissingField(&'static str),
    #[error("invalid {field} '{value}': {reason}")]
    InvalidDate {
        field: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("error converting markdown: {0}")]
    Markdown(String),
    #[error("error highlighting code block: {0}")]
    Highlight(String),
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("error reading media descriptor {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid media descriptor {path}: {source}")]
    Descriptor {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("media descriptor {descriptor} points to {target}, which does not exist")]
    MissingTarget {
        descriptor: PathBuf,
        target: PathBuf,
    },
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("error reading posts folder {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Media(#[from] MediaError),
}
