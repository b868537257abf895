//! Error types for cairn.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::id::{IdRange, ThingId};

/// Convenience alias for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for store operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Prepends a block name to the error's block path, creating the
    /// context if needed.
    #[must_use]
    pub fn in_block(mut self, block: impl Into<String>) -> Self {
        let context = self.context.get_or_insert_with(ErrorContext::new);
        context.blocks.insert(0, block.into());
        self
    }

    /// Creates a thing-not-found error.
    #[must_use]
    pub fn thing_not_found(id: ThingId) -> Self {
        Self::new(ErrorKind::ThingNotFound(id))
    }

    /// Creates an id-out-of-range error.
    #[must_use]
    pub fn id_out_of_range(id: ThingId, range: IdRange) -> Self {
        Self::new(ErrorKind::IdOutOfRange { id, range })
    }

    /// Creates an already-registered error.
    #[must_use]
    pub fn already_registered(id: ThingId) -> Self {
        Self::new(ErrorKind::AlreadyRegistered(id))
    }

    /// Creates a not-destroyable error.
    #[must_use]
    pub fn not_destroyable(id: ThingId) -> Self {
        Self::new(ErrorKind::NotDestroyable(id))
    }

    /// Creates an error for an id space with nothing left to allocate.
    #[must_use]
    pub fn ids_exhausted() -> Self {
        Self::new(ErrorKind::IdsExhausted)
    }

    /// Creates a load failure.
    #[must_use]
    pub fn load(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Load(reason.into()))
    }

    /// Creates a serialization failure.
    #[must_use]
    pub fn serialization(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization(reason.into()))
    }

    /// Returns true if this is a load failure.
    #[must_use]
    pub fn is_load(&self) -> bool {
        matches!(self.kind, ErrorKind::Load(_))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The id is not present in the store's directory.
    #[error("thing not found: {0}")]
    ThingNotFound(ThingId),

    /// The id lies outside the band the operation requires.
    #[error("id {id} outside the {range} range")]
    IdOutOfRange {
        /// The offending id.
        id: ThingId,
        /// The band the operation requires.
        range: IdRange,
    },

    /// A built-in id was registered twice.
    #[error("thing already registered: {0}")]
    AlreadyRegistered(ThingId),

    /// Terrain and special things cannot be destroyed.
    #[error("thing cannot be destroyed: {0}")]
    NotDestroyable(ThingId),

    /// Saved data is missing, out of order, truncated, or inconsistent.
    #[error("load failed: {0}")]
    Load(String),

    /// A value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Every ordinary id has been handed out.
    #[error("no ordinary ids left to allocate")]
    IdsExhausted,
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Path of nested save blocks, outermost first.
    pub blocks: Vec<String>,
    /// Name of the record being read or written.
    pub record: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a nested block to the path.
    #[must_use]
    pub fn with_block(mut self, block: impl Into<String>) -> Self {
        self.blocks.push(block.into());
        self
    }

    /// Sets the record name.
    #[must_use]
    pub fn with_record(mut self, record: impl Into<String>) -> Self {
        self.record = Some(record.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "in ")?;
        if self.blocks.is_empty() {
            write!(f, "<root>")?;
        } else {
            write!(f, "{}", self.blocks.join("/"))?;
        }
        if let Some(record) = &self.record {
            write!(f, " at `{record}`")?;
        }
        Ok(())
    }
}
