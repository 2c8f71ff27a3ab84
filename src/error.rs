//! Error and result types.
//!
//! `InventoryError` covers the recoverable failures of the backpack core.
//! The boxed `DynError`/`Result` pair is used by the application shell
//! (terminal setup, config files) where errors are only reported.
use std::fmt::{Display, Formatter};

use thiserror::Error;

pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type Result<T> = std::result::Result<T, DynError>;

/// Failures reported by [`crate::inventory::Inventory`] operations.
///
/// None of these are fatal: the inventory is left exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("backpack is full ({} items)", crate::inventory::CAPACITY)]
    Full,

    #[error("backpack is empty")]
    Empty,

    #[error("item '{0}' not found")]
    NotFound(String),

    /// Binary search needs the items sorted by name first.
    #[error("items are not sorted by name; sort by name before searching")]
    NotSorted,

    #[error("invalid sort criterion: {0}")]
    InvalidCriterion(String),
}

pub trait Context<T> {
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

#[derive(Debug)]
pub struct WithContextError {
    pub context: String,
    pub source: DynError,
}

impl Display for WithContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.context, self.source)
    }
}

impl std::error::Error for WithContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            Box::new(WithContextError {
                context: f(),
                source: e.into(),
            }) as DynError
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(InventoryError::Full.to_string(), "backpack is full (10 items)");
        assert_eq!(
            InventoryError::NotFound("Axe".into()).to_string(),
            "item 'Axe' not found"
        );
        assert!(InventoryError::InvalidCriterion("7".into()).to_string().contains('7'));
    }

    #[test]
    fn context_wraps_source() {
        let res: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = res.with_ctx(|| "read theme.conf".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "read theme.conf: gone");
        assert!(std::error::Error::source(&*err).is_some());
    }
}
