//! The error value carried by each node.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Shared handle to an arbitrary error value.
pub type SharedError = Arc<dyn Error + Send + Sync + 'static>;

/// Underlying error of a node.
///
/// The node never interprets its payload beyond its display text.
#[derive(Clone, Default)]
pub enum Payload {
    /// No underlying error. Displays as the empty string.
    #[default]
    Empty,
    /// Plain message, compared by text.
    Message(String),
    /// Arbitrary error value, compared by identity.
    Error(SharedError),
}

impl Payload {
    /// Wrap an arbitrary error value.
    pub fn error<E>(err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Payload::Error(Arc::new(err))
    }

    /// Check whether this is the empty sentinel.
    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Empty)
    }

    /// Display text of the payload.
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Payload::Empty, Payload::Empty) => true,
            (Payload::Message(a), Payload::Message(b)) => a == b,
            (Payload::Error(a), Payload::Error(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Empty => Ok(()),
            Payload::Message(msg) => f.write_str(msg),
            Payload::Error(err) => write!(f, "{}", err),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Empty => f.write_str("Empty"),
            Payload::Message(msg) => f.debug_tuple("Message").field(msg).finish(),
            Payload::Error(err) => f.debug_tuple("Error").field(err).finish(),
        }
    }
}

impl From<&str> for Payload {
    fn from(msg: &str) -> Self {
        Payload::Message(msg.to_string())
    }
}

impl From<String> for Payload {
    fn from(msg: String) -> Self {
        Payload::Message(msg)
    }
}

impl From<SharedError> for Payload {
    fn from(err: SharedError) -> Self {
        Payload::Error(err)
    }
}

impl From<Box<dyn Error + Send + Sync + 'static>> for Payload {
    fn from(err: Box<dyn Error + Send + Sync + 'static>) -> Self {
        Payload::Error(Arc::from(err))
    }
}

impl From<std::io::Error> for Payload {
    fn from(err: std::io::Error) -> Self {
        Payload::error(err)
    }
}

impl<T: Into<Payload>> From<Option<T>> for Payload {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_displays_as_empty_string() {
        assert_eq!(Payload::Empty.to_string(), "");
        assert!(Payload::default().is_empty());
    }

    #[test]
    fn test_message_equality_by_text() {
        assert_eq!(Payload::from("boom"), Payload::from("boom".to_string()));
        assert_ne!(Payload::from("boom"), Payload::from("bang"));
        assert_ne!(Payload::from(""), Payload::Empty);
    }

    #[test]
    fn test_error_equality_by_identity() {
        let shared: SharedError = Arc::new(std::io::Error::other("disk full"));
        let a = Payload::from(shared.clone());
        let b = Payload::from(shared);
        let c = Payload::error(std::io::Error::other("disk full"));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.text(), c.text());
    }

    #[test]
    fn test_none_becomes_empty() {
        let payload = Payload::from(None::<&str>);
        assert!(payload.is_empty());
        assert_eq!(Payload::from(Some("x")), Payload::from("x"));
    }
}
