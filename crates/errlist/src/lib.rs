//! errlist
//!
//! Chains of error nodes, each carrying an underlying error plus a bag of
//! contextual data, rendered as an indented tree or as JSON.
//!
//! ```
//! use errlist::ErrorNode;
//!
//! let outer = ErrorNode::new("outer").with("location", "X");
//! let inner = ErrorNode::new("inner").with("code", 1337);
//! let chain = outer.caused_by(inner).caused_by("root");
//!
//! assert_eq!(chain.len(), 3);
//! assert!(chain.to_string().contains("  L {\"error\": \"inner\""));
//! ```

mod config;
mod error;
mod json;
mod node;
mod payload;
mod render;
mod value;

pub use config::RenderConfig;
pub use error::{ChainError, EncodeError, Result};
pub use json::ChainArray;
pub use node::{ContextMap, ErrorNode, Iter};
pub use payload::{Payload, SharedError};
pub use render::TreeRenderer;
pub use value::{ContextValue, FromContextValue};
