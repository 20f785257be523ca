//! Error nodes and the chains they form.
//!
//! A chain is a singly linked list ordered from the outermost error (head)
//! to the root cause (tail). Each node owns its successor exclusively, so
//! splicing one chain into another moves it rather than copying it.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use crate::payload::{Payload, SharedError};
use crate::render::TreeRenderer;
use crate::value::{ContextValue, FromContextValue};

/// Context data attached to a single node, rendered in key order.
pub type ContextMap = BTreeMap<String, ContextValue>;

/// One link of an error chain.
#[derive(Default)]
pub struct ErrorNode {
    payload: Payload,
    data: ContextMap,
    next: Option<Box<ErrorNode>>,
}

impl ErrorNode {
    /// Create a node from an error value.
    ///
    /// Passing an existing node returns it unchanged; `None` yields the
    /// empty sentinel.
    pub fn new(err: impl Into<ErrorNode>) -> Self {
        err.into()
    }

    /// Create a node carrying the empty sentinel.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a node from an arbitrary error value.
    ///
    /// A node passed as a plain error is returned as is, sub-chain included.
    pub fn from_error<E>(err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        let boxed: Box<dyn Error + Send + Sync + 'static> = Box::new(err);
        Self::from(boxed)
    }

    /// Underlying error of this node.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Context attached to this node.
    pub fn data(&self) -> &ContextMap {
        &self.data
    }

    /// Replace this node's payload. An absent value becomes the sentinel.
    pub fn replace_payload(&mut self, payload: impl Into<Payload>) {
        self.payload = payload.into();
    }

    /// Store context on this node only.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> &mut Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Builder form of [`ErrorNode::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Look up context on this node.
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.data.get(key)
    }

    /// Look up context and convert it to `T`.
    ///
    /// Returns `None` when the key is absent or holds another type.
    pub fn get_as<T: FromContextValue>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(T::from_context_value)
    }

    /// Append `child` (and its whole sub-chain) after the current tail.
    pub fn wrap(&mut self, child: impl Into<ErrorNode>) -> &mut Self {
        let child = child.into();
        tracing::trace!(payload = %child.payload, "Wrapping node into chain");
        self.tail_mut().next = Some(Box::new(child));
        self
    }

    /// Builder form of [`ErrorNode::wrap`].
    pub fn caused_by(mut self, child: impl Into<ErrorNode>) -> Self {
        self.wrap(child);
        self
    }

    /// Detach the tail of the chain.
    ///
    /// Returns `None` when this node is already the tail.
    pub fn detach_tail(&mut self) -> Option<ErrorNode> {
        let mut node = self;
        while node.next.as_ref().is_some_and(|next| next.next.is_some()) {
            node = node.next.as_deref_mut()?;
        }
        let tail = node.next.take()?;
        tracing::trace!(payload = %tail.payload, "Detached chain tail");
        Some(*tail)
    }

    /// Pop the tail and return its payload.
    ///
    /// A childless node returns a copy of its own payload and is left intact.
    pub fn pop_tail_payload(&mut self) -> Payload {
        match self.detach_tail() {
            Some(mut tail) => std::mem::take(&mut tail.payload),
            None => self.payload.clone(),
        }
    }

    /// Pop the tail and return it as a node.
    ///
    /// A childless node is returned as itself, borrowed and unmodified.
    pub fn pop_tail(&mut self) -> Cow<'_, ErrorNode> {
        match self.detach_tail() {
            Some(tail) => Cow::Owned(tail),
            None => Cow::Borrowed(self),
        }
    }

    /// Check whether any node in the chain carries `target`.
    pub fn has_payload(&self, target: &Payload) -> bool {
        self.iter().any(|node| &node.payload == target)
    }

    /// Check whether any node's payload is a message equal to `text`.
    pub fn has_message(&self, text: &str) -> bool {
        self.iter()
            .any(|node| matches!(&node.payload, Payload::Message(msg) if msg == text))
    }

    /// Check whether this node is the tail of its chain.
    pub fn is_leaf(&self) -> bool {
        self.next.is_none()
    }

    /// Check whether this node has neither context nor an underlying error.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.payload.is_empty()
    }

    /// Direct successor, if any.
    pub fn next(&self) -> Option<&ErrorNode> {
        self.next.as_deref()
    }

    /// Last node of the chain.
    pub fn tail(&self) -> &ErrorNode {
        let mut node = self;
        while let Some(next) = node.next.as_deref() {
            node = next;
        }
        node
    }

    fn tail_mut(&mut self) -> &mut ErrorNode {
        let mut node = self;
        loop {
            match node.next {
                Some(ref mut next) => node = &mut **next,
                None => return node,
            }
        }
    }

    /// Iterate over the chain from this node to the tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter { next: Some(self) }
    }

    /// Number of nodes from this node to the tail.
    pub fn len(&self) -> usize {
        self.iter().count()
    }
}

/// Iterator over the nodes of a chain, head first.
pub struct Iter<'a> {
    next: Option<&'a ErrorNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a ErrorNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        Some(node)
    }
}

impl<'a> IntoIterator for &'a ErrorNode {
    type Item = &'a ErrorNode;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<Payload> for ErrorNode {
    fn from(payload: Payload) -> Self {
        Self {
            payload,
            data: ContextMap::new(),
            next: None,
        }
    }
}

impl From<&str> for ErrorNode {
    fn from(msg: &str) -> Self {
        Self::from(Payload::from(msg))
    }
}

impl From<String> for ErrorNode {
    fn from(msg: String) -> Self {
        Self::from(Payload::from(msg))
    }
}

impl From<SharedError> for ErrorNode {
    fn from(err: SharedError) -> Self {
        match err.downcast_ref::<ErrorNode>() {
            Some(node) => node.clone(),
            None => Self::from(Payload::from(err)),
        }
    }
}

impl From<Box<dyn Error + Send + Sync + 'static>> for ErrorNode {
    fn from(err: Box<dyn Error + Send + Sync + 'static>) -> Self {
        match err.downcast::<ErrorNode>() {
            Ok(node) => *node,
            Err(other) => Self::from(Payload::from(other)),
        }
    }
}

impl From<std::io::Error> for ErrorNode {
    fn from(err: std::io::Error) -> Self {
        Self::from(Payload::from(err))
    }
}

impl<T: Into<ErrorNode>> From<Option<T>> for ErrorNode {
    fn from(err: Option<T>) -> Self {
        err.map(Into::into).unwrap_or_default()
    }
}

// Clone, Debug and Drop walk the chain in a loop; derived versions recurse
// once per node and overflow the stack on long chains.
impl Clone for ErrorNode {
    fn clone(&self) -> Self {
        let mut nodes: Vec<ErrorNode> = self
            .iter()
            .map(|node| ErrorNode {
                payload: node.payload.clone(),
                data: node.data.clone(),
                next: None,
            })
            .collect();

        let mut chain = nodes.pop().unwrap_or_default();
        while let Some(mut node) = nodes.pop() {
            node.next = Some(Box::new(chain));
            chain = node;
        }
        chain
    }
}

impl fmt::Debug for ErrorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|node| (&node.payload, &node.data)))
            .finish()
    }
}

impl Drop for ErrorNode {
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(mut node) = next {
            next = node.next.take();
        }
    }
}

impl fmt::Display for ErrorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&TreeRenderer::new().render(self))
    }
}

impl Error for ErrorNode {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.next.as_deref().map(|next| next as &(dyn Error + 'static))
    }
}
