//! JSON encodings of nodes and chains.
//!
//! Two spacings coexist: the readable form (`{"error": "x", "data": {..}}`)
//! used by the tree renderer, and the compact serde form
//! (`{"error":"x","data":{..}}`) used by the array encoders.

use std::collections::BTreeMap;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::{ChainError, Result};
use crate::node::ErrorNode;
use crate::payload::Payload;
use crate::value::ContextValue;

const ARRAY_INDENT: &str = "    ";

impl ErrorNode {
    /// Readable JSON for this node alone.
    ///
    /// `data` is omitted when the node carries no context.
    pub fn to_json(&self) -> String {
        let mut output = String::from("{\"error\": ");
        output.push_str(&Value::from(self.payload().text()).to_string());

        if !self.data().is_empty() {
            let entries: Vec<String> = self
                .data()
                .iter()
                .map(|(key, value)| {
                    format!(
                        "{}: {}",
                        Value::from(key.as_str()),
                        value.encode_or_fallback(key)
                    )
                })
                .collect();
            output.push_str(", \"data\": {");
            output.push_str(&entries.join(", "));
            output.push('}');
        }

        output.push('}');
        output
    }

    /// Compact JSON for this node alone. `data` is always present.
    pub fn to_json_compact(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::warn!("Failed to encode node: {}", e);
            format!("{{\"error\":{}}}", Value::from(self.payload().text()))
        })
    }

    /// Serializable view of the whole chain as an array.
    pub fn as_array(&self) -> ChainArray<'_> {
        ChainArray(self)
    }

    /// Encode the whole chain, head first, as a compact JSON array.
    pub fn to_json_array(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.as_array())?)
    }

    /// One compact node per line, each followed by a comma.
    pub fn to_pretty_array(&self) -> String {
        let mut output = String::from("[\n");
        for node in self {
            output.push_str(ARRAY_INDENT);
            output.push_str(&node.to_json_compact());
            output.push_str(",\n");
        }
        output.push(']');
        output
    }

    /// Rebuild a chain from the output of [`ErrorNode::to_json_array`].
    pub fn from_json_array(bytes: &[u8]) -> Result<ErrorNode> {
        let records: Vec<NodeRecord> = serde_json::from_slice(bytes)?;
        let mut records = records.into_iter().rev();

        let mut chain = records
            .next()
            .map(NodeRecord::into_node)
            .ok_or(ChainError::EmptyChain)?;
        for record in records {
            let mut node = record.into_node();
            node.wrap(chain);
            chain = node;
        }

        tracing::debug!(len = chain.len(), "Decoded error chain");
        Ok(chain)
    }
}

impl Serialize for ErrorNode {
    /// Serializes this node only; see [`ErrorNode::as_array`] for the chain.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ErrorNode", 2)?;
        state.serialize_field("error", &self.payload().text())?;
        state.serialize_field("data", self.data())?;
        state.end()
    }
}

/// A chain serialized as an array of nodes, head first.
pub struct ChainArray<'a>(&'a ErrorNode);

impl Serialize for ChainArray<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

#[derive(Deserialize)]
struct NodeRecord {
    error: String,
    #[serde(default)]
    data: Option<BTreeMap<String, Value>>,
}

impl NodeRecord {
    fn into_node(self) -> ErrorNode {
        let payload = if self.error.is_empty() {
            Payload::Empty
        } else {
            Payload::Message(self.error)
        };

        let mut node = ErrorNode::new(payload);
        for (key, value) in self.data.unwrap_or_default() {
            node.set(key, ContextValue::from_json(value));
        }
        node
    }
}
