//! Adapts model nodes into Tera's value space.
//!
//! Tera's `Value` is `serde_json::Value`, so the structural conversion is
//! the node's JSON projection; source locations are dropped and number
//! fidelity is preserved.

use tera::Context;
use wrought_codegen_core::CodegenError;
use wrought_model::Node;

/// Convert a node into a Tera value.
pub fn node_to_value(node: &Node) -> tera::Value {
    node.to_json_value()
}

/// Build a render context from a top-level object node.
///
/// Each object member becomes a context variable. Any other node kind is a
/// [`CodegenError::InvalidData`].
pub fn context_from_node(data: &Node) -> Result<Context, CodegenError> {
    let members = data.as_object().ok_or(CodegenError::InvalidData {
        kind: data.kind(),
    })?;
    let mut context = Context::new();
    for (key, value) in members {
        context.insert(key.as_str(), &value.to_json_value());
    }
    Ok(context)
}
