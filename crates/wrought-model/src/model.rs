//! The model container.

use std::collections::BTreeMap;

use crate::assembler::ModelAssembler;
use crate::node::Node;
use crate::shapes::{Shape, ShapeId, ShapeType};

/// Error from model lookups.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("shape '{id}' not found in model")]
    ShapeNotFound { id: ShapeId },
}

/// An immutable, validated set of shapes plus document metadata.
///
/// Models are produced by a [`ModelAssembler`]; shapes iterate in ID order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    metadata: BTreeMap<String, Node>,
    shapes: BTreeMap<ShapeId, Shape>,
}

impl Model {
    /// Start assembling a model from documents, shapes, and other sources.
    pub fn assembler() -> ModelAssembler {
        ModelAssembler::new()
    }

    pub(crate) fn from_parts(
        metadata: BTreeMap<String, Node>,
        shapes: BTreeMap<ShapeId, Shape>,
    ) -> Self {
        Self { metadata, shapes }
    }

    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn expect_shape(&self, id: &ShapeId) -> Result<&Shape, ModelError> {
        self.shape(id).ok_or_else(|| ModelError::ShapeNotFound {
            id: id.clone(),
        })
    }

    pub fn contains_shape(&self, id: &ShapeId) -> bool {
        self.shapes.contains_key(id)
    }

    /// All shapes in ID order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }

    /// Shapes of one type, in ID order.
    pub fn shapes_of_type(&self, ty: ShapeType) -> impl Iterator<Item = &Shape> {
        self.shapes.values().filter(move |s| s.shape_type() == ty)
    }

    pub fn metadata(&self) -> &BTreeMap<String, Node> {
        &self.metadata
    }

    pub fn metadata_value(&self, key: &str) -> Option<&Node> {
        self.metadata.get(key)
    }

    /// Number of shapes, the prelude included.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::MemberShape;

    fn sample_model() -> Model {
        let mut shapes = BTreeMap::new();
        let string_id: ShapeId = "ns#Name".parse().unwrap();
        let shape = Shape::simple(string_id.clone(), ShapeType::String).unwrap();
        shapes.insert(string_id, shape);

        let list_id: ShapeId = "ns#Names".parse().unwrap();
        let list = Shape::list(
            list_id.clone(),
            MemberShape::new("ns#Name".parse().unwrap()),
        )
        .unwrap();
        shapes.insert(list_id, list);

        let mut metadata = BTreeMap::new();
        metadata.insert("authors".to_string(), Node::array(vec![Node::string("a")]));
        Model::from_parts(metadata, shapes)
    }

    #[test]
    fn test_lookup() {
        let model = sample_model();
        let id: ShapeId = "ns#Name".parse().unwrap();
        assert!(model.shape(&id).is_some());
        assert!(model.expect_shape(&id).is_ok());

        let missing: ShapeId = "ns#Missing".parse().unwrap();
        let err = model.expect_shape(&missing).unwrap_err();
        assert_eq!(
            err,
            ModelError::ShapeNotFound {
                id: missing.clone()
            }
        );
    }

    #[test]
    fn test_shapes_of_type() {
        let model = sample_model();
        assert_eq!(model.shapes_of_type(ShapeType::List).count(), 1);
        assert_eq!(model.shapes_of_type(ShapeType::String).count(), 1);
        assert_eq!(model.shapes_of_type(ShapeType::Service).count(), 0);
    }

    #[test]
    fn test_metadata_access() {
        let model = sample_model();
        assert!(model.metadata_value("authors").is_some());
        assert!(model.metadata_value("absent").is_none());
    }
}
