//! Assembles and validates a [`Model`] from documents, files, shapes, and
//! other sources.
//!
//! Sources accumulate on the assembler and are only interpreted when
//! [`ModelAssembler::assemble`] runs. Assembly merges every source into one
//! shape map, merges metadata, validates the result, and returns a
//! [`ValidatedResult`]: the model is withheld when any ERROR event fires.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use tracing::debug;

use crate::loader::{self, LoadError};
use crate::model::Model;
use crate::node::Node;
use crate::shapes::{Shape, ShapeId, ShapeType};
use crate::traits::{TraitCheck, TraitRegistry};
use crate::validation::{Severity, ValidatedResult, ValidationEvent};

/// Event ID for documents that fail to read or parse.
const EVENT_INVALID_DOCUMENT: &str = "InvalidDocument";
/// Event ID for conflicting shape redefinitions.
const EVENT_DUPLICATE_SHAPE: &str = "DuplicateShape";
/// Event ID for irreconcilable metadata values.
const EVENT_METADATA_CONFLICT: &str = "MetadataConflict";
/// Event ID for references to undefined shapes.
const EVENT_DANGLING_TARGET: &str = "DanglingShapeTarget";
/// Event ID for traits missing from the registry.
const EVENT_UNKNOWN_TRAIT: &str = "UnknownTrait";
/// Event ID for trait values the registry rejects.
const EVENT_INVALID_TRAIT_VALUE: &str = "InvalidTraitValue";
/// Event ID for service operation references that are not operations.
const EVENT_SERVICE_OPERATION_TARGET: &str = "ServiceOperationTarget";
/// Event ID for operation input/output/error references of the wrong shape.
const EVENT_OPERATION_SHAPE_TARGET: &str = "OperationShapeTarget";

#[derive(Debug, Clone)]
enum Source {
    File(PathBuf),
    Unparsed { name: String, contents: String },
    DocumentNode(Node),
}

/// Aggregates model sources and produces a validated [`Model`].
///
/// ```
/// use wrought_model::Model;
///
/// let result = Model::assembler()
///     .add_unparsed_model(
///         "demo.json",
///         r#"{"version": "1.0", "shapes": {"demo#Name": {"type": "string"}}}"#,
///     )
///     .assemble();
/// assert!(result.result().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ModelAssembler {
    sources: Vec<Source>,
    shapes: Vec<Shape>,
    models: Vec<Model>,
    metadata: BTreeMap<String, Node>,
    suppressions: BTreeSet<String>,
    registry: TraitRegistry,
    disable_prelude: bool,
    allow_unknown_traits: bool,
}

impl Default for ModelAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelAssembler {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            shapes: Vec::new(),
            models: Vec::new(),
            metadata: BTreeMap::new(),
            suppressions: BTreeSet::new(),
            registry: TraitRegistry::prelude(),
            disable_prelude: false,
            allow_unknown_traits: false,
        }
    }

    /// Queue a model document file for loading.
    pub fn add_import(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.sources.push(Source::File(path.into()));
        self
    }

    /// Queue an in-memory document; `name` identifies it in diagnostics.
    pub fn add_unparsed_model(
        &mut self,
        name: impl Into<String>,
        contents: impl Into<String>,
    ) -> &mut Self {
        self.sources.push(Source::Unparsed {
            name: name.into(),
            contents: contents.into(),
        });
        self
    }

    /// Queue an already-parsed document node.
    pub fn add_document_node(&mut self, node: Node) -> &mut Self {
        self.sources.push(Source::DocumentNode(node));
        self
    }

    /// Add a programmatically built shape.
    pub fn add_shape(&mut self, shape: Shape) -> &mut Self {
        self.shapes.push(shape);
        self
    }

    /// Merge every shape and metadata entry of an existing model.
    pub fn add_model(&mut self, model: &Model) -> &mut Self {
        self.models.push(model.clone());
        self
    }

    /// Set a metadata value, replacing any queued value under the key.
    pub fn put_metadata(&mut self, key: impl Into<String>, value: Node) -> &mut Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Use a custom trait registry instead of the prelude table.
    pub fn trait_registry(&mut self, registry: TraitRegistry) -> &mut Self {
        self.registry = registry;
        self
    }

    /// Skip injecting the `wrought.api` prelude shapes.
    pub fn disable_prelude(&mut self) -> &mut Self {
        self.disable_prelude = true;
        self
    }

    /// Downgrade unknown-trait events from ERROR to WARNING.
    pub fn allow_unknown_traits(&mut self, allow: bool) -> &mut Self {
        self.allow_unknown_traits = allow;
        self
    }

    /// Drop non-ERROR events with the given event ID from the result.
    /// ERROR events are never suppressed.
    pub fn suppress(&mut self, event_id: impl Into<String>) -> &mut Self {
        self.suppressions.insert(event_id.into());
        self
    }

    /// Clear all queued sources, shapes, metadata, suppressions, and
    /// configuration.
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::new();
        self
    }

    /// Load, merge, and validate everything queued on this assembler.
    pub fn assemble(&self) -> ValidatedResult<Model> {
        let mut events = Vec::new();
        let mut shapes: BTreeMap<ShapeId, Shape> = BTreeMap::new();
        let mut metadata: BTreeMap<String, Node> = BTreeMap::new();

        if !self.disable_prelude {
            for shape in loader::prelude_shapes() {
                shapes.insert(shape.id().clone(), shape);
            }
        }

        debug!(
            sources = self.sources.len(),
            shapes = self.shapes.len(),
            models = self.models.len(),
            "assembling model"
        );

        for source in &self.sources {
            match load_source(source) {
                Ok(document) => {
                    for shape in document.shapes {
                        merge_shape(&mut shapes, shape, &mut events);
                    }
                    for (key, value) in document.metadata {
                        merge_metadata(&mut metadata, key, value, &mut events);
                    }
                }
                Err(err) => events.push(ValidationEvent::error(
                    EVENT_INVALID_DOCUMENT,
                    err.to_string(),
                )),
            }
        }

        for model in &self.models {
            for shape in model.shapes() {
                merge_shape(&mut shapes, shape.clone(), &mut events);
            }
            for (key, value) in model.metadata() {
                merge_metadata(&mut metadata, key.clone(), value.clone(), &mut events);
            }
        }

        for shape in &self.shapes {
            merge_shape(&mut shapes, shape.clone(), &mut events);
        }

        for (key, value) in &self.metadata {
            merge_metadata(&mut metadata, key.clone(), value.clone(), &mut events);
        }

        self.validate(&shapes, &mut events);

        events.retain(|e| {
            e.severity() == Severity::Error || !self.suppressions.contains(e.id())
        });

        let has_errors = events.iter().any(|e| e.severity() == Severity::Error);
        let result = if has_errors {
            None
        } else {
            Some(Model::from_parts(metadata, shapes))
        };

        debug!(
            events = events.len(),
            broken = has_errors,
            "model assembly finished"
        );
        ValidatedResult::new(result, events)
    }

    fn validate(&self, shapes: &BTreeMap<ShapeId, Shape>, events: &mut Vec<ValidationEvent>) {
        for shape in shapes.values() {
            self.check_traits(shape.id(), shape.traits(), shape, events);
            for (name, member) in shape.members() {
                let member_id = shape
                    .id()
                    .with_member(name)
                    .unwrap_or_else(|_| shape.id().clone());
                for (trait_name, value) in member.traits() {
                    self.check_trait(&member_id, trait_name, value, shape, events);
                }
                if !shapes.contains_key(member.target()) {
                    events.push(
                        ValidationEvent::error(
                            EVENT_DANGLING_TARGET,
                            format!("member targets undefined shape '{}'", member.target()),
                        )
                        .with_shape(member_id)
                        .with_source(member.source().clone()),
                    );
                }
            }
            match shape.shape_type() {
                ShapeType::Service => self.validate_service(shape, shapes, events),
                ShapeType::Operation => self.validate_operation(shape, shapes, events),
                _ => {}
            }
        }
    }

    fn check_traits(
        &self,
        id: &ShapeId,
        traits: &BTreeMap<String, Node>,
        shape: &Shape,
        events: &mut Vec<ValidationEvent>,
    ) {
        for (trait_name, value) in traits {
            self.check_trait(id, trait_name, value, shape, events);
        }
    }

    fn check_trait(
        &self,
        id: &ShapeId,
        trait_name: &str,
        value: &Node,
        shape: &Shape,
        events: &mut Vec<ValidationEvent>,
    ) {
        match self.registry.check(trait_name, value) {
            TraitCheck::Ok => {}
            TraitCheck::Unknown => {
                let severity = if self.allow_unknown_traits {
                    Severity::Warning
                } else {
                    Severity::Error
                };
                events.push(
                    ValidationEvent::new(
                        severity,
                        EVENT_UNKNOWN_TRAIT,
                        format!("unknown trait '{trait_name}'"),
                    )
                    .with_shape(id.clone())
                    .with_source(shape.source().clone()),
                );
            }
            TraitCheck::InvalidValue { expected } => {
                events.push(
                    ValidationEvent::error(
                        EVENT_INVALID_TRAIT_VALUE,
                        format!(
                            "trait '{trait_name}' expects {expected}, found {}",
                            value.kind()
                        ),
                    )
                    .with_shape(id.clone())
                    .with_source(value.location().clone()),
                );
            }
        }
    }

    fn validate_service(
        &self,
        shape: &Shape,
        shapes: &BTreeMap<ShapeId, Shape>,
        events: &mut Vec<ValidationEvent>,
    ) {
        for target in shape.referenced_shapes() {
            match shapes.get(target) {
                None => events.push(
                    ValidationEvent::error(
                        EVENT_DANGLING_TARGET,
                        format!("service references undefined shape '{target}'"),
                    )
                    .with_shape(shape.id().clone())
                    .with_source(shape.source().clone()),
                ),
                Some(op) if op.shape_type() != ShapeType::Operation => events.push(
                    ValidationEvent::error(
                        EVENT_SERVICE_OPERATION_TARGET,
                        format!(
                            "service operation '{target}' resolves to a {} shape",
                            op.shape_type()
                        ),
                    )
                    .with_shape(shape.id().clone())
                    .with_source(shape.source().clone()),
                ),
                Some(_) => {}
            }
        }
    }

    fn validate_operation(
        &self,
        shape: &Shape,
        shapes: &BTreeMap<ShapeId, Shape>,
        events: &mut Vec<ValidationEvent>,
    ) {
        let crate::shapes::ShapeKind::Operation {
            input,
            output,
            errors,
        } = shape.kind()
        else {
            return;
        };

        for (label, target) in [("input", input), ("output", output)] {
            let Some(target) = target else { continue };
            match shapes.get(target) {
                None => events.push(
                    ValidationEvent::error(
                        EVENT_DANGLING_TARGET,
                        format!("operation {label} targets undefined shape '{target}'"),
                    )
                    .with_shape(shape.id().clone())
                    .with_source(shape.source().clone()),
                ),
                Some(s) if s.shape_type() != ShapeType::Structure => events.push(
                    ValidationEvent::error(
                        EVENT_OPERATION_SHAPE_TARGET,
                        format!(
                            "operation {label} '{target}' must be a structure, found {}",
                            s.shape_type()
                        ),
                    )
                    .with_shape(shape.id().clone())
                    .with_source(shape.source().clone()),
                ),
                Some(_) => {}
            }
        }

        for target in errors {
            match shapes.get(target) {
                None => events.push(
                    ValidationEvent::error(
                        EVENT_DANGLING_TARGET,
                        format!("operation error targets undefined shape '{target}'"),
                    )
                    .with_shape(shape.id().clone())
                    .with_source(shape.source().clone()),
                ),
                Some(s)
                    if s.shape_type() != ShapeType::Structure || !s.has_trait("error") =>
                {
                    events.push(
                        ValidationEvent::error(
                            EVENT_OPERATION_SHAPE_TARGET,
                            format!(
                                "operation error '{target}' must be a structure with the 'error' trait"
                            ),
                        )
                        .with_shape(shape.id().clone())
                        .with_source(shape.source().clone()),
                    );
                }
                Some(_) => {}
            }
        }
    }
}

fn load_source(source: &Source) -> Result<loader::LoadedDocument, LoadError> {
    match source {
        Source::File(path) => {
            let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;
            let name = path.to_string_lossy();
            let node = Node::parse_json(&contents, &name)?;
            loader::load_document(&node, &name)
        }
        Source::Unparsed { name, contents } => {
            let node = Node::parse_json(contents, name)?;
            loader::load_document(&node, name)
        }
        Source::DocumentNode(node) => {
            let name = node.location().filename().to_string();
            let name = if name.is_empty() { "<node>".to_string() } else { name };
            loader::load_document(node, &name)
        }
    }
}

/// Identical redefinitions are tolerated (first wins); conflicting
/// redefinitions produce a `DuplicateShape` ERROR.
fn merge_shape(
    shapes: &mut BTreeMap<ShapeId, Shape>,
    shape: Shape,
    events: &mut Vec<ValidationEvent>,
) {
    match shapes.get(shape.id()) {
        None => {
            shapes.insert(shape.id().clone(), shape);
        }
        Some(existing) if *existing == shape => {}
        Some(_) => events.push(
            ValidationEvent::error(
                EVENT_DUPLICATE_SHAPE,
                format!("conflicting redefinition of shape '{}'", shape.id()),
            )
            .with_shape(shape.id().clone())
            .with_source(shape.source().clone()),
        ),
    }
}

/// Equal values merge silently, arrays concatenate, anything else conflicts.
fn merge_metadata(
    metadata: &mut BTreeMap<String, Node>,
    key: String,
    value: Node,
    events: &mut Vec<ValidationEvent>,
) {
    match metadata.get(&key) {
        None => {
            metadata.insert(key, value);
        }
        Some(existing) if *existing == value => {}
        Some(existing) => match (existing.as_array(), value.as_array()) {
            (Some(left), Some(right)) => {
                let merged: Vec<Node> = left.iter().chain(right.iter()).cloned().collect();
                metadata.insert(key, Node::array(merged));
            }
            _ => events.push(ValidationEvent::error(
                EVENT_METADATA_CONFLICT,
                format!("metadata key '{key}' has conflicting values"),
            )),
        },
    }
}
