//! Validation events and the validated result container.

use std::fmt;

use crate::shapes::ShapeId;
use crate::source::SourceLocation;

/// Event severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Note,
    Warning,
    Danger,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Note => "NOTE",
            Severity::Warning => "WARNING",
            Severity::Danger => "DANGER",
            Severity::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// A single validation finding.
///
/// Events carry a stable ID (e.g. `DuplicateShape`) used for suppression
/// and assertions, an optional shape ID, and a source location.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationEvent {
    severity: Severity,
    id: String,
    shape_id: Option<ShapeId>,
    message: String,
    source: SourceLocation,
}

impl ValidationEvent {
    pub fn new(severity: Severity, id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            id: id.into(),
            shape_id: None,
            message: message.into(),
            source: SourceLocation::none(),
        }
    }

    /// Shorthand for an ERROR event.
    pub fn error(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, id, message)
    }

    /// Shorthand for a WARNING event.
    pub fn warning(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, id, message)
    }

    pub fn with_shape(mut self, shape_id: ShapeId) -> Self {
        self.shape_id = Some(shape_id);
        self
    }

    pub fn with_source(mut self, source: SourceLocation) -> Self {
        self.source = source;
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn shape_id(&self) -> Option<&ShapeId> {
        self.shape_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source(&self) -> &SourceLocation {
        &self.source
    }
}

impl fmt::Display for ValidationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.severity)?;
        if let Some(shape_id) = &self.shape_id {
            write!(f, "{shape_id}: ")?;
        }
        write!(f, "{} | {}", self.message, self.id)?;
        if !self.source.is_none() {
            write!(f, " ({})", self.source)?;
        }
        Ok(())
    }
}

/// A value produced alongside validation events.
///
/// The value is absent when any ERROR event fired. DANGER events mark the
/// result broken but still yield a value.
#[derive(Debug, Clone)]
pub struct ValidatedResult<T> {
    result: Option<T>,
    events: Vec<ValidationEvent>,
}

impl<T> ValidatedResult<T> {
    pub fn new(result: Option<T>, events: Vec<ValidationEvent>) -> Self {
        Self { result, events }
    }

    /// A clean result with no events.
    pub fn ok(value: T) -> Self {
        Self::new(Some(value), Vec::new())
    }

    pub fn events(&self) -> &[ValidationEvent] {
        &self.events
    }

    /// Events at or above the given severity.
    pub fn events_at_least(&self, severity: Severity) -> impl Iterator<Item = &ValidationEvent> {
        self.events.iter().filter(move |e| e.severity() >= severity)
    }

    /// Whether any DANGER or ERROR events fired.
    pub fn is_broken(&self) -> bool {
        self.events_at_least(Severity::Danger).next().is_some()
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    /// The value, or a failure wrapping every event when errors fired.
    pub fn into_result(self) -> Result<T, ValidationFailure> {
        match self.result {
            Some(value) => Ok(value),
            None => Err(ValidationFailure {
                events: self.events,
            }),
        }
    }
}

/// Failure returned when validation produced ERROR events.
#[derive(Debug, thiserror::Error)]
#[error("{}", format_failure(.events))]
pub struct ValidationFailure {
    /// Every event from the run, not only the errors.
    pub events: Vec<ValidationEvent>,
}

fn format_failure(events: &[ValidationEvent]) -> String {
    let errors = events
        .iter()
        .filter(|e| e.severity() == Severity::Error)
        .count();
    let mut out = format!("model validation failed with {errors} error event(s)");
    for event in events {
        out.push_str("\n  ");
        out.push_str(&event.to_string());
    }
    out
}
