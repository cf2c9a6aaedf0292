//! Specification objects (use cases, requirements, user stories) and their
//! compilation into Mermaid flowchart source.

mod compile;
mod graph;

pub use compile::*;
pub use graph::*;

use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Kind of specification collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    UseCases,
    Requirements,
    UserStories,
}

impl FromStr for SpecKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "use-cases" | "usecases" | "casos-uso" | "cu" => Ok(SpecKind::UseCases),
            "requirements" | "requisitos" | "rf" => Ok(SpecKind::Requirements),
            "user-stories" | "stories" | "historias" | "hu" => Ok(SpecKind::UserStories),
            _ => Err(format!(
                "Unknown spec kind: {}. Valid options: use-cases, requirements, user-stories",
                s
            )),
        }
    }
}

impl fmt::Display for SpecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecKind::UseCases => write!(f, "use-cases"),
            SpecKind::Requirements => write!(f, "requirements"),
            SpecKind::UserStories => write!(f, "user-stories"),
        }
    }
}

/// A specification object read from one JSON object.
///
/// Every field has Spanish and English keys. When several are present the
/// first usable one wins; nothing about a single entry makes it unreadable.
pub trait SpecItem: Sized {
    fn from_object(obj: &Map<String, Value>) -> Self;
}

/// A use case
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UseCase {
    pub name: String,
    /// Comma-separated actor list
    pub actors: String,
    pub priority: Option<String>,
}

impl SpecItem for UseCase {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            name: text_field(obj, &["nombre", "name", "titulo", "title"]),
            actors: text_field(obj, &["actores", "actors", "actor"]),
            priority: optional_text_field(obj, &["prioridad", "priority"]),
        }
    }
}

/// A requirement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Requirement {
    pub name: String,
    pub description: String,
    /// Free text; classified by substring into functional / non-functional / other
    pub kind: String,
    pub priority: Option<String>,
    /// Comma-separated stakeholder list
    pub actors: String,
}

impl SpecItem for Requirement {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            name: text_field(obj, &["nombre", "name", "titulo", "title"]),
            description: text_field(obj, &["descripcion", "description"]),
            kind: text_field(obj, &["tipo", "type"]),
            priority: optional_text_field(obj, &["prioridad", "priority"]),
            actors: text_field(obj, &["actores", "stakeholders", "actors"]),
        }
    }
}

impl Requirement {
    /// Display name, falling back to the description
    pub fn label(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.description
        } else {
            &self.name
        }
    }
}

/// A user story
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserStory {
    pub title: String,
    /// Comma-separated role list
    pub role: String,
    pub priority: Option<String>,
    pub business_value: Option<f64>,
}

impl SpecItem for UserStory {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            title: text_field(obj, &["titulo", "title", "nombre", "name"]),
            role: text_field(obj, &["rol", "role", "actor", "como"]),
            priority: optional_text_field(obj, &["prioridad", "priority"]),
            business_value: number_field(obj, &["valor_negocio", "business_value", "valor"]),
        }
    }
}

/// Split a free-text actor field on commas, trimming and dropping empties
pub fn split_actors(field: &str) -> Vec<&str> {
    field
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .collect()
}

/// Read a collection of specification objects.
///
/// Accepts a JSON array or a stringified JSON array. Elements that are not
/// objects are skipped, so positions refer to the object elements only.
pub fn load_items<T: SpecItem>(payload: &Value) -> Vec<T> {
    let parsed;
    let payload = match payload {
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(v) => {
                parsed = v;
                &parsed
            }
            Err(e) => {
                warn!(error = %e, "Specification payload is not valid JSON");
                return Vec::new();
            }
        },
        other => other,
    };

    let Some(elements) = payload.as_array() else {
        return Vec::new();
    };

    elements
        .iter()
        .enumerate()
        .filter_map(|(i, element)| match element.as_object() {
            Some(obj) => Some(T::from_object(obj)),
            None => {
                warn!(position = i + 1, "Skipping non-object specification entry");
                None
            }
        })
        .collect()
}

/// First non-blank text under any of `keys`, or empty
fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> String {
    optional_text_field(obj, keys).unwrap_or_default()
}

fn optional_text_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .filter_map(value_to_text)
        .find(|s| !s.trim().is_empty())
}

/// First finite number, or numeric string, under any of `keys`
fn number_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .filter_map(|value| match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .find(|v| v.is_finite())
}

/// Strings, numbers and string arrays as text; anything else is absent
fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(value_to_text)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Null | Value::Object(_) => None,
    }
}
