//! Assembled specification types.
//!
//! These are plain serde structures; the field names here are the keys of the
//! generated JSON/YAML document.

use crate::grammar::TypedDeclaration;
use serde::{Deserialize, Serialize};

/// The complete specification produced by one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    pub actions: Vec<Action>,
    pub objects: Vec<Object>,
}

/// A callable operation declared by an `---ATOZAPI---` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub uri: String,
    pub description: String,
    pub parameters: Vec<Field>,
    pub returns: Vec<Field>,
}

/// A data shape declared by an `---ATOZOBJ---` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    pub name: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub description: String,
    pub properties: Vec<Field>,
}

/// A named, typed and possibly nested parameter, return value or property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Local name relative to the parent field.
    pub name: String,
    /// `required`, `optional`, `success`, `failure`, or empty.
    pub flag: String,
    /// Lowercase type name or a `#...#` forward reference.
    #[serde(rename = "type")]
    pub type_name: String,
    /// `-1` when the type has no limit concept.
    pub limit: i64,
    pub description: String,
    pub children: Vec<Field>,
}

impl Field {
    /// Builds a childless field named `name` from a decoded declaration.
    pub fn from_declaration(name: impl Into<String>, decl: TypedDeclaration) -> Self {
        Field {
            name: name.into(),
            flag: decl.flag.map(|f| f.as_str().to_string()).unwrap_or_default(),
            type_name: decl.type_tag.name().to_string(),
            limit: decl.type_tag.limit(),
            description: decl.description,
            children: Vec::new(),
        }
    }

    /// Finds a direct child by name.
    pub fn child(&self, name: &str) -> Option<&Field> {
        self.children.iter().find(|c| c.name == name)
    }
}

impl Specification {
    pub fn action(&self, reference: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.reference == reference)
    }

    pub fn object(&self, reference: &str) -> Option<&Object> {
        self.objects.iter().find(|o| o.reference == reference)
    }
}
