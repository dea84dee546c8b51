//! Rebuilds nested field trees from flat dotted-path declarations.
//!
//! Given
//!
//! ```text
//! @property {Object} user
//! @property {Integer} user.id
//! @property {String} user.name
//! ```
//!
//! the builder yields one `user` field with children `id` and `name`.

use crate::error::Result;
use crate::grammar::{classify, extract_typed, is_marker, DeclarationKind};
use crate::model::Field;

/// Builds the field tree for one declaration kind.
///
/// `kind` should be [`DeclarationKind::Parameter`], [`DeclarationKind::Return`]
/// or [`DeclarationKind::Property`]; lines of every other kind are classified
/// and skipped. Marker lines are ignored.
///
/// # Errors
///
/// Propagates the first classification or typed-declaration error found in
/// `lines`.
pub fn build_fields(kind: &DeclarationKind, lines: &[String]) -> Result<Vec<Field>> {
    build_level(kind, lines, "")
}

/// Collects the direct children of `prefix`, recursing once per child.
///
/// A declaration is a direct child when its path starts with `prefix` and the
/// remainder holds no further `.`, so `auth.user.id` never lands at the top
/// level and `username` never lands under `user.`.
fn build_level(kind: &DeclarationKind, lines: &[String], prefix: &str) -> Result<Vec<Field>> {
    let mut fields = Vec::new();

    for line in lines {
        if is_marker(line) {
            continue;
        }
        if classify(line)? != *kind {
            continue;
        }

        let decl = extract_typed(line)?;
        let local = match decl.namespace.strip_prefix(prefix) {
            Some(rest) if !rest.is_empty() && !rest.contains('.') => rest.to_string(),
            _ => continue,
        };

        let child_prefix = format!("{}{}.", prefix, local);
        let mut field = Field::from_declaration(local, decl);
        field.children = build_level(kind, lines, &child_prefix)?;
        fields.push(field);
    }

    fields.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(fields)
}
