//! Reference catalog: groups indexed by kind and `@ref` path.

use crate::error::{AtozError, Result};
use crate::grammar::{classify, extract_string, group_marker, DeclarationKind, GroupKind};
use crate::group::Group;
use indexmap::IndexMap;
use log::{debug, warn};

/// Lines of a cataloged group, without its marker lines.
pub type Entry = Vec<String>;

/// What to do when two groups of the same kind declare the same `@ref`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// The later group's lines replace the earlier entry, which keeps its position.
    #[default]
    Replace,
    /// Fail with [`AtozError::DuplicateReference`].
    Reject,
}

/// Fragment, action and object groups keyed by reference path.
///
/// Each collection iterates in the order references were first seen.
#[derive(Debug, Default)]
pub struct ReferenceCatalog {
    pub fragments: IndexMap<String, Entry>,
    pub actions: IndexMap<String, Entry>,
    pub objects: IndexMap<String, Entry>,
}

impl ReferenceCatalog {
    /// Classifies every group and indexes it under its `@ref` path.
    ///
    /// Fragments are stored without their `@ref` lines so splicing one into a
    /// consumer never introduces a second reference declaration.
    ///
    /// # Errors
    ///
    /// - [`AtozError::NoGroupMarker`] if a group does not open with a start marker
    /// - [`AtozError::MissingReference`] if a group has no `@ref` line
    /// - any grammar error raised by lines scanned before the `@ref`
    /// - [`AtozError::DuplicateReference`] under [`DuplicatePolicy::Reject`]
    pub fn build(groups: &[Group], policy: DuplicatePolicy) -> Result<Self> {
        let mut catalog = ReferenceCatalog::default();

        for group in groups {
            let first_line = group.first().map(String::as_str).unwrap_or_default();
            let kind = group_marker(first_line)?;

            let body: Entry = match group.len() {
                0..=2 => Vec::new(),
                len => group[1..len - 1].to_vec(),
            };

            let reference = find_reference(&body)?.ok_or_else(|| AtozError::MissingReference {
                first_line: first_line.to_string(),
            })?;

            let body = match kind {
                GroupKind::Fragment => strip_references(body),
                GroupKind::Action | GroupKind::Object => body,
            };

            catalog.insert(kind, reference, body, policy)?;
        }

        debug!(
            "Cataloged {} fragments, {} actions, {} objects",
            catalog.fragments.len(),
            catalog.actions.len(),
            catalog.objects.len()
        );

        Ok(catalog)
    }

    fn insert(
        &mut self,
        kind: GroupKind,
        reference: String,
        body: Entry,
        policy: DuplicatePolicy,
    ) -> Result<()> {
        let collection = match kind {
            GroupKind::Fragment => &mut self.fragments,
            GroupKind::Action => &mut self.actions,
            GroupKind::Object => &mut self.objects,
        };

        if collection.contains_key(&reference) {
            match policy {
                DuplicatePolicy::Replace => {
                    warn!("Duplicate {} reference {} replaces earlier definition", kind.as_str(), reference);
                }
                DuplicatePolicy::Reject => {
                    return Err(AtozError::DuplicateReference {
                        kind: kind.as_str(),
                        reference,
                    });
                }
            }
        }

        collection.insert(reference, body);
        Ok(())
    }

    /// Looks up a fragment by reference path.
    pub fn fragment(&self, reference: &str) -> Option<&Entry> {
        self.fragments.get(reference)
    }
}

/// Returns the value of the first `@ref` line.
fn find_reference(lines: &[String]) -> Result<Option<String>> {
    for line in lines {
        if classify(line)? == DeclarationKind::Ref {
            return extract_string(line).map(Some);
        }
    }
    Ok(None)
}

fn strip_references(lines: Entry) -> Entry {
    lines
        .into_iter()
        .filter(|line| !matches!(classify(line), Ok(DeclarationKind::Ref)))
        .collect()
}
