//! Spec assembler: turns annotated sources into a [`Specification`].
//!
//! The pipeline is
//!
//! 1. scan each source into groups ([`crate::group`]),
//! 2. index them by `@ref` ([`crate::catalog`]),
//! 3. splice `@include`d fragments into each action and object,
//! 4. build the parameter/return/property trees ([`crate::hierarchy`]).

use crate::catalog::{DuplicatePolicy, ReferenceCatalog};
use crate::error::{AtozError, Result};
use crate::grammar::{classify, extract_string, DeclarationKind};
use crate::group::{scan_groups, Group};
use crate::hierarchy::build_fields;
use crate::model::{Action, Object, Specification};
use anyhow::Context;
use log::{debug, trace};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

/// Assembles specifications from annotated sources.
///
/// Each call is a full, stateless pass; the assembler only carries the
/// duplicate-reference policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecAssembler {
    policy: DuplicatePolicy,
}

/// Scalar declarations of one group plus its include-expanded lines.
#[derive(Debug, Default)]
struct ExpandedGroup {
    name: Option<String>,
    reference: Option<String>,
    uri: Option<String>,
    description: Option<String>,
    lines: Vec<String>,
}

impl SpecAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self { policy }
    }

    /// Scans every source in order and assembles the result.
    ///
    /// # Errors
    ///
    /// Fails on the first scanning, cataloging or assembly error.
    pub fn assemble_sources<R, I>(&self, sources: I) -> Result<Specification>
    where
        R: BufRead,
        I: IntoIterator<Item = R>,
    {
        let mut groups = Vec::new();
        for source in sources {
            groups.extend(scan_groups(source)?);
        }
        self.assemble_groups(&groups)
    }

    /// Opens and scans each file, then assembles the result.
    ///
    /// Errors raised while reading or scanning a file name that file.
    pub fn assemble_files(&self, paths: &[PathBuf]) -> anyhow::Result<Specification> {
        let mut groups = Vec::new();

        for path in paths {
            let file = File::open(path)
                .with_context(|| format!("Failed to open file: {}", path.display()))?;
            let found = scan_groups(BufReader::new(file))
                .with_context(|| format!("Failed to scan file: {}", path.display()))?;

            if !found.is_empty() {
                debug!("Found {} annotation groups in {}", found.len(), path.display());
            }
            groups.extend(found);
        }

        self.assemble_groups(&groups)
            .context("Failed to assemble API specification")
    }

    /// Assembles already-scanned groups.
    pub fn assemble_groups(&self, groups: &[Group]) -> Result<Specification> {
        debug!("Assembling specification from {} groups", groups.len());
        let catalog = ReferenceCatalog::build(groups, self.policy)?;

        let actions = catalog
            .actions
            .values()
            .map(|lines| generate_action(lines, &catalog))
            .collect::<Result<Vec<_>>>()?;

        let objects = catalog
            .objects
            .values()
            .map(|lines| generate_object(lines, &catalog))
            .collect::<Result<Vec<_>>>()?;

        Ok(Specification { actions, objects })
    }
}

fn generate_action(lines: &[String], catalog: &ReferenceCatalog) -> Result<Action> {
    let group = expand_group(lines, catalog)?;

    Ok(Action {
        parameters: build_fields(&DeclarationKind::Parameter, &group.lines)?,
        returns: build_fields(&DeclarationKind::Return, &group.lines)?,
        name: group.name.unwrap_or_default(),
        reference: group.reference.unwrap_or_default(),
        uri: group.uri.unwrap_or_default(),
        description: group.description.unwrap_or_default(),
    })
}

fn generate_object(lines: &[String], catalog: &ReferenceCatalog) -> Result<Object> {
    let group = expand_group(lines, catalog)?;

    Ok(Object {
        properties: build_fields(&DeclarationKind::Property, &group.lines)?,
        name: group.name.unwrap_or_default(),
        reference: group.reference.unwrap_or_default(),
        description: group.description.unwrap_or_default(),
    })
}

/// Walks a group's own lines once, recording the first value of each scalar
/// declaration and splicing fragments in front of their `@include` lines.
///
/// Spliced fragment lines are not walked, so their includes stay unexpanded
/// and they cannot override the consumer's scalars.
fn expand_group(lines: &[String], catalog: &ReferenceCatalog) -> Result<ExpandedGroup> {
    let mut group = ExpandedGroup {
        lines: Vec::with_capacity(lines.len()),
        ..Default::default()
    };

    for line in lines {
        let slot = match classify(line)? {
            DeclarationKind::Name => Some(&mut group.name),
            DeclarationKind::Ref => Some(&mut group.reference),
            DeclarationKind::Uri => Some(&mut group.uri),
            DeclarationKind::Description => Some(&mut group.description),
            DeclarationKind::Include => {
                let reference = extract_string(line)?;
                let fragment = catalog
                    .fragment(&reference)
                    .ok_or_else(|| AtozError::UnresolvedInclude {
                        reference: reference.clone(),
                    })?;
                trace!("Splicing {} lines from {}", fragment.len(), reference);
                group.lines.extend(fragment.iter().cloned());
                None
            }
            DeclarationKind::Parameter
            | DeclarationKind::Return
            | DeclarationKind::Property
            | DeclarationKind::ForwardReference(_) => None,
        };

        if let Some(slot) = slot {
            if slot.is_none() {
                *slot = Some(extract_string(line)?);
            }
        }

        group.lines.push(line.clone());
    }

    Ok(group)
}
