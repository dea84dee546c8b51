//! Group scanner: splits a line stream into annotation blocks.

use crate::error::{AtozError, Result};
use crate::grammar::{is_end_marker, is_start_marker};
use log::{debug, trace};
use std::io::BufRead;

/// The ordered lines of one annotation block, marker lines included.
pub type Group = Vec<String>;

/// Scans a source for annotation groups.
///
/// Lines outside any block are ordinary source code and are dropped. The first
/// line of every returned group carries a start marker and the last carries
/// the end marker.
///
/// A source containing a line that is not valid UTF-8 yields no groups at all;
/// binary files found while walking a tree are skipped this way.
///
/// # Errors
///
/// Returns [`AtozError::UnclosedGroup`] when the input ends inside a block, and
/// [`AtozError::Io`] when reading the stream fails.
pub fn scan_groups<R: BufRead>(reader: R) -> Result<Vec<Group>> {
    let mut groups = Vec::new();
    let mut current: Group = Vec::new();

    for raw in reader.split(b'\n') {
        let mut bytes = raw?;
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }

        let line = match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(_) => {
                debug!("Skipping source with non-UTF-8 content");
                return Ok(Vec::new());
            }
        };

        if is_start_marker(&line) {
            current.push(line);
        } else if is_end_marker(&line) {
            current.push(line);
            trace!("Closed group of {} lines", current.len());
            groups.push(std::mem::take(&mut current));
        } else if !current.is_empty() {
            current.push(line);
        }
    }

    if !current.is_empty() {
        return Err(AtozError::UnclosedGroup);
    }

    Ok(groups)
}

/// Convenience wrapper over [`scan_groups`] for in-memory text.
pub fn scan_str(text: &str) -> Result<Vec<Group>> {
    scan_groups(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{group_marker, GroupKind};

    const FOUR_BLOCKS: &str = r#"<?php
/**
 * ---ATOZDEF---
 * @ref /Defs/Authorization
 * @required {String,64} auth.token Session token.
 * ---ATOZEND---
 */
$x = 1;

/**
 * ---ATOZDEF---
 * @ref /Defs/Paging
 * @optional {Integer} page Page number.
 * ---ATOZEND---
 */

function listUsers() {}

/**
 * ---ATOZAPI---
 * @name List Users
 * @ref /Users/List
 * @include /Defs/Authorization
 * @include /Defs/Paging
 * @return {Array} users
 * ---ATOZEND---
 */

/**
 * ---ATOZOBJ---
 * @name User
 * @ref /Objects/User
 * @property {Integer} id
 * ---ATOZEND---
 */
"#;

    #[test]
    fn test_scan_four_blocks_in_order() {
        let groups = scan_str(FOUR_BLOCKS).unwrap();
        assert_eq!(groups.len(), 4);

        let kinds: Vec<GroupKind> = groups
            .iter()
            .map(|g| group_marker(&g[0]).unwrap())
            .collect();
        assert_eq!(
            kinds,
            vec![
                GroupKind::Fragment,
                GroupKind::Fragment,
                GroupKind::Action,
                GroupKind::Object
            ]
        );

        for group in &groups {
            assert!(is_end_marker(group.last().unwrap()));
        }
        assert_eq!(groups[2].len(), 7);
        assert_eq!(groups[2][1], " * @name List Users");
    }

    #[test]
    fn test_scan_discards_text_between_blocks() {
        let groups = scan_str(FOUR_BLOCKS).unwrap();
        assert!(groups
            .iter()
            .flatten()
            .all(|line| !line.contains("function") && !line.contains("$x")));
    }

    #[test]
    fn test_scan_unclosed_group() {
        let text = "// ---ATOZAPI---\n// @ref /A\n// @name A\n";
        assert!(matches!(scan_str(text), Err(AtozError::UnclosedGroup)));
    }

    #[test]
    fn test_scan_no_blocks() {
        assert!(scan_str("fn main() {}\n").unwrap().is_empty());
        assert!(scan_str("").unwrap().is_empty());
    }

    #[test]
    fn test_scan_strips_carriage_returns() {
        let text = "# ---ATOZOBJ---\r\n# @ref /O\r\n# ---ATOZEND---\r\n";
        let groups = scan_str(text).unwrap();
        assert_eq!(groups, vec![vec![
            "# ---ATOZOBJ---".to_string(),
            "# @ref /O".to_string(),
            "# ---ATOZEND---".to_string(),
        ]]);
    }

    #[test]
    fn test_scan_non_utf8_source_is_skipped() {
        let mut bytes = b"// ---ATOZOBJ---\n// @ref /O\n// ---ATOZEND---\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        let groups = scan_groups(&bytes[..]).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_end_marker_without_start_emits_group() {
        // An end marker with nothing buffered still closes a one-line group;
        // the catalog rejects it for lacking a start marker.
        let groups = scan_str("---ATOZEND---\n").unwrap();
        assert_eq!(groups.len(), 1);
    }
}
