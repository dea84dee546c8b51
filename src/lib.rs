//! ATOZ - API specifications from annotation blocks in any source language.
//!
//! Source files carry comment blocks delimited by fixed markers. Inside a
//! block every line holds one `@` declaration:
//!
//! ```text
//! /**
//!  * ---ATOZAPI---
//!  * @name Get User
//!  * @ref /MyApp/User/Get
//!  * @uri /users/get
//!  * @description Fetch a user from the application.
//!  * @required {Integer} id The user id to lookup.
//!  * @return {Object} user An object representing the user.
//!  * @return {String,255} user.name The user's name.
//!  * ---ATOZEND---
//!  */
//! ```
//!
//! `---ATOZAPI---` opens an action, `---ATOZOBJ---` an object and
//! `---ATOZDEF---` a reusable fragment that other blocks pull in with
//! `@include`. All three close with `---ATOZEND---`.
//!
//! # Architecture
//!
//! 1. [`grammar`] - Classifies and decodes single declaration lines
//! 2. [`group`] - Splits a line stream into annotation blocks
//! 3. [`catalog`] - Indexes blocks by kind and `@ref` path
//! 4. [`hierarchy`] - Rebuilds nested fields from dotted paths
//! 5. [`assembler`] - Splices includes and assembles the [`model::Specification`]
//! 6. [`scanner`] - Lists the files of a source tree
//! 7. [`serializer`] - Writes the specification as JSON or YAML
//!
//! # Example Usage
//!
//! ```
//! use atoz::assembler::SpecAssembler;
//!
//! let source = "\
//! // ---ATOZOBJ---
//! // @name User
//! // @ref /Objects/User
//! // @property {Integer} id
//! // ---ATOZEND---
//! ";
//!
//! let spec = SpecAssembler::new()
//!     .assemble_sources(vec![source.as_bytes()])
//!     .unwrap();
//! assert_eq!(spec.objects[0].properties[0].name, "id");
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod assembler;
pub mod catalog;
pub mod cli;
pub mod error;
pub mod grammar;
pub mod group;
pub mod hierarchy;
pub mod model;
pub mod scanner;
pub mod serializer;

pub use assembler::SpecAssembler;
pub use error::{AtozError, Result};
pub use model::{Action, Field, Object, Specification};
