//! Declaration grammar for annotation lines.
//!
//! Every line inside an annotation block carries one `@`-prefixed declaration,
//! optionally preceded by host-language comment syntax (`*`, `//`, `#`, ...).
//! The functions in this module interpret a single line at a time and hold no
//! state.
//!
//! ```text
//! @<token> [{Type[,Limit]}] [<dotted.path>] [<description>]
//! ```

use crate::error::{AtozError, Result};
use std::fmt;

/// Marker opening a reusable fragment block.
pub const START_FRAGMENT: &str = "---ATOZDEF---";
/// Marker opening an action block.
pub const START_ACTION: &str = "---ATOZAPI---";
/// Marker opening an object block.
pub const START_OBJECT: &str = "---ATOZOBJ---";
/// Marker closing any block.
pub const END_GROUP: &str = "---ATOZEND---";

/// The kind of declaration a line carries.
///
/// Several surface tokens collapse into one kind: `@required` and `@optional`
/// are parameters, `@success` and `@failure` are returns. The flag variant is
/// recovered separately through [`flag`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Name,
    Ref,
    Uri,
    Description,
    Include,
    Parameter,
    Return,
    Property,
    /// A `@#Some/Path#` token, kept verbatim without the leading `@`.
    ForwardReference(String),
}

/// Which start marker opened a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Fragment,
    Action,
    Object,
}

impl GroupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKind::Fragment => "fragment",
            GroupKind::Action => "action",
            GroupKind::Object => "object",
        }
    }
}

/// Requirement flag implied by the declaration token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Required,
    Optional,
    Success,
    Failure,
}

impl Flag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::Required => "required",
            Flag::Optional => "optional",
            Flag::Success => "success",
            Flag::Failure => "failure",
        }
    }
}

/// Primitive types understood by typed declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Integer,
    Decimal,
    String,
    Array,
    Object,
}

/// Whether a primitive type may carry a `,Limit` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitRule {
    /// No limit concept; the stored limit is `-1`.
    Forbidden,
    /// A limit may be given; it defaults to `0`.
    Optional,
}

/// Type/limit compatibility table.
const TYPE_TABLE: &[(&str, PrimitiveType, LimitRule)] = &[
    ("boolean", PrimitiveType::Boolean, LimitRule::Forbidden),
    ("integer", PrimitiveType::Integer, LimitRule::Forbidden),
    ("decimal", PrimitiveType::Decimal, LimitRule::Optional),
    ("string", PrimitiveType::String, LimitRule::Optional),
    ("array", PrimitiveType::Array, LimitRule::Optional),
    ("object", PrimitiveType::Object, LimitRule::Forbidden),
];

impl PrimitiveType {
    /// Looks up a lower-cased type name in the compatibility table.
    pub fn from_name(name: &str) -> Option<Self> {
        TYPE_TABLE
            .iter()
            .find(|(n, _, _)| *n == name)
            .map(|(_, ty, _)| *ty)
    }

    pub fn name(&self) -> &'static str {
        self.entry().0
    }

    pub fn limit_rule(&self) -> LimitRule {
        self.entry().2
    }

    // Rows are declared in variant order.
    fn entry(&self) -> &'static (&'static str, PrimitiveType, LimitRule) {
        &TYPE_TABLE[*self as usize]
    }
}

/// The `{...}` part of a typed declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    /// A type without a limit concept (`boolean`, `integer`, `object`).
    Primitive(PrimitiveType),
    /// A limit-capable type with its explicit or default limit.
    Limited(PrimitiveType, i64),
    /// A `#Some/Path#` token naming another entity's reference path.
    ForwardReference(String),
}

impl TypeTag {
    /// The serialized type name: lowercase primitive, or the reference token verbatim.
    pub fn name(&self) -> &str {
        match self {
            TypeTag::Primitive(ty) | TypeTag::Limited(ty, _) => ty.name(),
            TypeTag::ForwardReference(path) => path,
        }
    }

    /// The serialized limit, `-1` when no limit concept applies.
    pub fn limit(&self) -> i64 {
        match self {
            TypeTag::Limited(_, limit) => *limit,
            TypeTag::Primitive(_) | TypeTag::ForwardReference(_) => -1,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Limited(ty, limit) => write!(f, "{{{},{}}}", ty.name(), limit),
            _ => write!(f, "{{{}}}", self.name()),
        }
    }
}

/// A fully decoded `@<kind> {Type[,Limit]} <path> <description>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedDeclaration {
    pub type_tag: TypeTag,
    pub flag: Option<Flag>,
    /// Lower-cased dotted namespace path.
    pub namespace: String,
    /// Remaining words joined by single spaces; may be empty.
    pub description: String,
}

/// Splits a line at its first `@` into the declaration token and the rest.
fn split_declaration(line: &str) -> Option<(&str, &str)> {
    let at = line.find('@')?;
    let declaration = &line[at..];
    match declaration.find(char::is_whitespace) {
        Some(end) => Some((&declaration[..end], &declaration[end..])),
        None => Some((declaration, "")),
    }
}

fn is_forward_reference(token: &str) -> bool {
    token.len() >= 2 && token.starts_with('#') && token.ends_with('#')
}

/// Classifies a line by its first `@` token.
///
/// # Errors
///
/// Returns [`AtozError::MalformedDeclaration`] when the line has no `@`, and
/// [`AtozError::UnknownDeclaration`] for tokens outside the vocabulary that are
/// not `#...#` forward references.
pub fn classify(line: &str) -> Result<DeclarationKind> {
    let (token, _) = split_declaration(line).ok_or_else(|| AtozError::malformed(line))?;

    let kind = match token {
        "@name" => DeclarationKind::Name,
        "@ref" => DeclarationKind::Ref,
        "@uri" => DeclarationKind::Uri,
        "@description" => DeclarationKind::Description,
        "@include" => DeclarationKind::Include,
        "@parameter" | "@required" | "@optional" => DeclarationKind::Parameter,
        "@return" | "@success" | "@failure" => DeclarationKind::Return,
        "@property" => DeclarationKind::Property,
        other => {
            let body = &other[1..];
            if is_forward_reference(body) {
                DeclarationKind::ForwardReference(body.to_string())
            } else {
                return Err(AtozError::UnknownDeclaration {
                    token: other.to_string(),
                    line: line.to_string(),
                });
            }
        }
    };

    Ok(kind)
}

/// The requirement flag carried by the line's token, if any.
pub fn flag(line: &str) -> Option<Flag> {
    match split_declaration(line)?.0 {
        "@required" => Some(Flag::Required),
        "@optional" => Some(Flag::Optional),
        "@success" => Some(Flag::Success),
        "@failure" => Some(Flag::Failure),
        _ => None,
    }
}

/// Returns the trimmed text following the declaration token.
///
/// # Errors
///
/// Returns [`AtozError::MissingValue`] when nothing follows the token.
pub fn extract_string(line: &str) -> Result<String> {
    let (_, rest) = split_declaration(line).ok_or_else(|| AtozError::malformed(line))?;
    let value = rest.trim();

    if value.is_empty() {
        return Err(AtozError::missing_value(line));
    }

    Ok(value.to_string())
}

/// Decodes a typed declaration line.
///
/// Validation runs in this order: the `{...}` tag must directly follow the
/// token, the type must be a forward reference or appear in the compatibility
/// table, the limit must be a single non-negative integer allowed by the type,
/// and a namespace path must follow the tag.
///
/// # Examples
///
/// ```
/// use atoz::grammar::{extract_typed, Flag, PrimitiveType, TypeTag};
///
/// let decl = extract_typed(" * @required {String,64} User.Email Contact address.").unwrap();
/// assert_eq!(decl.type_tag, TypeTag::Limited(PrimitiveType::String, 64));
/// assert_eq!(decl.flag, Some(Flag::Required));
/// assert_eq!(decl.namespace, "user.email");
/// assert_eq!(decl.description, "Contact address.");
/// ```
pub fn extract_typed(line: &str) -> Result<TypedDeclaration> {
    let (_, rest) = split_declaration(line).ok_or_else(|| AtozError::malformed(line))?;
    let mut parts = rest.split_whitespace();

    let tag = parts
        .next()
        .and_then(|t| t.strip_prefix('{'))
        .and_then(|t| t.strip_suffix('}'))
        .ok_or_else(|| AtozError::MissingTypeTag {
            line: line.to_string(),
        })?;

    let type_tag = parse_type_tag(tag, line)?;

    let namespace = parts
        .next()
        .map(str::to_lowercase)
        .ok_or_else(|| AtozError::MissingNamespace {
            line: line.to_string(),
        })?;

    let description = parts.collect::<Vec<_>>().join(" ");

    Ok(TypedDeclaration {
        type_tag,
        flag: flag(line),
        namespace,
        description,
    })
}

/// Parses the inside of a `{Type[,Limit]}` tag.
fn parse_type_tag(tag: &str, line: &str) -> Result<TypeTag> {
    let mut pieces = tag.split(',');
    let raw_type = pieces.next().unwrap_or_default();
    let raw_limit = pieces.next();

    if pieces.next().is_some() {
        return Err(AtozError::InvalidLimit {
            line: line.to_string(),
        });
    }

    if is_forward_reference(raw_type) {
        if raw_limit.is_some() {
            return Err(AtozError::LimitNotAllowed {
                type_name: raw_type.to_string(),
                line: line.to_string(),
            });
        }
        return Ok(TypeTag::ForwardReference(raw_type.to_string()));
    }

    let type_name = raw_type.to_lowercase();
    let primitive = PrimitiveType::from_name(&type_name).ok_or_else(|| AtozError::InvalidType {
        type_name: type_name.clone(),
        line: line.to_string(),
    })?;

    let limit = match raw_limit {
        Some(raw) => Some(
            raw.parse::<i64>()
                .ok()
                .filter(|limit| *limit >= 0)
                .ok_or_else(|| AtozError::InvalidLimit {
                    line: line.to_string(),
                })?,
        ),
        None => None,
    };

    match (primitive.limit_rule(), limit) {
        (LimitRule::Forbidden, None) => Ok(TypeTag::Primitive(primitive)),
        (LimitRule::Forbidden, Some(_)) => Err(AtozError::LimitNotAllowed {
            type_name,
            line: line.to_string(),
        }),
        (LimitRule::Optional, limit) => Ok(TypeTag::Limited(primitive, limit.unwrap_or(0))),
    }
}

/// Recognizes which start marker a line carries.
///
/// # Errors
///
/// Returns [`AtozError::NoGroupMarker`] when the line has none of the three
/// start markers.
pub fn group_marker(line: &str) -> Result<GroupKind> {
    if line.contains(START_FRAGMENT) {
        Ok(GroupKind::Fragment)
    } else if line.contains(START_ACTION) {
        Ok(GroupKind::Action)
    } else if line.contains(START_OBJECT) {
        Ok(GroupKind::Object)
    } else {
        Err(AtozError::NoGroupMarker {
            line: line.to_string(),
        })
    }
}

/// True when the line opens a group of any kind.
pub fn is_start_marker(line: &str) -> bool {
    group_marker(line).is_ok()
}

/// True when the line closes a group.
pub fn is_end_marker(line: &str) -> bool {
    line.contains(END_GROUP)
}

/// True for any start or end marker line.
pub fn is_marker(line: &str) -> bool {
    is_start_marker(line) || is_end_marker(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_declarations() {
        let cases = [
            ("@name Namespace", DeclarationKind::Name),
            ("@ref Namespace", DeclarationKind::Ref),
            ("@uri Namespace", DeclarationKind::Uri),
            ("@description Description", DeclarationKind::Description),
            ("@include Namespace", DeclarationKind::Include),
            ("@parameter {Type,Limit} Objectspace Description", DeclarationKind::Parameter),
            ("@required {Type,Limit} Objectspace Description", DeclarationKind::Parameter),
            ("@optional {Type,Limit} Objectspace Description", DeclarationKind::Parameter),
            ("@return {Type,Limit} Objectspace Description", DeclarationKind::Return),
            ("@success {Type,Limit} Objectspace Description", DeclarationKind::Return),
            ("@failure {Type,Limit} Objectspace Description", DeclarationKind::Return),
            ("@property {Type} Objectspace", DeclarationKind::Property),
        ];

        for (line, expected) in cases {
            assert_eq!(classify(line).unwrap(), expected, "line: {}", line);
        }
    }

    #[test]
    fn test_classify_behind_comment_syntax() {
        assert_eq!(classify(" * @name Get User").unwrap(), DeclarationKind::Name);
        assert_eq!(classify("// @uri /users").unwrap(), DeclarationKind::Uri);
        assert_eq!(classify("#\t@ref /Users/Get").unwrap(), DeclarationKind::Ref);
    }

    #[test]
    fn test_classify_missing_declaration() {
        let err = classify(" * just a comment").unwrap_err();
        assert!(matches!(err, AtozError::MalformedDeclaration { .. }));
    }

    #[test]
    fn test_classify_unknown_declaration() {
        let err = classify("@returns {String} x").unwrap_err();
        match err {
            AtozError::UnknownDeclaration { token, .. } => assert_eq!(token, "@returns"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_classify_forward_reference_token() {
        assert_eq!(
            classify("@#/Objects/User# user").unwrap(),
            DeclarationKind::ForwardReference("#/Objects/User#".to_string())
        );
        assert!(classify("@#half").is_err());
        assert!(classify("@#").is_err());
    }

    #[test]
    fn test_flag_variants() {
        assert_eq!(flag("@required {String} a"), Some(Flag::Required));
        assert_eq!(flag("@optional {String} a"), Some(Flag::Optional));
        assert_eq!(flag("@success {String} a"), Some(Flag::Success));
        assert_eq!(flag("@failure {String} a"), Some(Flag::Failure));
        assert_eq!(flag("@parameter {String} a"), None);
        assert_eq!(flag("@property {String} a"), None);
        assert_eq!(flag("no declaration"), None);
    }

    #[test]
    fn test_extract_string() {
        assert_eq!(extract_string("@ref /Defs/Authorization").unwrap(), "/Defs/Authorization");
        assert_eq!(
            extract_string(" * @description This is a really short description. ").unwrap(),
            "This is a really short description."
        );
        assert_eq!(extract_string("@include /Some/Path/To/Something").unwrap(), "/Some/Path/To/Something");
    }

    #[test]
    fn test_extract_string_missing_value() {
        assert!(matches!(extract_string("@include"), Err(AtozError::MissingValue { .. })));
        assert!(matches!(extract_string("@include   "), Err(AtozError::MissingValue { .. })));
    }

    #[test]
    fn test_extract_typed_integer() {
        let decl = extract_typed("@required {Integer} Some.Integer This is an integer.").unwrap();
        assert_eq!(decl.type_tag, TypeTag::Primitive(PrimitiveType::Integer));
        assert_eq!(decl.type_tag.limit(), -1);
        assert_eq!(decl.namespace, "some.integer");
        assert_eq!(decl.description, "This is an integer.");
    }

    #[test]
    fn test_extract_typed_default_limits() {
        for (line, name, limit) in [
            ("@parameter {Decimal} a", "decimal", 0),
            ("@parameter {STRING} a", "string", 0),
            ("@parameter {Array} a", "array", 0),
            ("@parameter {Boolean} a", "boolean", -1),
            ("@parameter {Object} a", "object", -1),
        ] {
            let decl = extract_typed(line).unwrap();
            assert_eq!(decl.type_tag.name(), name);
            assert_eq!(decl.type_tag.limit(), limit);
        }
    }

    #[test]
    fn test_extract_typed_explicit_limit() {
        let decl = extract_typed("@optional {String,255} user.name The name.").unwrap();
        assert_eq!(decl.type_tag, TypeTag::Limited(PrimitiveType::String, 255));
        assert_eq!(decl.flag, Some(Flag::Optional));
    }

    #[test]
    fn test_extract_typed_limit_not_allowed() {
        for line in [
            "@required {Integer,0} Some.Integer This is an integer.",
            "@required {Boolean,1} flag",
            "@required {Object,10} user",
        ] {
            assert!(
                matches!(extract_typed(line), Err(AtozError::LimitNotAllowed { .. })),
                "line: {}",
                line
            );
        }
    }

    #[test]
    fn test_extract_typed_invalid_limit() {
        for line in [
            "@required {String,abc} name",
            "@required {String,-4} name",
            "@required {String,1,2} name",
        ] {
            assert!(
                matches!(extract_typed(line), Err(AtozError::InvalidLimit { .. })),
                "line: {}",
                line
            );
        }
    }

    #[test]
    fn test_extract_typed_missing_type_tag() {
        let err = extract_typed("@required Integer Some.Integer This is an integer.").unwrap_err();
        assert!(matches!(err, AtozError::MissingTypeTag { .. }));
        assert!(err.to_string().contains("Some.Integer"));
    }

    #[test]
    fn test_extract_typed_invalid_type() {
        match extract_typed("@required {BLARG} Some.Fake.Type This should error.") {
            Err(AtozError::InvalidType { type_name, .. }) => assert_eq!(type_name, "blarg"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_extract_typed_missing_namespace() {
        assert!(matches!(
            extract_typed("@return {String}"),
            Err(AtozError::MissingNamespace { .. })
        ));
    }

    #[test]
    fn test_extract_typed_forward_reference() {
        let decl = extract_typed("@success {#/MyApp/User#} user The user.").unwrap();
        assert_eq!(decl.type_tag, TypeTag::ForwardReference("#/MyApp/User#".to_string()));
        assert_eq!(decl.type_tag.name(), "#/MyApp/User#");
        assert_eq!(decl.type_tag.limit(), -1);

        assert!(matches!(
            extract_typed("@success {#/MyApp/User#,3} user"),
            Err(AtozError::LimitNotAllowed { .. })
        ));
    }

    #[test]
    fn test_extract_typed_empty_description() {
        let decl = extract_typed("@property {Boolean} active").unwrap();
        assert_eq!(decl.description, "");
    }

    #[test]
    fn test_type_tag_round_trip() {
        for line in [
            "@property {String,32} a",
            "@property {decimal} a",
            "@property {Integer} a",
            "@property {#/Objects/Thing#} a",
        ] {
            let tag = extract_typed(line).unwrap().type_tag;
            let rendered = format!("@property {} a", tag);
            assert_eq!(extract_typed(&rendered).unwrap().type_tag, tag);
        }
    }

    #[test]
    fn test_type_table_matches_variants() {
        for (name, ty, rule) in TYPE_TABLE {
            assert_eq!(ty.name(), *name);
            assert_eq!(ty.limit_rule(), *rule);
            assert_eq!(PrimitiveType::from_name(name), Some(*ty));
        }
        assert_eq!(PrimitiveType::from_name("Integer"), None);
    }

    #[test]
    fn test_group_marker() {
        assert_eq!(group_marker("/* ---ATOZDEF--- */").unwrap(), GroupKind::Fragment);
        assert_eq!(group_marker(" * ---ATOZAPI---").unwrap(), GroupKind::Action);
        assert_eq!(group_marker("# ---ATOZOBJ---").unwrap(), GroupKind::Object);
        assert!(matches!(
            group_marker(" * ---ATOZEND---"),
            Err(AtozError::NoGroupMarker { .. })
        ));
        assert!(is_end_marker(" * ---ATOZEND---"));
        assert!(is_marker("---ATOZOBJ---"));
        assert!(!is_marker("@name x"));
    }
}
