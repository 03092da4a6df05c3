//! Error taxonomy for document ingestion and skinning
//!
//! Three failure classes come out of this crate: malformed text
//! ([`ParseError`]), well-formed text with the wrong shape ([`SchemaError`]),
//! and inputs that are individually fine but inconsistent with each other
//! ([`ValidationError`]). All of them abort the whole operation.

use std::fmt;

/// Result alias for fallible core operations
pub type SkinResult<T> = Result<T, SkinError>;

/// What went wrong while tokenizing a document
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("expected {expected}, found '{found}'")]
    Expected { expected: &'static str, found: char },

    #[error("unterminated string")]
    UnterminatedString,

    #[error("unsupported escape sequence '\\{0}'")]
    UnsupportedEscape(char),

    #[error("unrecognized literal '{0}'")]
    InvalidLiteral(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("unexpected trailing characters after document")]
    TrailingCharacters,

    #[error("nesting deeper than {0} levels")]
    NestingTooDeep(usize),
}

/// Parse failure with the byte offset it was detected at
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("parse error at byte {position}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, position: usize) -> Self {
        Self { kind, position }
    }
}

/// Location inside a document, used to make schema errors actionable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Root,
    Vertex(usize),
    Influence { vertex: usize, slot: usize },
    Bone(usize),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Root => write!(f, "document root"),
            Location::Vertex(v) => write!(f, "vertex {v}"),
            Location::Influence { vertex, slot } => write!(f, "vertex {vertex} slot {slot}"),
            Location::Bone(b) => write!(f, "bone {b}"),
        }
    }
}

/// Document parsed, but does not have the expected structure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("{at}: none of the keys {expected:?} present")]
    MissingKey {
        at: Location,
        expected: &'static [&'static str],
    },

    #[error("{at}: expected {expected}, found {found}")]
    WrongType {
        at: Location,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{at}: matrix must have exactly 16 numbers, found {found}")]
    MatrixLength { at: Location, found: usize },

    #[error("{at}: bone index {value} does not fit the signed 8-bit range")]
    IndexOutOfRange { at: Location, value: f64 },

    #[error("{at}: non-finite number {value}")]
    NonFiniteNumber { at: Location, value: f64 },
}

/// Inputs are inconsistent with each other
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("vertex count mismatch: mesh has {mesh} vertices, bone weights cover {weights}")]
    VertexCountMismatch { mesh: usize, weights: usize },

    #[error(
        "bone count mismatch: inverse bind pose has {inverse_bind} bones, new pose has {new_pose}"
    )]
    BoneCountMismatch { inverse_bind: usize, new_pose: usize },

    #[error("vertex {vertex} references bone {bone}, but only {bone_count} bones exist")]
    BoneIndexOutOfRange {
        vertex: usize,
        bone: i8,
        bone_count: usize,
    },

    #[error("triangle {triangle} references vertex {index}, but mesh has {vertex_count} vertices")]
    TriangleIndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("skeleton has {bones} bones, maximum addressable is {max}")]
    TooManyBones { bones: usize, max: usize },
}

/// Coarse classification of a [`SkinError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Schema,
    Validation,
}

/// Any failure produced by this crate
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkinError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl SkinError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SkinError::Parse(_) => ErrorKind::Parse,
            SkinError::Schema(_) => ErrorKind::Schema,
            SkinError::Validation(_) => ErrorKind::Validation,
        }
    }
}
