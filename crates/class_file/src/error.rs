use thiserror::Error;

use crate::{constant_pool::CpKind, view::AnnotationTarget};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassFileError {
    #[error(transparent)]
    UnexpectedEnd(#[from] UnexpectedEnd),
    #[error("Invalid magic identifier: 0x{0:X}")]
    InvalidMagicIdentifier(u32),
    #[error("Unsupported major version {major} (expected at most {max})")]
    UnsupportedMajorVersion { major: u16, max: u16 },
    #[error("Constant pool count is 0")]
    EmptyConstantPool,
    #[error("Invalid cp info tag: {0}")]
    InvalidCpInfoTag(u8),
    #[error("Invalid modified UTF-8 text at offset {offset}")]
    InvalidUtf8 { offset: usize },
    #[error(transparent)]
    ConstantPool(#[from] ConstantPoolError),
    #[error("Attribute {attribute} declares {declared} bytes but {consumed} were consumed")]
    AttributeLengthMismatch {
        attribute: String,
        declared: usize,
        consumed: usize,
    },
    #[error(transparent)]
    AnnotationDecode(#[from] AnnotationDecodeError),
    #[error("No such annotation target: {0:?}")]
    NoSuchTarget(AnnotationTarget),
    #[error("Invalid descriptor: {0:?}")]
    InvalidDescriptor(String),
    #[error("{0} trailing bytes after the class attributes")]
    TrailingBytes(usize),
}

/// A read ran past the end of the buffer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Unexpected end of input at offset {offset} ({wanted} bytes wanted)")]
pub struct UnexpectedEnd {
    pub offset: usize,
    pub wanted: usize,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantPoolError {
    #[error("Invalid constant pool index: {0}")]
    InvalidIndex(u16),
    #[error("Expected {expected} at constant pool index {index}, found {found}")]
    TypeMismatch {
        index: u16,
        expected: CpKind,
        found: CpKind,
    },
    #[error("Eight byte constant at index {0} runs past the end of the pool")]
    WideEntryAtEnd(u16),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotationDecodeError {
    #[error("Malformed element value tag: 0x{0:02X}")]
    MalformedTag(u8),
    #[error("Failed to resolve annotation constant: {0}")]
    PoolResolutionFailed(#[from] ConstantPoolError),
    #[error("Annotation data is truncated")]
    TruncatedInput,
    #[error("Element values nested deeper than {0} levels")]
    NestingTooDeep(usize),
}

impl From<UnexpectedEnd> for AnnotationDecodeError {
    fn from(_: UnexpectedEnd) -> Self {
        AnnotationDecodeError::TruncatedInput
    }
}
