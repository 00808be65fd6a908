// https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html

mod access_flags;
pub mod annotation;
pub mod attributes;
mod class_file;
pub mod constant_pool;
pub mod descriptor;
mod error;
mod options;
mod parser;
pub mod reader;
pub mod view;

pub use self::class_file::{ClassFile, FieldInfo, MethodInfo, RecordComponentInfo};
pub use access_flags::AccessFlags;
pub use annotation::{AnnotationInfo, ElementValue, ElementValuePair, Primitive};
pub use constant_pool::ConstantPool;
pub use error::{AnnotationDecodeError, ClassFileError, ConstantPoolError, UnexpectedEnd};
pub use options::{ParseOptions, DEFAULT_MAX_NESTING_DEPTH, LATEST_MAJOR_VERSION};
pub use view::{AnnotatedElementView, AnnotationTarget, AnnotationView, Retention};

pub type Result<T, E = ClassFileError> = std::result::Result<T, E>;
