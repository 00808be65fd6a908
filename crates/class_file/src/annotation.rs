//! The decoded annotation model.
//!
//! Everything here is owned: once an attribute has been decoded the result no
//! longer refers to the class file buffer or its constant pool.

pub(crate) mod decoder;

use std::fmt;

use crate::descriptor::{java_name, parse_field_descriptor, parse_return_descriptor};

pub use decoder::{decode_attribute, AnnotationAttribute};

/// One `annotation` structure.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationInfo {
    /// Constant pool handle of the type descriptor.
    pub type_index: u16,
    /// Field descriptor of the annotation interface, e.g. `Ljava/lang/Deprecated;`.
    pub type_descriptor: String,
    /// Element-value pairs in the order they appear in the class file.
    pub elements: Vec<ElementValuePair>,
}

impl AnnotationInfo {
    /// The annotation interface as a Java source name, e.g. `java.lang.Deprecated`.
    pub fn type_name(&self) -> String {
        descriptor_to_java(&self.type_descriptor)
    }

    pub fn get(&self, name: &str) -> Option<&ElementValue> {
        self.elements
            .iter()
            .find(|pair| pair.name == name)
            .map(|pair| &pair.value)
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &ElementValue)> {
        self.elements
            .iter()
            .map(|pair| (pair.name.as_str(), &pair.value))
    }
}

impl fmt::Display for AnnotationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.type_name())?;

        match self.elements.as_slice() {
            [] => Ok(()),
            [pair] if pair.name == "value" => write!(f, "({})", pair.value),
            elements => {
                f.write_str("(")?;
                for (i, pair) in elements.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}", pair.name, pair.value)?;
                }
                f.write_str(")")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementValuePair {
    pub name_index: u16,
    pub name: String,
    pub value: ElementValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    Primitive(Primitive),
    Text(String),
    Enum {
        type_descriptor: String,
        const_name: String,
    },
    /// A class literal; the descriptor is kept as written and never resolved.
    Class(String),
    Annotation(AnnotationInfo),
    Array(Vec<ElementValue>),
}

impl ElementValue {
    pub fn as_primitive(&self) -> Option<Primitive> {
        match *self {
            ElementValue::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ElementValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_annotation(&self) -> Option<&AnnotationInfo> {
        match self {
            ElementValue::Annotation(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ElementValue]> {
        match self {
            ElementValue::Array(values) => Some(values),
            _ => None,
        }
    }
}

impl fmt::Display for ElementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementValue::Primitive(p) => write!(f, "{}", p),
            ElementValue::Text(s) => write!(f, "{:?}", s),
            ElementValue::Enum {
                type_descriptor,
                const_name,
            } => write!(f, "{}.{}", descriptor_to_java(type_descriptor), const_name),
            ElementValue::Class(descriptor) => match parse_return_descriptor(descriptor) {
                Ok(Some(field_type)) => write!(f, "{}.class", field_type),
                Ok(None) => f.write_str("void.class"),
                Err(_) => write!(f, "{}.class", descriptor),
            },
            ElementValue::Annotation(a) => write!(f, "{}", a),
            ElementValue::Array(values) => {
                f.write_str("{")?;
                for (i, value) in values.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Values of the primitive element value tags `B C D F I J S Z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Boolean(bool),
    Byte(i8),
    /// A UTF-16 code unit.
    Char(u16),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Primitive::Boolean(b) => write!(f, "{}", b),
            Primitive::Byte(n) => write!(f, "{}", n),
            Primitive::Char(c) => match char::from_u32(c as u32) {
                Some(ch) => write!(f, "{:?}", ch),
                None => write!(f, "'\\u{:04x}'", c),
            },
            Primitive::Short(n) => write!(f, "{}", n),
            Primitive::Int(n) => write!(f, "{}", n),
            Primitive::Long(n) => write!(f, "{}L", n),
            Primitive::Float(n) => match non_finite(n as f64) {
                Some(constant) => write!(f, "Float.{}", constant),
                None => write!(f, "{:?}f", n),
            },
            Primitive::Double(n) => match non_finite(n) {
                Some(constant) => write!(f, "Double.{}", constant),
                None => write!(f, "{:?}", n),
            },
        }
    }
}

fn non_finite(n: f64) -> Option<&'static str> {
    if n.is_nan() {
        Some("NaN")
    } else if n == f64::INFINITY {
        Some("POSITIVE_INFINITY")
    } else if n == f64::NEG_INFINITY {
        Some("NEGATIVE_INFINITY")
    } else {
        None
    }
}

fn descriptor_to_java(descriptor: &str) -> String {
    parse_field_descriptor(descriptor)
        .map(|field_type| field_type.to_string())
        .unwrap_or_else(|_| java_name(descriptor))
}
