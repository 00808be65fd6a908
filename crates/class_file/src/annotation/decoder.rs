use log::trace;

use crate::{
    annotation::{AnnotationInfo, ElementValue, ElementValuePair, Primitive},
    attributes::{Attribute, AttributeKind},
    error::AnnotationDecodeError,
    reader::Reader,
    ClassFileError, ConstantPool, Result,
};

type DecodeResult<T> = std::result::Result<T, AnnotationDecodeError>;

/// A decoded annotation-bearing attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationAttribute {
    /// `Runtime(In)VisibleAnnotations`.
    Annotations(Vec<AnnotationInfo>),
    /// `Runtime(In)VisibleParameterAnnotations`, one list per parameter.
    ParameterAnnotations(Vec<Vec<AnnotationInfo>>),
    AnnotationDefault(ElementValue),
    /// Not annotation data.
    Opaque,
}

/// Decodes `attribute`, dispatching on its name.
///
/// The whole payload must be consumed; leftover bytes are reported as
/// [`ClassFileError::AttributeLengthMismatch`].
pub fn decode_attribute(
    attribute: &Attribute,
    pool: &ConstantPool,
    max_depth: usize,
) -> Result<AnnotationAttribute> {
    let mut decoder = Decoder::new(attribute.info, pool, max_depth);

    let decoded = match attribute.kind() {
        AttributeKind::RuntimeVisibleAnnotations | AttributeKind::RuntimeInvisibleAnnotations => {
            AnnotationAttribute::Annotations(decoder.annotations()?)
        }
        AttributeKind::RuntimeVisibleParameterAnnotations
        | AttributeKind::RuntimeInvisibleParameterAnnotations => {
            AnnotationAttribute::ParameterAnnotations(decoder.parameter_annotations()?)
        }
        AttributeKind::AnnotationDefault => {
            AnnotationAttribute::AnnotationDefault(decoder.element_value(0)?)
        }
        AttributeKind::Record | AttributeKind::Opaque => return Ok(AnnotationAttribute::Opaque),
    };

    decoder.finish(attribute)?;
    trace!("decoded {} ({} bytes)", attribute.name, attribute.len());

    Ok(decoded)
}

pub(crate) fn decode_annotations(
    attribute: &Attribute,
    pool: &ConstantPool,
    max_depth: usize,
) -> Result<Vec<AnnotationInfo>> {
    match decode_attribute(attribute, pool, max_depth)? {
        AnnotationAttribute::Annotations(annotations) => Ok(annotations),
        _ => Ok(Vec::new()),
    }
}

pub(crate) fn decode_parameter_annotations(
    attribute: &Attribute,
    pool: &ConstantPool,
    max_depth: usize,
) -> Result<Vec<Vec<AnnotationInfo>>> {
    match decode_attribute(attribute, pool, max_depth)? {
        AnnotationAttribute::ParameterAnnotations(parameters) => Ok(parameters),
        _ => Ok(Vec::new()),
    }
}

pub(crate) fn decode_annotation_default(
    attribute: &Attribute,
    pool: &ConstantPool,
    max_depth: usize,
) -> Result<Option<ElementValue>> {
    match decode_attribute(attribute, pool, max_depth)? {
        AnnotationAttribute::AnnotationDefault(value) => Ok(Some(value)),
        _ => Ok(None),
    }
}

struct Decoder<'p, 'a> {
    r: Reader<'a>,
    pool: &'p ConstantPool,
    max_depth: usize,
}

impl<'p, 'a> Decoder<'p, 'a> {
    fn new(info: &'a [u8], pool: &'p ConstantPool, max_depth: usize) -> Self {
        Self {
            r: Reader::new(info),
            pool,
            max_depth,
        }
    }

    fn finish(self, attribute: &Attribute) -> Result<()> {
        if !self.r.is_empty() {
            return Err(ClassFileError::AttributeLengthMismatch {
                attribute: attribute.name.clone(),
                declared: attribute.len(),
                consumed: self.r.position(),
            });
        }

        Ok(())
    }

    fn annotations(&mut self) -> DecodeResult<Vec<AnnotationInfo>> {
        let num_annotations = self.r.read_u16()?;

        (0..num_annotations)
            .map(|_| self.annotation(0))
            .collect()
    }

    fn parameter_annotations(&mut self) -> DecodeResult<Vec<Vec<AnnotationInfo>>> {
        let num_parameters = self.r.read_u8()?;

        (0..num_parameters)
            .map(|_| self.annotations())
            .collect()
    }

    fn annotation(&mut self, depth: usize) -> DecodeResult<AnnotationInfo> {
        let type_index = self.r.read_u16()?;
        let type_descriptor = self.pool.utf8(type_index)?.to_owned();
        let num_element_value_pairs = self.r.read_u16()?;

        let elements = (0..num_element_value_pairs)
            .map(|_| self.element_value_pair(depth))
            .collect::<DecodeResult<Vec<_>>>()?;

        Ok(AnnotationInfo {
            type_index,
            type_descriptor,
            elements,
        })
    }

    fn element_value_pair(&mut self, depth: usize) -> DecodeResult<ElementValuePair> {
        let name_index = self.r.read_u16()?;
        let name = self.pool.utf8(name_index)?.to_owned();
        let value = self.element_value(depth + 1)?;

        Ok(ElementValuePair {
            name_index,
            name,
            value,
        })
    }

    // https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.7.16.1
    fn element_value(&mut self, depth: usize) -> DecodeResult<ElementValue> {
        if depth > self.max_depth {
            return Err(AnnotationDecodeError::NestingTooDeep(self.max_depth));
        }

        let tag = self.r.read_u8()?;
        let value = match tag {
            b'B' => ElementValue::Primitive(Primitive::Byte(self.integer()? as i8)),
            b'C' => ElementValue::Primitive(Primitive::Char(self.integer()? as u16)),
            b'D' => {
                let index = self.r.read_u16()?;
                ElementValue::Primitive(Primitive::Double(self.pool.double(index)?))
            }
            b'F' => {
                let index = self.r.read_u16()?;
                ElementValue::Primitive(Primitive::Float(self.pool.float(index)?))
            }
            b'I' => ElementValue::Primitive(Primitive::Int(self.integer()?)),
            b'J' => {
                let index = self.r.read_u16()?;
                ElementValue::Primitive(Primitive::Long(self.pool.long(index)?))
            }
            b'S' => ElementValue::Primitive(Primitive::Short(self.integer()? as i16)),
            b'Z' => ElementValue::Primitive(Primitive::Boolean(self.integer()? != 0)),
            b's' => ElementValue::Text(self.utf8()?),
            b'e' => {
                let type_descriptor = self.utf8()?;
                let const_name = self.utf8()?;
                ElementValue::Enum {
                    type_descriptor,
                    const_name,
                }
            }
            b'c' => ElementValue::Class(self.utf8()?),
            b'@' => ElementValue::Annotation(self.annotation(depth)?),
            b'[' => {
                let num_values = self.r.read_u16()?;
                let values = (0..num_values)
                    .map(|_| self.element_value(depth + 1))
                    .collect::<DecodeResult<Vec<_>>>()?;
                ElementValue::Array(values)
            }
            _ => return Err(AnnotationDecodeError::MalformedTag(tag)),
        };

        Ok(value)
    }

    fn integer(&mut self) -> DecodeResult<i32> {
        let index = self.r.read_u16()?;
        Ok(self.pool.integer(index)?)
    }

    fn utf8(&mut self) -> DecodeResult<String> {
        let index = self.r.read_u16()?;
        Ok(self.pool.utf8(index)?.to_owned())
    }
}
