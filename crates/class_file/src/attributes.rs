use std::fmt;

use crate::view::Retention;

/// One `attribute_info` record. The payload is a view into the class file
/// buffer; nothing is decoded until a caller asks for it.
#[derive(Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name_index: u16,
    pub name: String,
    pub info: &'a [u8],
}

impl fmt::Debug for Attribute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("info", &format!("({} bytes)", self.info.len()))
            .finish()
    }
}

impl Attribute<'_> {
    pub fn kind(&self) -> AttributeKind {
        AttributeKind::from_name(&self.name)
    }

    /// The declared `attribute_length`.
    pub fn len(&self) -> usize {
        self.info.len()
    }

    pub fn is_empty(&self) -> bool {
        self.info.is_empty()
    }
}

/// The attributes this crate knows how to decode. Everything else, including
/// `Code`, debug tables and type annotations, stays [`AttributeKind::Opaque`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    RuntimeVisibleAnnotations,
    RuntimeInvisibleAnnotations,
    RuntimeVisibleParameterAnnotations,
    RuntimeInvisibleParameterAnnotations,
    AnnotationDefault,
    Record,
    Opaque,
}

impl AttributeKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "RuntimeVisibleAnnotations" => AttributeKind::RuntimeVisibleAnnotations,
            "RuntimeInvisibleAnnotations" => AttributeKind::RuntimeInvisibleAnnotations,
            "RuntimeVisibleParameterAnnotations" => {
                AttributeKind::RuntimeVisibleParameterAnnotations
            }
            "RuntimeInvisibleParameterAnnotations" => {
                AttributeKind::RuntimeInvisibleParameterAnnotations
            }
            "AnnotationDefault" => AttributeKind::AnnotationDefault,
            "Record" => AttributeKind::Record,
            _ => AttributeKind::Opaque,
        }
    }

    pub fn annotations(retention: Retention) -> Self {
        match retention {
            Retention::VisibleAtRuntime => AttributeKind::RuntimeVisibleAnnotations,
            Retention::SourceOnly => AttributeKind::RuntimeInvisibleAnnotations,
        }
    }

    pub fn parameter_annotations(retention: Retention) -> Self {
        match retention {
            Retention::VisibleAtRuntime => AttributeKind::RuntimeVisibleParameterAnnotations,
            Retention::SourceOnly => AttributeKind::RuntimeInvisibleParameterAnnotations,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Attributes<'a>(pub Vec<Attribute<'a>>);

impl<'a> Attributes<'a> {
    pub fn find_by_name(&self, name: &str) -> Option<&Attribute<'a>> {
        self.0.iter().find(|a| a.name == name)
    }

    /// First attribute of the given kind. [`AttributeKind::Opaque`] never matches.
    pub fn find(&self, kind: AttributeKind) -> Option<&Attribute<'a>> {
        if kind == AttributeKind::Opaque {
            return None;
        }

        self.0.iter().find(|a| a.kind() == kind)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute<'a>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'c, 'a> IntoIterator for &'c Attributes<'a> {
    type Item = &'c Attribute<'a>;
    type IntoIter = std::slice::Iter<'c, Attribute<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
