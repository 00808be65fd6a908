//! Read-only annotation queries keyed by where the annotations were declared.

use std::collections::{btree_map, BTreeMap};

use log::warn;

use crate::{
    annotation::{
        decoder::{decode_annotation_default, decode_annotations, decode_parameter_annotations},
        AnnotationInfo, ElementValue,
    },
    attributes::{AttributeKind, Attributes},
    ClassFile, ClassFileError, Result,
};

/// A structural location that can carry declaration annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnnotationTarget {
    Type,
    Field(u16),
    Method(u16),
    Parameter { method: u16, parameter: u8 },
    Component(u16),
}

/// Which attribute family an annotation was stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Retention {
    /// `Runtime*Annotations` (`RetentionPolicy.RUNTIME`).
    VisibleAtRuntime,
    /// `RuntimeInvisible*Annotations` (`RetentionPolicy.CLASS`).
    SourceOnly,
}

/// Query facade over one parsed class file.
///
/// Attribute tables were scanned when the class file was parsed; annotation
/// payloads are decoded on every call, only for the target asked for.
#[derive(Debug, Clone, Copy)]
pub struct AnnotationView<'c, 'a> {
    class: &'c ClassFile<'a>,
}

impl<'c, 'a> AnnotationView<'c, 'a> {
    pub(crate) fn new(class: &'c ClassFile<'a>) -> Self {
        Self { class }
    }

    pub fn for_type(&self, retention: Retention) -> Result<Vec<AnnotationInfo>> {
        self.annotations(&self.class.attributes, retention)
    }

    pub fn for_field(&self, index: u16, retention: Retention) -> Result<Vec<AnnotationInfo>> {
        let field = self
            .class
            .fields
            .get(index as usize)
            .ok_or(ClassFileError::NoSuchTarget(AnnotationTarget::Field(index)))?;

        self.annotations(&field.attributes, retention)
    }

    pub fn for_method(&self, index: u16, retention: Retention) -> Result<Vec<AnnotationInfo>> {
        let attributes = self.method_attributes(index, AnnotationTarget::Method(index))?;

        self.annotations(attributes, retention)
    }

    /// Annotations on one formal parameter. A parameter past the end of the
    /// attribute's table has no annotations.
    pub fn for_parameter(
        &self,
        method: u16,
        parameter: u8,
        retention: Retention,
    ) -> Result<Vec<AnnotationInfo>> {
        let mut parameters = self.parameters(method, parameter, retention)?;

        if (parameter as usize) < parameters.len() {
            Ok(parameters.swap_remove(parameter as usize))
        } else {
            Ok(Vec::new())
        }
    }

    /// Number of parameters listed in the method's parameter annotation
    /// attribute, 0 when there is none. This may be less than the number of
    /// parameters in the descriptor.
    pub fn parameter_count(&self, method: u16, retention: Retention) -> Result<u8> {
        Ok(self.parameters(method, 0, retention)?.len() as u8)
    }

    pub fn for_component(&self, index: u16, retention: Retention) -> Result<Vec<AnnotationInfo>> {
        let component = self
            .class
            .record_components()?
            .get(index as usize)
            .ok_or(ClassFileError::NoSuchTarget(AnnotationTarget::Component(index)))?;

        self.annotations(&component.attributes, retention)
    }

    /// The default value of an annotation interface element.
    pub fn annotation_default(&self, method: u16) -> Result<Option<ElementValue>> {
        let attributes = self.method_attributes(method, AnnotationTarget::Method(method))?;

        match attributes.find(AttributeKind::AnnotationDefault) {
            Some(attribute) => decode_annotation_default(
                attribute,
                &self.class.constant_pool,
                self.class.options.max_nesting_depth,
            ),
            None => Ok(None),
        }
    }

    pub fn for_target(
        &self,
        target: AnnotationTarget,
        retention: Retention,
    ) -> Result<Vec<AnnotationInfo>> {
        match target {
            AnnotationTarget::Type => self.for_type(retention),
            AnnotationTarget::Field(index) => self.for_field(index, retention),
            AnnotationTarget::Method(index) => self.for_method(index, retention),
            AnnotationTarget::Parameter { method, parameter } => {
                self.for_parameter(method, parameter, retention)
            }
            AnnotationTarget::Component(index) => self.for_component(index, retention),
        }
    }

    pub fn all_visible(&self) -> AnnotatedElementView {
        self.all(Retention::VisibleAtRuntime)
    }

    pub fn all_source_only(&self) -> AnnotatedElementView {
        self.all(Retention::SourceOnly)
    }

    /// Decodes every target that has an annotation attribute for `retention`.
    ///
    /// A target whose attribute fails to decode is kept with its error; the
    /// other targets are unaffected. A failed parameter annotation attribute
    /// is recorded under the method's first parameter, a malformed `Record`
    /// attribute under the first component.
    pub fn all(&self, retention: Retention) -> AnnotatedElementView {
        let kind = AttributeKind::annotations(retention);
        let mut entries = BTreeMap::new();

        let mut record = |target: AnnotationTarget, attributes: &Attributes| {
            if attributes.find(kind).is_some() {
                entries.insert(target, self.annotations(attributes, retention));
            }
        };

        record(AnnotationTarget::Type, &self.class.attributes);
        for (i, field) in self.class.fields.iter().enumerate() {
            record(AnnotationTarget::Field(i as u16), &field.attributes);
        }
        for (i, method) in self.class.methods.iter().enumerate() {
            record(AnnotationTarget::Method(i as u16), &method.attributes);
        }
        if let Ok(components) = &self.class.components {
            for (i, component) in components.iter().enumerate() {
                record(AnnotationTarget::Component(i as u16), &component.attributes);
            }
        }

        for method in 0..self.class.methods.len() as u16 {
            match self.parameters(method, 0, retention) {
                Ok(parameters) => {
                    for (parameter, annotations) in parameters.into_iter().enumerate() {
                        entries.insert(
                            AnnotationTarget::Parameter {
                                method,
                                parameter: parameter as u8,
                            },
                            Ok(annotations),
                        );
                    }
                }
                Err(e) => {
                    entries.insert(
                        AnnotationTarget::Parameter {
                            method,
                            parameter: 0,
                        },
                        Err(e),
                    );
                }
            }
        }

        if let Err(e) = &self.class.components {
            entries.insert(AnnotationTarget::Component(0), Err(e.clone()));
        }

        for (target, e) in entries.iter().filter_map(|(t, r)| r.as_ref().err().map(|e| (t, e))) {
            warn!("failed to decode annotations on {:?}: {}", target, e);
        }

        AnnotatedElementView { retention, entries }
    }

    fn annotations(&self, attributes: &Attributes, retention: Retention) -> Result<Vec<AnnotationInfo>> {
        match attributes.find(AttributeKind::annotations(retention)) {
            Some(attribute) => decode_annotations(
                attribute,
                &self.class.constant_pool,
                self.class.options.max_nesting_depth,
            ),
            None => Ok(Vec::new()),
        }
    }

    fn parameters(
        &self,
        method: u16,
        parameter: u8,
        retention: Retention,
    ) -> Result<Vec<Vec<AnnotationInfo>>> {
        let attributes =
            self.method_attributes(method, AnnotationTarget::Parameter { method, parameter })?;

        match attributes.find(AttributeKind::parameter_annotations(retention)) {
            Some(attribute) => decode_parameter_annotations(
                attribute,
                &self.class.constant_pool,
                self.class.options.max_nesting_depth,
            ),
            None => Ok(Vec::new()),
        }
    }

    fn method_attributes(&self, index: u16, target: AnnotationTarget) -> Result<&'c Attributes<'a>> {
        self.class
            .methods
            .get(index as usize)
            .map(|method| &method.attributes)
            .ok_or(ClassFileError::NoSuchTarget(target))
    }
}

/// Every located target of one retention channel with its decoded annotations
/// or the error that stopped decoding them.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedElementView {
    retention: Retention,
    entries: BTreeMap<AnnotationTarget, Result<Vec<AnnotationInfo>>>,
}

impl AnnotatedElementView {
    pub fn retention(&self) -> Retention {
        self.retention
    }

    pub fn get(&self, target: AnnotationTarget) -> Option<&Result<Vec<AnnotationInfo>>> {
        self.entries.get(&target)
    }

    /// Annotations on `target`; empty when the target has none or failed.
    pub fn annotations(&self, target: AnnotationTarget) -> &[AnnotationInfo] {
        match self.entries.get(&target) {
            Some(Ok(annotations)) => annotations,
            _ => &[],
        }
    }

    pub fn iter(&self) -> btree_map::Iter<'_, AnnotationTarget, Result<Vec<AnnotationInfo>>> {
        self.entries.iter()
    }

    pub fn failures(&self) -> impl Iterator<Item = (AnnotationTarget, &ClassFileError)> {
        self.entries
            .iter()
            .filter_map(|(target, result)| result.as_ref().err().map(|e| (*target, e)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
