use crate::{
    attributes::Attributes,
    descriptor::{parse_method_descriptor, FieldType},
    parser::Parser,
    view::AnnotationView,
    AccessFlags, ConstantPool, ParseOptions, Result,
};

/// A parsed class file.
///
/// Attribute payloads are borrowed from the buffer the class file was parsed
/// from; annotation attributes are only decoded when queried through
/// [`ClassFile::annotations`].
#[derive(Debug, Clone)]
pub struct ClassFile<'a> {
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool: ConstantPool,
    pub access_flags: AccessFlags,
    pub this_class: u16,
    pub super_class: u16,
    pub interfaces: Vec<u16>,
    pub fields: Vec<FieldInfo<'a>>,
    pub methods: Vec<MethodInfo<'a>>,
    pub attributes: Attributes<'a>,
    /// Components of the `Record` attribute, empty for other classes. A
    /// malformed `Record` payload only fails the component queries.
    pub components: Result<Vec<RecordComponentInfo<'a>>>,
    pub(crate) options: ParseOptions,
}

impl<'a> ClassFile<'a> {
    pub fn parse(bytes: &'a [u8]) -> Result<ClassFile<'a>> {
        Self::parse_with(bytes, &ParseOptions::default())
    }

    pub fn parse_with(bytes: &'a [u8], options: &ParseOptions) -> Result<ClassFile<'a>> {
        Parser::new(bytes, *options).parse()
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Annotation queries over this class file.
    pub fn annotations(&self) -> AnnotationView<'_, 'a> {
        AnnotationView::new(self)
    }

    pub fn class_name(&self) -> Result<&str> {
        // The value of the this_class item must be a valid index into the constant_pool table.
        // The constant_pool entry at that index must be a CONSTANT_Class_info structure (§4.4.1)
        // representing the class or interface defined by this class file.

        Ok(self.constant_pool.class_name(self.this_class)?)
    }

    pub fn super_class(&self) -> Result<Option<&str>> {
        // If the value of the super_class item is zero, then this class file must represent the class Object,
        // the only class or interface without a direct superclass.
        if self.super_class == 0 {
            return Ok(None);
        }

        Ok(Some(self.constant_pool.class_name(self.super_class)?))
    }

    pub fn record_components(&self) -> Result<&[RecordComponentInfo<'a>]> {
        self.components.as_deref().map_err(|e| e.clone())
    }

    pub fn interface_names(&self) -> Result<Vec<&str>> {
        self.interfaces
            .iter()
            .map(|&index| Ok(self.constant_pool.class_name(index)?))
            .collect()
    }

    pub fn field_name(&self, field: &FieldInfo) -> Result<&str> {
        Ok(self.constant_pool.utf8(field.name_index)?)
    }

    pub fn field_descriptor(&self, field: &FieldInfo) -> Result<&str> {
        Ok(self.constant_pool.utf8(field.descriptor_index)?)
    }

    pub fn method_name(&self, method: &MethodInfo) -> Result<&str> {
        Ok(self.constant_pool.utf8(method.name_index)?)
    }

    pub fn method_descriptor(&self, method: &MethodInfo) -> Result<&str> {
        Ok(self.constant_pool.utf8(method.descriptor_index)?)
    }

    pub fn component_name(&self, component: &RecordComponentInfo) -> Result<&str> {
        Ok(self.constant_pool.utf8(component.name_index)?)
    }

    pub fn component_descriptor(&self, component: &RecordComponentInfo) -> Result<&str> {
        Ok(self.constant_pool.utf8(component.descriptor_index)?)
    }

    /// Index of the first field called `name`.
    pub fn find_field(&self, name: &str) -> Option<u16> {
        self.fields
            .iter()
            .position(|field| self.field_name(field).map_or(false, |n| n == name))
            .map(|i| i as u16)
    }

    /// Index of the method called `name` whose parameter types are `parameters`.
    pub fn find_method(&self, name: &str, parameters: &[FieldType]) -> Result<Option<u16>> {
        for (i, method) in self.methods.iter().enumerate() {
            if self.method_name(method)? != name {
                continue;
            }

            let descriptor = parse_method_descriptor(self.method_descriptor(method)?)?;
            if descriptor.parameters == parameters {
                return Ok(Some(i as u16));
            }
        }

        Ok(None)
    }
}

#[derive(Debug, Clone)]
pub struct FieldInfo<'a> {
    pub access_flags: AccessFlags,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Attributes<'a>,
}

#[derive(Debug, Clone)]
pub struct MethodInfo<'a> {
    pub access_flags: AccessFlags,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Attributes<'a>,
}

#[derive(Debug, Clone)]
pub struct RecordComponentInfo<'a> {
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Attributes<'a>,
}
