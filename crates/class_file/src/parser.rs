use log::{debug, trace};

use crate::{
    attributes::{Attribute, AttributeKind, Attributes},
    class_file::{FieldInfo, MethodInfo, RecordComponentInfo},
    constant_pool::{self, CpInfo},
    error::ConstantPoolError,
    reader::Reader,
    AccessFlags, ClassFile, ClassFileError, ConstantPool, ParseOptions, Result,
};

const MAGIC_IDENTIFIER: u32 = 0xCAFEBABE;

/// Structural pass over a class file: header, constant pool, member tables
/// and attribute tables. Attribute payloads are sliced, not decoded.
pub struct Parser<'a> {
    r: Reader<'a>,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    pub fn new(buf: &'a [u8], options: ParseOptions) -> Self {
        Self {
            r: Reader::new(buf),
            options,
        }
    }

    pub fn parse(mut self) -> Result<ClassFile<'a>> {
        self.parse_magic_identifier()?;
        let (major_version, minor_version) = self.parse_version()?;

        let constant_pool = self.parse_constant_pool()?;
        let access_flags = AccessFlags::from_bits_truncate(self.read_u16()?);
        let this_class = self.read_u16()?;
        let super_class = self.read_u16()?;

        let interfaces_count = self.read_u16()?;
        let interfaces = (0..interfaces_count)
            .map(|_| self.read_u16())
            .collect::<Result<Vec<_>>>()?;

        let fields_count = self.read_u16()?;
        let fields = (0..fields_count)
            .map(|_| self.parse_field_info(&constant_pool))
            .collect::<Result<Vec<_>>>()?;

        let methods_count = self.read_u16()?;
        let methods = (0..methods_count)
            .map(|_| self.parse_method_info(&constant_pool))
            .collect::<Result<Vec<_>>>()?;

        let attributes = self.parse_attributes(&constant_pool)?;

        if !self.r.is_empty() {
            return Err(ClassFileError::TrailingBytes(self.r.remaining()));
        }

        let components = match attributes.find(AttributeKind::Record) {
            Some(record) => self.parse_record(record, &constant_pool),
            None => Ok(Vec::new()),
        };
        if let Err(e) = &components {
            debug!("could not parse the Record attribute: {}", e);
        }

        trace!(
            "parsed class file {}.{}: {} fields, {} methods, {} record components",
            major_version,
            minor_version,
            fields.len(),
            methods.len(),
            components.as_ref().map_or(0, Vec::len)
        );

        Ok(ClassFile {
            minor_version,
            major_version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
            components,
            options: self.options,
        })
    }

    fn parse_field_info(&mut self, constant_pool: &ConstantPool) -> Result<FieldInfo<'a>> {
        let access_flags = AccessFlags::from_bits_truncate(self.read_u16()?);
        let name_index = self.read_u16()?;
        let descriptor_index = self.read_u16()?;
        let attributes = self.parse_attributes(constant_pool)?;

        Ok(FieldInfo {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }

    fn parse_method_info(&mut self, constant_pool: &ConstantPool) -> Result<MethodInfo<'a>> {
        let access_flags = AccessFlags::from_bits_truncate(self.read_u16()?);
        let name_index = self.read_u16()?;
        let descriptor_index = self.read_u16()?;
        let attributes = self.parse_attributes(constant_pool)?;

        Ok(MethodInfo {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }

    // https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.7.30
    fn parse_record(
        &self,
        record: &Attribute<'a>,
        constant_pool: &ConstantPool,
    ) -> Result<Vec<RecordComponentInfo<'a>>> {
        let mut parser = Parser::new(record.info, self.options);

        let components_count = parser.read_u16()?;
        let components = (0..components_count)
            .map(|_| parser.parse_record_component_info(constant_pool))
            .collect::<Result<Vec<_>>>()?;

        if !parser.r.is_empty() {
            return Err(ClassFileError::AttributeLengthMismatch {
                attribute: record.name.clone(),
                declared: record.len(),
                consumed: parser.r.position(),
            });
        }

        Ok(components)
    }

    fn parse_record_component_info(
        &mut self,
        constant_pool: &ConstantPool,
    ) -> Result<RecordComponentInfo<'a>> {
        let name_index = self.read_u16()?;
        let descriptor_index = self.read_u16()?;
        let attributes = self.parse_attributes(constant_pool)?;

        Ok(RecordComponentInfo {
            name_index,
            descriptor_index,
            attributes,
        })
    }

    fn parse_magic_identifier(&mut self) -> Result<()> {
        match self.read_u32()? {
            MAGIC_IDENTIFIER => Ok(()),
            magic_identifier => Err(ClassFileError::InvalidMagicIdentifier(magic_identifier)),
        }
    }

    fn parse_version(&mut self) -> Result<(u16, u16)> {
        let minor = self.read_u16()?;
        let major = self.read_u16()?;

        if major > self.options.max_major_version {
            return Err(ClassFileError::UnsupportedMajorVersion {
                major,
                max: self.options.max_major_version,
            });
        }

        Ok((major, minor))
    }

    fn parse_constant_pool(&mut self) -> Result<ConstantPool> {
        let constant_pool_count = self.read_u16()?;
        if constant_pool_count == 0 {
            return Err(ClassFileError::EmptyConstantPool);
        }

        let mut count = constant_pool_count as usize - 1;
        let mut res = Vec::with_capacity(count);
        while count > 0 {
            let cp_info = self.parse_cp_info()?;
            let slot_size = cp_info.slot_size();
            if slot_size > count {
                return Err(ConstantPoolError::WideEntryAtEnd(res.len() as u16 + 1).into());
            }

            res.push(cp_info);
            (1..slot_size).for_each(|_| res.push(CpInfo::Unusable));

            count -= slot_size;
        }

        trace!("constant pool has {} slots", res.len());
        Ok(ConstantPool::new(res))
    }

    // https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.4
    fn parse_cp_info(&mut self) -> Result<CpInfo> {
        let tag = self.read_u8()?;
        let cp_info = match tag {
            1 => CpInfo::Utf8(self.r.read_short_text()?),
            3 => CpInfo::Integer(self.r.read_i32()?),
            4 => CpInfo::Float(self.r.read_f32()?),
            5 => CpInfo::Long(self.r.read_i64()?),
            6 => CpInfo::Double(self.r.read_f64()?),
            7 => CpInfo::Class(constant_pool::ClassInfo {
                name_index: self.read_u16()?,
            }),
            8 => CpInfo::String {
                string_index: self.read_u16()?,
            },
            9 => CpInfo::FieldRef(self.parse_ref_info()?),
            10 => CpInfo::MethodRef(self.parse_ref_info()?),
            11 => CpInfo::InterfaceMethodRef(self.parse_ref_info()?),
            12 => self.parse_name_and_type_info()?,
            15 => self.parse_method_handle()?,
            16 => CpInfo::MethodType(constant_pool::MethodTypeInfo {
                descriptor_index: self.read_u16()?,
            }),
            17 => CpInfo::Dynamic(self.parse_invoke_dynamic_info()?),
            18 => CpInfo::InvokeDynamic(self.parse_invoke_dynamic_info()?),
            19 => CpInfo::Module {
                name_index: self.read_u16()?,
            },
            20 => CpInfo::Package {
                name_index: self.read_u16()?,
            },
            _ => return Err(ClassFileError::InvalidCpInfoTag(tag)),
        };

        Ok(cp_info)
    }

    fn parse_name_and_type_info(&mut self) -> Result<CpInfo> {
        let name_index = self.read_u16()?;
        let descriptor_index = self.read_u16()?;

        Ok(CpInfo::NameAndType(constant_pool::NameAndTypeInfo {
            name_index,
            descriptor_index,
        }))
    }

    fn parse_method_handle(&mut self) -> Result<CpInfo> {
        let reference_kind = self.read_u8()?;
        let reference_index = self.read_u16()?;

        Ok(CpInfo::MethodHandle(constant_pool::MethodHandleInfo {
            reference_kind,
            reference_index,
        }))
    }

    fn parse_invoke_dynamic_info(&mut self) -> Result<constant_pool::InvokeDynamicInfo> {
        let bootstrap_method_attr_index = self.read_u16()?;
        let name_and_type_index = self.read_u16()?;

        Ok(constant_pool::InvokeDynamicInfo {
            bootstrap_method_attr_index,
            name_and_type_index,
        })
    }

    fn parse_ref_info(&mut self) -> Result<constant_pool::RefInfo> {
        let class_index = self.read_u16()?;
        let name_and_type_index = self.read_u16()?;

        Ok(constant_pool::RefInfo {
            class_index,
            name_and_type_index,
        })
    }

    fn parse_attribute(&mut self, constant_pool: &ConstantPool) -> Result<Attribute<'a>> {
        let name_index = self.read_u16()?;
        let attribute_length = self.read_u32()?;
        let info = self.r.read_bytes(attribute_length as usize)?;
        let name = constant_pool.utf8(name_index)?.to_owned();

        if AttributeKind::from_name(&name) == AttributeKind::Opaque {
            debug!("keeping {} ({} bytes) as opaque", name, info.len());
        }

        Ok(Attribute {
            name_index,
            name,
            info,
        })
    }

    fn parse_attributes(&mut self, constant_pool: &ConstantPool) -> Result<Attributes<'a>> {
        let attributes_count = self.read_u16()?;

        (0..attributes_count)
            .map(|_| self.parse_attribute(constant_pool))
            .collect::<Result<Vec<_>>>()
            .map(Attributes)
    }

    fn read_u32(&mut self) -> Result<u32> {
        Ok(self.r.read_u32()?)
    }

    fn read_u16(&mut self) -> Result<u16> {
        Ok(self.r.read_u16()?)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.r.read_u8()?)
    }
}

#[cfg(test)]
mod parse_magic_identifier_tests {
    use super::*;

    #[test]
    fn it_should_be_able_to_parse_the_correct_identifier() {
        assert!(Parser::new(&[0xca, 0xfe, 0xba, 0xbe], ParseOptions::default())
            .parse_magic_identifier()
            .is_ok());
    }

    #[test]
    fn it_should_fail_if_there_is_not_enough_data() {
        assert!(matches!(
            Parser::new(&[0xca, 0xfe, 0xba], ParseOptions::default()).parse_magic_identifier(),
            Err(ClassFileError::UnexpectedEnd(_))
        ));
    }

    #[test]
    fn it_should_fail_if_the_magic_identifier_is_incorrect() {
        assert_eq!(
            Parser::new(&[0xca, 0xfe, 0xda, 0xda], ParseOptions::default())
                .parse_magic_identifier(),
            Err(ClassFileError::InvalidMagicIdentifier(0xCAFEDADA))
        );
    }
}
