use std::fmt;

use crate::error::ConstantPoolError;

/// The constant pool of a class file, addressed by 1-based `u16` handles.
///
/// Long and Double constants take two slots; the second one is kept as
/// [`CpInfo::Unusable`] so that handles index the table directly.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConstantPool {
    cp_infos: Vec<CpInfo>,
}

macro_rules! matches_cp_info {
    ($cp:expr, $index:expr, $i:ident) => {
        match $cp.get($index)? {
            $crate::constant_pool::CpInfo::$i(n) => Ok(n),
            c => Err($crate::error::ConstantPoolError::TypeMismatch {
                index: $index,
                expected: $crate::constant_pool::CpKind::$i,
                found: c.kind(),
            }),
        }
    };
}

impl ConstantPool {
    pub fn new(cp_infos: Vec<CpInfo>) -> Self {
        Self { cp_infos }
    }

    /// Number of slots, not counting the reserved slot 0.
    pub fn len(&self) -> usize {
        self.cp_infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cp_infos.is_empty()
    }

    pub fn get(&self, index: u16) -> Result<&CpInfo, ConstantPoolError> {
        match index
            .checked_sub(1)
            .and_then(|i| self.cp_infos.get(i as usize))
        {
            Some(CpInfo::Unusable) | None => Err(ConstantPoolError::InvalidIndex(index)),
            Some(cp_info) => Ok(cp_info),
        }
    }

    /// Every usable entry with its handle.
    pub fn entries(&self) -> impl Iterator<Item = (u16, &CpInfo)> {
        self.cp_infos
            .iter()
            .enumerate()
            .filter(|(_, c)| !matches!(c, CpInfo::Unusable))
            .map(|(i, c)| (i as u16 + 1, c))
    }

    /// Resolves `index` to a value, checking that the entry is of kind `expected`.
    ///
    /// Entries that point at a Utf8 entry (String, Class, MethodType, Module,
    /// Package) are followed one hop and come back as [`Constant::Text`].
    pub fn resolve(&self, index: u16, expected: CpKind) -> Result<Constant<'_>, ConstantPoolError> {
        let cp_info = self.get(index)?;
        if cp_info.kind() != expected {
            return Err(ConstantPoolError::TypeMismatch {
                index,
                expected,
                found: cp_info.kind(),
            });
        }

        Ok(match *cp_info {
            CpInfo::Utf8(ref s) => Constant::Text(s),
            CpInfo::Integer(n) => Constant::Integer(n),
            CpInfo::Float(n) => Constant::Float(n),
            CpInfo::Long(n) => Constant::Long(n),
            CpInfo::Double(n) => Constant::Double(n),
            CpInfo::String { string_index: i }
            | CpInfo::Class(ClassInfo { name_index: i })
            | CpInfo::MethodType(MethodTypeInfo {
                descriptor_index: i,
            })
            | CpInfo::Module { name_index: i }
            | CpInfo::Package { name_index: i } => Constant::Text(self.utf8(i)?),
            ref c => Constant::Entry(c),
        })
    }

    pub fn utf8(&self, index: u16) -> Result<&str, ConstantPoolError> {
        matches_cp_info!(self, index, Utf8).map(String::as_str)
    }

    pub fn integer(&self, index: u16) -> Result<i32, ConstantPoolError> {
        matches_cp_info!(self, index, Integer).copied()
    }

    pub fn float(&self, index: u16) -> Result<f32, ConstantPoolError> {
        matches_cp_info!(self, index, Float).copied()
    }

    pub fn long(&self, index: u16) -> Result<i64, ConstantPoolError> {
        matches_cp_info!(self, index, Long).copied()
    }

    pub fn double(&self, index: u16) -> Result<f64, ConstantPoolError> {
        matches_cp_info!(self, index, Double).copied()
    }

    /// Internal name of a Class entry, e.g. `java/lang/Object`.
    pub fn class_name(&self, index: u16) -> Result<&str, ConstantPoolError> {
        let ClassInfo { name_index } = matches_cp_info!(self, index, Class)?;
        self.utf8(*name_index)
    }

    /// Text of a String entry.
    pub fn string(&self, index: u16) -> Result<&str, ConstantPoolError> {
        match *self.get(index)? {
            CpInfo::String { string_index } => self.utf8(string_index),
            ref c => Err(ConstantPoolError::TypeMismatch {
                index,
                expected: CpKind::String,
                found: c.kind(),
            }),
        }
    }
}

impl<'a> IntoIterator for &'a ConstantPool {
    type Item = &'a CpInfo;
    type IntoIter = std::slice::Iter<'a, CpInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.cp_infos.iter()
    }
}

/// A resolved constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constant<'p> {
    Text(&'p str),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    /// Structural entries that have no scalar value.
    Entry(&'p CpInfo),
}

#[derive(Debug, PartialEq, Clone)]
pub enum CpInfo {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class(ClassInfo),
    String { string_index: u16 },
    FieldRef(RefInfo),
    MethodRef(RefInfo),
    InterfaceMethodRef(RefInfo),
    NameAndType(NameAndTypeInfo),
    MethodHandle(MethodHandleInfo),
    MethodType(MethodTypeInfo),
    Dynamic(InvokeDynamicInfo),
    InvokeDynamic(InvokeDynamicInfo),
    Module { name_index: u16 },
    Package { name_index: u16 },
    Unusable,
}

impl CpInfo {
    pub fn kind(&self) -> CpKind {
        match self {
            CpInfo::Utf8(_) => CpKind::Utf8,
            CpInfo::Integer(_) => CpKind::Integer,
            CpInfo::Float(_) => CpKind::Float,
            CpInfo::Long(_) => CpKind::Long,
            CpInfo::Double(_) => CpKind::Double,
            CpInfo::Class(_) => CpKind::Class,
            CpInfo::String { .. } => CpKind::String,
            CpInfo::FieldRef(_) => CpKind::FieldRef,
            CpInfo::MethodRef(_) => CpKind::MethodRef,
            CpInfo::InterfaceMethodRef(_) => CpKind::InterfaceMethodRef,
            CpInfo::NameAndType(_) => CpKind::NameAndType,
            CpInfo::MethodHandle(_) => CpKind::MethodHandle,
            CpInfo::MethodType(_) => CpKind::MethodType,
            CpInfo::Dynamic(_) => CpKind::Dynamic,
            CpInfo::InvokeDynamic(_) => CpKind::InvokeDynamic,
            CpInfo::Module { .. } => CpKind::Module,
            CpInfo::Package { .. } => CpKind::Package,
            CpInfo::Unusable => CpKind::Unusable,
        }
    }

    /// Long and Double take up two constant pool slots.
    pub fn slot_size(&self) -> usize {
        match self {
            CpInfo::Long(_) | CpInfo::Double(_) => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpKind {
    Utf8,
    Integer,
    Float,
    Long,
    Double,
    Class,
    String,
    FieldRef,
    MethodRef,
    InterfaceMethodRef,
    NameAndType,
    MethodHandle,
    MethodType,
    Dynamic,
    InvokeDynamic,
    Module,
    Package,
    Unusable,
}

impl fmt::Display for CpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CONSTANT_{:?}", self)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct RefInfo {
    pub class_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ClassInfo {
    pub name_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct NameAndTypeInfo {
    pub name_index: u16,
    pub descriptor_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct InvokeDynamicInfo {
    pub bootstrap_method_attr_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct MethodHandleInfo {
    pub reference_kind: u8,
    pub reference_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct MethodTypeInfo {
    pub descriptor_index: u16,
}
