#![allow(dead_code)]

use std::fs;

use byteorder::{BigEndian, WriteBytesExt};

pub fn read_fixture(name: &str) -> Vec<u8> {
    fs::read(format!("tests/classes/my/{}.class", name)).unwrap()
}

/// Big-endian byte sink for hand-built class file fragments.
#[derive(Debug, Default, Clone)]
pub struct Bytes(Vec<u8>);

impl Bytes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u8(mut self, v: u8) -> Self {
        self.0.write_u8(v).unwrap();
        self
    }

    pub fn u16(mut self, v: u16) -> Self {
        self.0.write_u16::<BigEndian>(v).unwrap();
        self
    }

    pub fn u32(mut self, v: u32) -> Self {
        self.0.write_u32::<BigEndian>(v).unwrap();
        self
    }

    pub fn bytes(mut self, v: &[u8]) -> Self {
        self.0.extend_from_slice(v);
        self
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

/// Writes minimal but structurally valid class files.
#[derive(Debug)]
pub struct ClassBuilder {
    major_version: u16,
    pool: Bytes,
    next_index: u16,
    this_class: u16,
    super_class: u16,
    fields: Vec<Vec<u8>>,
    methods: Vec<Vec<u8>>,
    attributes: Vec<Vec<u8>>,
}

impl ClassBuilder {
    pub fn new(name: &str) -> Self {
        let mut builder = Self {
            major_version: 61,
            pool: Bytes::new(),
            next_index: 1,
            this_class: 0,
            super_class: 0,
            fields: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
        };
        builder.this_class = builder.class(name);
        builder.super_class = builder.class("java/lang/Object");
        builder
    }

    pub fn major_version(mut self, major_version: u16) -> Self {
        self.major_version = major_version;
        self
    }

    fn push(&mut self, entry: Bytes, slots: u16) -> u16 {
        let index = self.next_index;
        self.pool = std::mem::take(&mut self.pool).bytes(&entry.into_inner());
        self.next_index += slots;
        index
    }

    pub fn utf8(&mut self, s: &str) -> u16 {
        let entry = Bytes::new().u8(1).u16(s.len() as u16).bytes(s.as_bytes());
        self.push(entry, 1)
    }

    /// A Utf8 entry holding `bytes` as is, valid modified UTF-8 or not.
    pub fn raw_utf8(&mut self, bytes: &[u8]) -> u16 {
        let entry = Bytes::new().u8(1).u16(bytes.len() as u16).bytes(bytes);
        self.push(entry, 1)
    }

    pub fn integer(&mut self, n: i32) -> u16 {
        self.push(Bytes::new().u8(3).u32(n as u32), 1)
    }

    pub fn long(&mut self, n: i64) -> u16 {
        let n = n as u64;
        let entry = Bytes::new().u8(5).u32((n >> 32) as u32).u32(n as u32);
        self.push(entry, 2)
    }

    pub fn double(&mut self, n: f64) -> u16 {
        let n = n.to_bits();
        let entry = Bytes::new().u8(6).u32((n >> 32) as u32).u32(n as u32);
        self.push(entry, 2)
    }

    pub fn class(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        self.push(Bytes::new().u8(7).u16(name_index), 1)
    }

    /// An `attribute_info` record ready to be attached to a member or the class.
    pub fn attribute(&mut self, name: &str, info: &[u8]) -> Vec<u8> {
        let name_index = self.utf8(name);
        Bytes::new()
            .u16(name_index)
            .u32(info.len() as u32)
            .bytes(info)
            .into_inner()
    }

    pub fn class_attribute(&mut self, name: &str, info: &[u8]) -> &mut Self {
        let attribute = self.attribute(name, info);
        self.attributes.push(attribute);
        self
    }

    pub fn field(&mut self, name: &str, descriptor: &str, attributes: Vec<Vec<u8>>) -> &mut Self {
        let member = self.member(name, descriptor, attributes);
        self.fields.push(member);
        self
    }

    pub fn method(&mut self, name: &str, descriptor: &str, attributes: Vec<Vec<u8>>) -> &mut Self {
        let member = self.member(name, descriptor, attributes);
        self.methods.push(member);
        self
    }

    fn member(&mut self, name: &str, descriptor: &str, attributes: Vec<Vec<u8>>) -> Vec<u8> {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(descriptor);

        let mut member = Bytes::new()
            .u16(0x0001)
            .u16(name_index)
            .u16(descriptor_index)
            .u16(attributes.len() as u16);
        for attribute in attributes {
            member = member.bytes(&attribute);
        }
        member.into_inner()
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Bytes::new()
            .u32(0xCAFEBABE)
            .u16(0)
            .u16(self.major_version)
            .u16(self.next_index)
            .bytes(&self.pool.0)
            .u16(0x0021)
            .u16(self.this_class)
            .u16(self.super_class)
            .u16(0);

        for table in [&self.fields, &self.methods, &self.attributes] {
            out = out.u16(table.len() as u16);
            for entry in table {
                out = out.bytes(entry);
            }
        }

        out.into_inner()
    }
}
