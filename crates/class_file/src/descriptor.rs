use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::take_till1,
    character::complete::char,
    combinator::{all_consuming, map, value, verify},
    multi::{many0, many1_count},
    sequence::{delimited, pair},
    IResult,
};

use crate::{ClassFileError, Result};

/// The JVM caps array types at 255 dimensions.
const MAX_ARRAY_DIMENSIONS: usize = 255;

#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum FieldType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    /// Internal name, e.g. `java/lang/String`.
    Object(String),
    Short,
    Boolean,
    Array(Box<FieldType>),
}

impl FieldType {
    pub fn object(internal_name: &str) -> Self {
        FieldType::Object(internal_name.to_owned())
    }

    pub fn array(component: FieldType) -> Self {
        FieldType::Array(Box::new(component))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Byte => f.write_str("byte"),
            FieldType::Char => f.write_str("char"),
            FieldType::Double => f.write_str("double"),
            FieldType::Float => f.write_str("float"),
            FieldType::Int => f.write_str("int"),
            FieldType::Long => f.write_str("long"),
            FieldType::Object(name) => f.write_str(&java_name(name)),
            FieldType::Short => f.write_str("short"),
            FieldType::Boolean => f.write_str("boolean"),
            FieldType::Array(component) => write!(f, "{}[]", component),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub parameters: Vec<FieldType>,
    /// `None` for `void`.
    pub return_type: Option<FieldType>,
}

/// Converts an internal name (`java/lang/Object`) to its dotted form.
pub fn java_name(internal_name: &str) -> String {
    internal_name.replace('/', ".")
}

pub fn parse_field_descriptor(input: &str) -> Result<FieldType> {
    all_consuming(field_type)(input)
        .map(|(_, field_type)| field_type)
        .map_err(|_| ClassFileError::InvalidDescriptor(input.to_owned()))
}

pub fn parse_method_descriptor(input: &str) -> Result<MethodDescriptor> {
    all_consuming(method_descriptor)(input)
        .map(|(_, descriptor)| descriptor)
        .map_err(|_| ClassFileError::InvalidDescriptor(input.to_owned()))
}

/// A field descriptor or `V`, as found in class literal element values.
pub fn parse_return_descriptor(input: &str) -> Result<Option<FieldType>> {
    all_consuming(return_type)(input)
        .map(|(_, return_type)| return_type)
        .map_err(|_| ClassFileError::InvalidDescriptor(input.to_owned()))
}

fn method_descriptor(input: &str) -> IResult<&str, MethodDescriptor> {
    map(
        pair(
            delimited(char('('), many0(field_type), char(')')),
            return_type,
        ),
        |(parameters, return_type)| MethodDescriptor {
            parameters,
            return_type,
        },
    )(input)
}

fn return_type(input: &str) -> IResult<&str, Option<FieldType>> {
    alt((map(field_type, Some), value(None, char('V'))))(input)
}

fn field_type(input: &str) -> IResult<&str, FieldType> {
    alt((base_type, object_type, array_type))(input)
}

fn base_type(input: &str) -> IResult<&str, FieldType> {
    alt((
        value(FieldType::Byte, char('B')),
        value(FieldType::Char, char('C')),
        value(FieldType::Double, char('D')),
        value(FieldType::Float, char('F')),
        value(FieldType::Int, char('I')),
        value(FieldType::Long, char('J')),
        value(FieldType::Short, char('S')),
        value(FieldType::Boolean, char('Z')),
    ))(input)
}

fn object_type(input: &str) -> IResult<&str, FieldType> {
    map(
        delimited(char('L'), take_till1(|c: char| c == ';'), char(';')),
        FieldType::object,
    )(input)
}

// Dimensions are counted rather than recursed into so a long run of `[`
// cannot exhaust the stack.
fn array_type(input: &str) -> IResult<&str, FieldType> {
    map(
        pair(
            verify(many1_count(char('[')), |n: &usize| *n <= MAX_ARRAY_DIMENSIONS),
            alt((base_type, object_type)),
        ),
        |(dimensions, component)| (0..dimensions).fold(component, |t, _| FieldType::array(t)),
    )(input)
}
