//! Java-like rendering of a class and its declaration annotations.

use std::fmt;

use annoread_class_file::{
    descriptor::{java_name, parse_field_descriptor, parse_method_descriptor},
    AccessFlags, AnnotatedElementView, AnnotationTarget, ClassFile, MethodInfo, Retention,
};

const INDENT: &str = "    ";

/// Supertypes that are implied by the declaration keyword.
const IMPLIED_SUPERTYPES: [&str; 4] = [
    "java/lang/Object",
    "java/lang/Record",
    "java/lang/Enum",
    "java/lang/annotation/Annotation",
];

pub struct Outline<'c, 'a> {
    class_file: &'c ClassFile<'a>,
    retention: Retention,
}

impl<'c, 'a> Outline<'c, 'a> {
    pub fn new(class_file: &'c ClassFile<'a>, retention: Retention) -> Self {
        Self {
            class_file,
            retention,
        }
    }

    fn header(&self, all: &AnnotatedElementView) -> String {
        let class = self.class_file;
        let flags = class.access_flags;

        let is_record = class.components.as_ref().map_or(true, |c| !c.is_empty())
            || class.super_class().ok().flatten() == Some("java/lang/Record");
        let kind = if flags.contains(AccessFlags::ANNOTATION) {
            "@interface"
        } else if flags.contains(AccessFlags::INTERFACE) {
            "interface"
        } else if flags.contains(AccessFlags::ENUM) {
            "enum"
        } else if is_record {
            "record"
        } else {
            "class"
        };

        let mut words = Vec::new();
        if flags.contains(AccessFlags::PUBLIC) {
            words.push("public".to_owned());
        }
        if flags.contains(AccessFlags::ABSTRACT) && !flags.contains(AccessFlags::INTERFACE) {
            words.push("abstract".to_owned());
        }
        if flags.contains(AccessFlags::FINAL) && kind == "class" {
            words.push("final".to_owned());
        }
        words.push(kind.to_owned());

        let name = or_invalid(class.class_name().map(java_name));
        if is_record {
            let components = match class.record_components() {
                Ok(components) => components
                    .iter()
                    .enumerate()
                    .map(|(i, component)| {
                        format!(
                            "{}{} {}",
                            inline(all, AnnotationTarget::Component(i as u16)),
                            or_invalid(class.component_descriptor(component).map(field_type_name)),
                            or_invalid(class.component_name(component).map(str::to_owned)),
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(", "),
                Err(e) => format!("/* {} */", e),
            };
            words.push(format!("{}({})", name, components));
        } else {
            words.push(name);
        }

        if let Ok(Some(super_class)) = class.super_class() {
            if !IMPLIED_SUPERTYPES.contains(&super_class) {
                words.push(format!("extends {}", java_name(super_class)));
            }
        }

        let interfaces = class
            .interface_names()
            .unwrap_or_default()
            .into_iter()
            .filter(|name| !IMPLIED_SUPERTYPES.contains(name))
            .map(java_name)
            .collect::<Vec<_>>();
        if !interfaces.is_empty() {
            let keyword = if flags.contains(AccessFlags::INTERFACE) {
                "extends"
            } else {
                "implements"
            };
            words.push(format!("{} {}", keyword, interfaces.join(", ")));
        }

        words.join(" ")
    }

    fn method(&self, all: &AnnotatedElementView, index: u16, method: &MethodInfo) -> String {
        let class = self.class_file;
        let name = or_invalid(class.method_name(method).map(str::to_owned));
        let raw_descriptor = match class.method_descriptor(method) {
            Ok(raw_descriptor) => raw_descriptor,
            Err(e) => return format!("{} /* {} */", name, e),
        };
        let Ok(descriptor) = parse_method_descriptor(raw_descriptor) else {
            return format!("{} /* {} */", name, raw_descriptor);
        };

        let keywords = method.access_flags.method_keywords();
        let mut words = if keywords.is_empty() {
            Vec::new()
        } else {
            vec![keywords]
        };

        match name.as_str() {
            "<clinit>" => return "static {}".to_owned(),
            "<init>" => {
                let class_name = or_invalid(class.class_name().map(java_name));
                let simple_name = class_name.rsplit('.').next().unwrap_or_default();
                words.push(simple_name.to_owned());
            }
            _ => {
                words.push(match descriptor.return_type {
                    Some(return_type) => return_type.to_string(),
                    None => "void".to_owned(),
                });
                words.push(name);
            }
        }

        let parameters = descriptor
            .parameters
            .iter()
            .enumerate()
            .map(|(i, parameter)| {
                let target = AnnotationTarget::Parameter {
                    method: index,
                    parameter: i as u8,
                };
                format!("{}{} arg{}", inline(all, target), parameter, i)
            })
            .collect::<Vec<_>>();

        format!("{}({})", words.join(" "), parameters.join(", "))
    }
}

impl fmt::Display for Outline<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = self.class_file;
        let all = class.annotations().all(self.retention);

        block(f, &all, AnnotationTarget::Type, "")?;
        writeln!(f, "{} {{", self.header(&all))?;

        for (i, field) in class.fields.iter().enumerate() {
            block(f, &all, AnnotationTarget::Field(i as u16), INDENT)?;

            let keywords = field.access_flags.field_keywords();
            let field_type = or_invalid(class.field_descriptor(field).map(field_type_name));
            let name = or_invalid(class.field_name(field).map(str::to_owned));
            if keywords.is_empty() {
                writeln!(f, "{}{} {};", INDENT, field_type, name)?;
            } else {
                writeln!(f, "{}{} {} {};", INDENT, keywords, field_type, name)?;
            }
        }

        if !class.fields.is_empty() && !class.methods.is_empty() {
            writeln!(f)?;
        }

        for (i, method) in class.methods.iter().enumerate() {
            let index = i as u16;
            block(f, &all, AnnotationTarget::Method(index), INDENT)?;
            writeln!(f, "{}{};", INDENT, self.method(&all, index, method))?;
        }

        writeln!(f, "}}")
    }
}

/// One annotation per line above a declaration.
fn block(
    f: &mut fmt::Formatter<'_>,
    all: &AnnotatedElementView,
    target: AnnotationTarget,
    indent: &str,
) -> fmt::Result {
    match all.get(target) {
        Some(Ok(annotations)) => {
            for annotation in annotations {
                writeln!(f, "{}{}", indent, annotation)?;
            }
            Ok(())
        }
        Some(Err(e)) => writeln!(f, "{}// {}", indent, e),
        None => Ok(()),
    }
}

/// Annotations in front of a parameter or record component.
fn inline(all: &AnnotatedElementView, target: AnnotationTarget) -> String {
    match all.get(target) {
        Some(Ok(annotations)) => annotations.iter().map(|a| format!("{} ", a)).collect(),
        Some(Err(e)) => format!("/* {} */ ", e),
        None => String::new(),
    }
}

fn field_type_name(descriptor: &str) -> String {
    parse_field_descriptor(descriptor)
        .map(|field_type| field_type.to_string())
        .unwrap_or_else(|_| descriptor.to_owned())
}

fn or_invalid(name: annoread_class_file::Result<String>) -> String {
    name.unwrap_or_else(|e| format!("<{}>", e))
}
