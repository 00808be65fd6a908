mod common;

use annoread_class_file::{
    descriptor::FieldType, AnnotationInfo, AnnotationTarget, ClassFile, ClassFileError,
    ElementValue, Primitive, Retention,
};

use common::read_fixture;

const VISIBLE: Retention = Retention::VisibleAtRuntime;
const INVISIBLE: Retention = Retention::SourceOnly;

fn with_class_file(name: &str, f: impl FnOnce(ClassFile)) {
    let bytes = read_fixture(name);
    f(ClassFile::parse(&bytes).unwrap());
}

fn type_names(annotations: &[AnnotationInfo]) -> Vec<String> {
    annotations.iter().map(AnnotationInfo::type_name).collect()
}

#[test]
fn test_unannotated_class_has_empty_queries() {
    with_class_file("MyClass", |class_file| {
        let view = class_file.annotations();

        for retention in [VISIBLE, INVISIBLE] {
            assert!(view.for_type(retention).unwrap().is_empty());
            assert!(view.for_field(0, retention).unwrap().is_empty());
            assert!(view.for_method(0, retention).unwrap().is_empty());
            assert!(view.for_method(1, retention).unwrap().is_empty());
            assert!(view.for_parameter(0, 0, retention).unwrap().is_empty());
            assert_eq!(0, view.parameter_count(0, retention).unwrap());
            assert!(view.all(retention).is_empty());
        }
    });
}

#[test]
fn test_type_annotations() {
    with_class_file("Annotated", |class_file| {
        let visible = class_file.annotations().for_type(VISIBLE).unwrap();

        assert_eq!(vec!["my.Named"], type_names(&visible));
        assert_eq!(
            Some(&ElementValue::Text("ok".into())),
            visible[0].get("value")
        );
        // defaults are not stored at the use site
        assert_eq!(None, visible[0].get("count"));
    });
}

#[test]
fn test_invisible_annotations() {
    with_class_file("Annotated", |class_file| {
        let invisible = class_file.annotations().for_type(INVISIBLE).unwrap();

        assert_eq!(1, invisible.len());
        assert_eq!("Lmy/Invisible;", invisible[0].type_descriptor);
        assert_eq!("@my.Invisible(\"hidden\")", invisible[0].to_string());
    });
}

#[test]
fn test_field_annotation_with_int_and_string() {
    with_class_file("Annotated", |class_file| {
        let tagged = class_file.find_field("tagged").unwrap();
        let annotations = class_file.annotations().for_field(tagged, VISIBLE).unwrap();

        assert_eq!(1, annotations.len());
        assert_eq!("Lmy/Tagged;", annotations[0].type_descriptor);
        assert_eq!(
            vec![
                ("value", &ElementValue::Primitive(Primitive::Int(42))),
                ("note", &ElementValue::Text("ok".into())),
            ],
            annotations[0].pairs().collect::<Vec<_>>()
        );
    });
}

#[test]
fn test_annotations_keep_declaration_order() {
    with_class_file("Annotated", |class_file| {
        let size = class_file.find_field("size").unwrap();
        let annotations = class_file.annotations().for_field(size, VISIBLE).unwrap();

        assert_eq!(vec!["my.Marker", "my.Limits"], type_names(&annotations));
        assert_eq!(
            Some(&ElementValue::Primitive(Primitive::Long(1 << 40))),
            annotations[1].get("min")
        );
        assert_eq!(
            Some(&ElementValue::Primitive(Primitive::Double(2.5))),
            annotations[1].get("max")
        );
    });
}

#[test]
fn test_nested_annotations_in_array() {
    with_class_file("Annotated", |class_file| {
        let annotations = class_file.annotations().for_method(1, VISIBLE).unwrap();
        let outer = &annotations[0];

        assert_eq!("my.Outer", outer.type_name());

        let values = outer.get("values").and_then(ElementValue::as_array).unwrap();
        assert_eq!(2, values.len());
        for (value, x) in values.iter().zip([1, 2]) {
            let inner = value.as_annotation().unwrap();
            assert_eq!("Lmy/Inner;", inner.type_descriptor);
            assert_eq!(
                vec![("x", &ElementValue::Primitive(Primitive::Int(x)))],
                inner.pairs().collect::<Vec<_>>()
            );
        }

        assert_eq!(
            Some(&ElementValue::Enum {
                type_descriptor: "Lmy/Kind;".into(),
                const_name: "SLOW".into(),
            }),
            outer.get("kind")
        );
        assert_eq!(
            Some(&ElementValue::Class("[Ljava/lang/String;".into())),
            outer.get("type")
        );
        assert_eq!(
            "@my.Outer(values={@my.Inner(x=1), @my.Inner(x=2)}, kind=my.Kind.SLOW, \
             type=java.lang.String[].class)",
            outer.to_string()
        );
    });
}

#[test]
fn test_parameter_annotations() {
    with_class_file("Annotated", |class_file| {
        let view = class_file.annotations();

        assert_eq!(3, view.parameter_count(1, VISIBLE).unwrap());
        assert_eq!(
            vec!["my.Named"],
            type_names(&view.for_parameter(1, 0, VISIBLE).unwrap())
        );
        assert!(view.for_parameter(1, 1, VISIBLE).unwrap().is_empty());
        assert_eq!(
            vec!["my.Marker"],
            type_names(&view.for_parameter(1, 2, VISIBLE).unwrap())
        );
        assert_eq!(
            vec!["my.Invisible"],
            type_names(&view.for_parameter(1, 2, INVISIBLE).unwrap())
        );
        assert!(view.for_parameter(1, 7, VISIBLE).unwrap().is_empty());
    });
}

#[test]
fn test_record_component_annotations() {
    with_class_file("Point", |class_file| {
        let view = class_file.annotations();

        assert_eq!(vec!["my.Marker"], type_names(&view.for_component(0, VISIBLE).unwrap()));
        let y = view.for_component(1, VISIBLE).unwrap();
        assert_eq!("@my.Named(\"y\")", y[0].to_string());

        let accessor = class_file.find_method("x", &[]).unwrap().unwrap();
        assert_eq!(vec!["my.Marker"], type_names(&view.for_method(accessor, VISIBLE).unwrap()));

        let constructor = class_file
            .find_method("<init>", &[FieldType::Int, FieldType::Int])
            .unwrap()
            .unwrap();
        assert_eq!(2, view.parameter_count(constructor, VISIBLE).unwrap());
    });
}

#[test]
fn test_annotation_defaults() {
    with_class_file("Named", |class_file| {
        let view = class_file.annotations();
        let value = class_file.find_method("value", &[]).unwrap().unwrap();
        let count = class_file.find_method("count", &[]).unwrap().unwrap();

        assert_eq!(None, view.annotation_default(value).unwrap());
        assert_eq!(
            Some(ElementValue::Primitive(Primitive::Int(42))),
            view.annotation_default(count).unwrap()
        );
    });

    with_class_file("Outer", |class_file| {
        let view = class_file.annotations();
        let kind = class_file.find_method("kind", &[]).unwrap().unwrap();
        let type_ = class_file.find_method("type", &[]).unwrap().unwrap();

        assert_eq!(
            "my.Kind.FAST",
            view.annotation_default(kind).unwrap().unwrap().to_string()
        );
        assert_eq!(
            Some(ElementValue::Class("V".into())),
            view.annotation_default(type_).unwrap()
        );
    });

    with_class_file("Limits", |class_file| {
        let unit = class_file.find_method("unit", &[]).unwrap().unwrap();
        let strict = class_file.find_method("strict", &[]).unwrap().unwrap();

        assert_eq!(
            Some(ElementValue::Primitive(Primitive::Char(b'm' as u16))),
            class_file.annotations().annotation_default(unit).unwrap()
        );
        assert_eq!(
            Some(ElementValue::Primitive(Primitive::Boolean(false))),
            class_file.annotations().annotation_default(strict).unwrap()
        );
    });
}

#[test]
fn test_all_visible() {
    with_class_file("Annotated", |class_file| {
        let all = class_file.annotations().all_visible();

        assert_eq!(Retention::VisibleAtRuntime, all.retention());
        assert_eq!(0, all.failures().count());
        assert_eq!(
            vec!["my.Named"],
            type_names(all.annotations(AnnotationTarget::Type))
        );
        assert_eq!(
            vec!["java.lang.Deprecated"],
            type_names(all.annotations(AnnotationTarget::Method(2)))
        );
        assert_eq!(
            vec!["my.Marker"],
            type_names(all.annotations(AnnotationTarget::Parameter {
                method: 1,
                parameter: 2
            }))
        );
        assert!(all.get(AnnotationTarget::Method(3)).is_none());
        assert!(all.annotations(AnnotationTarget::Field(2)).is_empty());
    });
}

#[test]
fn test_all_source_only() {
    with_class_file("Annotated", |class_file| {
        let all = class_file.annotations().all_source_only();

        let targets = all.iter().map(|(target, _)| *target).collect::<Vec<_>>();
        assert_eq!(
            vec![
                AnnotationTarget::Type,
                AnnotationTarget::Parameter {
                    method: 1,
                    parameter: 0
                },
                AnnotationTarget::Parameter {
                    method: 1,
                    parameter: 1
                },
                AnnotationTarget::Parameter {
                    method: 1,
                    parameter: 2
                },
            ],
            targets
        );
    });
}

#[test]
fn test_for_target_matches_specific_queries() {
    with_class_file("Annotated", |class_file| {
        let view = class_file.annotations();

        assert_eq!(
            view.for_method(1, VISIBLE).unwrap(),
            view.for_target(AnnotationTarget::Method(1), VISIBLE).unwrap()
        );
        assert_eq!(
            view.for_parameter(1, 0, VISIBLE).unwrap(),
            view.for_target(
                AnnotationTarget::Parameter {
                    method: 1,
                    parameter: 0
                },
                VISIBLE
            )
            .unwrap()
        );
    });
}

#[test]
fn test_missing_targets() {
    with_class_file("MyClass", |class_file| {
        let view = class_file.annotations();

        assert_eq!(
            Err(ClassFileError::NoSuchTarget(AnnotationTarget::Field(5))),
            view.for_field(5, VISIBLE)
        );
        assert_eq!(
            Err(ClassFileError::NoSuchTarget(AnnotationTarget::Component(0))),
            view.for_component(0, VISIBLE)
        );
        assert_eq!(
            Err(ClassFileError::NoSuchTarget(AnnotationTarget::Parameter {
                method: 9,
                parameter: 0
            })),
            view.for_parameter(9, 0, VISIBLE)
        );
    });
}
