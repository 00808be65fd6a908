use std::{fs, io::Write, path::Path};

use annoread_class_file::{ClassFile, Retention};
use annoread_class_path::{Archive, ClassPathError, ClassSource, Directory};
use tempfile::TempDir;
use zip::{write::SimpleFileOptions, ZipWriter};

const FIXTURES: &str = "../class_file/tests/classes";

/// Entry names and contents of a small class path: two classes in `my`, one
/// in `my.sub`, one in the root package, plus a `package-info`.
fn entries() -> Vec<(&'static str, Vec<u8>)> {
    let fixture = |name: &str| fs::read(Path::new(FIXTURES).join(name)).unwrap();

    vec![
        ("my/Annotated.class", fixture("my/Annotated.class")),
        ("my/Named.class", fixture("my/Named.class")),
        ("my/package-info.class", fixture("my/Marker.class")),
        ("my/sub/Point.class", fixture("my/Point.class")),
        ("Top.class", fixture("my/MyClass.class")),
        ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\n".to_vec()),
    ]
}

fn with_directory(f: impl FnOnce(Directory)) {
    let dir = TempDir::new().unwrap();
    for (name, bytes) in entries() {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, bytes).unwrap();
    }

    f(Directory::open(dir.path()).unwrap());
}

fn with_archive(f: impl FnOnce(Archive)) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("classes.jar");

    let mut zip = ZipWriter::new(fs::File::create(&path).unwrap());
    for (name, bytes) in entries() {
        zip.start_file(name, SimpleFileOptions::default()).unwrap();
        zip.write_all(&bytes).unwrap();
    }
    zip.finish().unwrap();

    f(Archive::open(&path).unwrap());
}

fn check_listing(source: &impl ClassSource) {
    assert_eq!(vec!["Top"], source.list(false).unwrap());
    assert_eq!(
        vec!["Top", "my.Annotated", "my.Named", "my.sub.Point"],
        source.list(true).unwrap()
    );

    let my = source.sub("my").unwrap();
    assert_eq!(vec!["Annotated", "Named"], my.list(false).unwrap());
    assert_eq!(
        vec!["Annotated", "Named", "sub.Point"],
        my.list(true).unwrap()
    );
}

fn check_read(source: &impl ClassSource) {
    let bytes = source.read("my.Annotated").unwrap();
    let class_file = ClassFile::parse(&bytes).unwrap();
    assert_eq!("my/Annotated", class_file.class_name().unwrap());
    assert_eq!(
        1,
        class_file
            .annotations()
            .for_type(Retention::VisibleAtRuntime)
            .unwrap()
            .len()
    );

    let point = source.sub("my").unwrap().sub("sub").unwrap().read("Point").unwrap();
    assert_eq!(
        "my/Point",
        ClassFile::parse(&point).unwrap().class_name().unwrap()
    );

    assert!(matches!(
        source.read("my.Missing"),
        Err(ClassPathError::ClassNotFound { class_name, .. }) if class_name == "my.Missing"
    ));
}

fn check_read_all(source: &impl ClassSource) {
    let classes = source.sub("my").unwrap().read_all(false).unwrap();

    let names = classes
        .iter()
        .map(|(_, bytes)| {
            ClassFile::parse(bytes)
                .unwrap()
                .class_name()
                .unwrap()
                .to_owned()
        })
        .collect::<Vec<_>>();
    assert_eq!(vec!["my/Annotated", "my/Named"], names);
}

#[test]
fn test_directory_list() {
    with_directory(|directory| check_listing(&directory));
}

#[test]
fn test_directory_read() {
    with_directory(|directory| check_read(&directory));
}

#[test]
fn test_directory_read_all() {
    with_directory(|directory| check_read_all(&directory));
}

#[test]
fn test_directory_sub_must_exist() {
    with_directory(|directory| {
        assert!(matches!(
            directory.sub("nowhere"),
            Err(ClassPathError::NotADirectory(_))
        ))
    });
}

#[test]
fn test_archive_list() {
    with_archive(|archive| check_listing(&archive));
}

#[test]
fn test_archive_read() {
    with_archive(|archive| check_read(&archive));
}

#[test]
fn test_archive_read_all() {
    with_archive(|archive| check_read_all(&archive));
}

#[test]
fn test_open_picks_the_source_kind() {
    with_directory(|directory| {
        let source = annoread_class_path::open(directory.root()).unwrap();
        assert_eq!(4, source.list(true).unwrap().len());
    });

    let dir = TempDir::new().unwrap();
    let text = dir.path().join("notes.txt");
    fs::write(&text, "not a class path").unwrap();
    assert!(matches!(
        annoread_class_path::open(&text),
        Err(ClassPathError::NotAnArchive(_))
    ));
}
