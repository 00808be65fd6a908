const DOT_CLASS: &str = ".class";

/// `a.b.C` to `a/b/C.class`.
pub(crate) fn class_name_to_path(class_name: &str) -> String {
    format!("{}{}", dots_to_slashes(class_name), DOT_CLASS)
}

pub(crate) fn dots_to_slashes(name: &str) -> String {
    name.replace('.', "/")
}

pub(crate) fn slashes_to_dots(name: &str) -> String {
    name.replace('/', ".")
}

/// The class name of a `.class` file name, if it should be listed.
pub(crate) fn listed_class_name(file_name: &str) -> Option<&str> {
    let stem = file_name.strip_suffix(DOT_CLASS)?;

    match stem.rsplit('/').next() {
        Some("") | Some("package-info") | Some("module-info") | None => None,
        Some(_) => Some(stem),
    }
}
