//! Class file sources: class directories and JAR/ZIP archives.
//!
//! Class names are given in dotted form relative to the source, e.g.
//! `com.example.Widget`. Sources only hand out bytes; parse them with
//! `annoread-class_file`.

mod archive;
mod directory;
mod error;
mod name;

use std::path::Path;

pub use archive::Archive;
pub use directory::Directory;
pub use error::ClassPathError;

pub type Result<T, E = ClassPathError> = std::result::Result<T, E>;

pub trait ClassSource {
    /// Bytes of the class called `class_name`.
    fn read(&self, class_name: &str) -> Result<Vec<u8>>;

    /// Dotted names of the classes in this source, sorted. `package-info` and
    /// `module-info` are left out. Without `recursive` only classes directly
    /// in the source's root package are listed.
    fn list(&self, recursive: bool) -> Result<Vec<String>>;

    /// Every listed class with its bytes.
    fn read_all(&self, recursive: bool) -> Result<Vec<(String, Vec<u8>)>> {
        self.list(recursive)?
            .into_iter()
            .map(|class_name| {
                let bytes = self.read(&class_name)?;
                Ok((class_name, bytes))
            })
            .collect()
    }

    /// The classes of `package`, so that `sub("a.b")?.read("C")` reads `a.b.C`.
    fn sub(&self, package: &str) -> Result<Self>
    where
        Self: Sized;
}

/// Opens `path` as a [`Directory`] or, failing that, as an [`Archive`].
pub fn open(path: impl AsRef<Path>) -> Result<Box<dyn ClassSource>> {
    let path = path.as_ref();

    if path.is_dir() {
        Ok(Box::new(Directory::open(path)?))
    } else {
        Ok(Box::new(Archive::open(path)?))
    }
}
