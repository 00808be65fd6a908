use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use zip::{result::ZipError, ZipArchive};

use crate::{
    name::{class_name_to_path, dots_to_slashes, listed_class_name, slashes_to_dots},
    ClassPathError, ClassSource, Result,
};

/// A JAR or ZIP file, optionally scoped to one package.
#[derive(Debug, Clone)]
pub struct Archive {
    path: PathBuf,
    // Entry name prefix of the package this archive is scoped to, `a/b/` or empty.
    prefix: String,
    zip: Arc<Mutex<ZipArchive<File>>>,
}

impl Archive {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let is_archive = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| {
                ext.eq_ignore_ascii_case("jar") || ext.eq_ignore_ascii_case("zip")
            });
        if !is_archive {
            return Err(ClassPathError::NotAnArchive(path.to_owned()));
        }

        let zip = ZipArchive::new(File::open(path)?)?;
        log::debug!("opened {} ({} entries)", path.display(), zip.len());

        Ok(Self {
            path: path.to_owned(),
            prefix: String::new(),
            zip: Arc::new(Mutex::new(zip)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn location(&self) -> String {
        if self.prefix.is_empty() {
            self.path.display().to_string()
        } else {
            format!("{}!/{}", self.path.display(), self.prefix)
        }
    }
}

impl ClassSource for Archive {
    fn read(&self, class_name: &str) -> Result<Vec<u8>> {
        let entry_name = format!("{}{}", self.prefix, class_name_to_path(class_name));
        let mut zip = self.zip.lock().unwrap_or_else(PoisonError::into_inner);

        let mut entry = match zip.by_name(&entry_name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                return Err(ClassPathError::ClassNotFound {
                    class_name: class_name.to_owned(),
                    location: self.location(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;

        Ok(bytes)
    }

    fn list(&self, recursive: bool) -> Result<Vec<String>> {
        let zip = self.zip.lock().unwrap_or_else(PoisonError::into_inner);

        let mut names = zip
            .file_names()
            .filter_map(|name| name.strip_prefix(self.prefix.as_str()))
            .filter_map(listed_class_name)
            .filter(|name| recursive || !name.contains('/'))
            .map(slashes_to_dots)
            .collect::<Vec<_>>();
        names.sort();

        Ok(names)
    }

    fn sub(&self, package: &str) -> Result<Self> {
        Ok(Self {
            path: self.path.clone(),
            prefix: format!("{}{}/", self.prefix, dots_to_slashes(package)),
            zip: Arc::clone(&self.zip),
        })
    }
}
