use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::trace;

use crate::{
    name::{class_name_to_path, listed_class_name},
    ClassPathError, ClassSource, Result,
};

/// A directory laid out by package, such as `javac -d` output.
#[derive(Debug, Clone)]
pub struct Directory {
    root: PathBuf,
}

impl Directory {
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(ClassPathError::NotADirectory(root.to_owned()));
        }

        Ok(Self {
            root: root.to_owned(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collect(&self, dir: &Path, prefix: &str, recursive: bool, out: &mut Vec<String>) -> Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                trace!("skipping non UTF-8 entry {:?}", entry.path());
                continue;
            };

            if file_type.is_dir() {
                if recursive {
                    let prefix = format!("{}{}.", prefix, file_name);
                    self.collect(&entry.path(), &prefix, true, out)?;
                }
            } else if let Some(class_name) = listed_class_name(file_name) {
                out.push(format!("{}{}", prefix, class_name));
            }
        }

        Ok(())
    }
}

impl ClassSource for Directory {
    fn read(&self, class_name: &str) -> Result<Vec<u8>> {
        let path = self.root.join(class_name_to_path(class_name));

        fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ClassPathError::ClassNotFound {
                class_name: class_name.to_owned(),
                location: self.root.display().to_string(),
            },
            _ => e.into(),
        })
    }

    fn list(&self, recursive: bool) -> Result<Vec<String>> {
        let mut names = Vec::new();
        self.collect(&self.root, "", recursive, &mut names)?;
        names.sort();

        Ok(names)
    }

    fn sub(&self, package: &str) -> Result<Self> {
        Directory::open(self.root.join(package.replace('.', "/")))
    }
}
