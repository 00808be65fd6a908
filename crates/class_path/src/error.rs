use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassPathError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Not an archive (JAR or ZIP): {0}")]
    NotAnArchive(PathBuf),
    #[error("Class {class_name} not found in {location}")]
    ClassNotFound { class_name: String, location: String },
}
