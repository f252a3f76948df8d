use exif::Error as ExifError;
use img_parts::Error as JpegError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Walkdir error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("EXIF error: {0}")]
    Exif(#[from] ExifError),

    #[error("JPEG error: {0}")]
    Jpeg(#[from] JpegError),

    #[error("Malformed value in {field}: {value:?}")]
    Format { field: String, value: String },

    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

impl AppError {
    pub fn format(field: impl Into<String>, value: impl Into<String>) -> Self {
        AppError::Format {
            field: field.into(),
            value: value.into(),
        }
    }
}
