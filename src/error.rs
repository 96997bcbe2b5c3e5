use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid date {0:?}: DD.MM.YYYY required")]
    DateFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("EXIF serialization error: {0}")]
    Exif(#[from] exif::Error),

    #[error("JPEG segment error: {0}")]
    Jpeg(#[from] img_parts::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
