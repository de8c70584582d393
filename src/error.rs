use thiserror::Error;

use crate::bitmap::ContentFit;

#[derive(Error, Debug)]
pub enum Error {
    #[error("content fit {0:?} not supported, circle images always use Cover")]
    UnsupportedContentFit(ContentFit),
    #[error("adjusting view bounds to the image is not supported")]
    AdjustViewBoundsUnsupported,
    #[error("cannot create a {width}x{height} drawing surface")]
    InvalidSurface { width: u32, height: u32 },
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
