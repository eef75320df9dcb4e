use thiserror::Error;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RenderError {
    // Configuration
    #[error("invalid dimensions {width}x{height}, width and height must be positive")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("invalid color {0:?}")]
    InvalidColor(String),

    // Encoder
    #[error("data too large for any supported capacity")]
    DataTooLarge,

    // Static image export
    #[error("invalid data url: {0}")]
    InvalidDataUrl(String),
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type RenderResult<T> = Result<T, RenderError>;
