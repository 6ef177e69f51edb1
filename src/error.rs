use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Stream adapter errors
    #[error("Invalid seek origin: {0} (expected 0, 1 or 2)")]
    InvalidSeekOrigin(u32),

    // LZMA errors
    #[error("Invalid LZMA properties byte: 0x{0:02x}")]
    InvalidProperties(u8),

    #[error("LZMA backend error: {0}")]
    Lzma(#[from] xz2::stream::Error),

    #[error("LZMA stream made no progress")]
    LzmaStalled,

    // PPMd errors
    #[error("PPMd order {order} outside [{min}, {max}]")]
    InvalidOrder { order: u32, min: u32, max: u32 },

    #[error("PPMd memory size {size} outside [{min}, {max}]")]
    InvalidMemSize { size: u32, min: u32, max: u32 },

    #[error("PPMd backend error: {0}")]
    Ppmd(String),
}

pub type Result<T> = std::result::Result<T, Error>;
