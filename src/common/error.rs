use std::fmt;
use std::io;

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    InvalidExtension(String),
    UnsupportedColorType(String),
    InvalidDimensions(String),
    Decode(String),
    Encode(String),
    Gpu(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::InvalidExtension(ext) => write!(f, "Invalid file extension: {}", ext),
            Error::UnsupportedColorType(msg) => write!(f, "Unsupported color type: {}", msg),
            Error::InvalidDimensions(msg) => write!(f, "Invalid image dimensions: {}", msg),
            Error::Decode(msg) => write!(f, "Decode error: {}", msg),
            Error::Encode(msg) => write!(f, "Encode error: {}", msg),
            Error::Gpu(msg) => write!(f, "OpenCL error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<ocl::Error> for Error {
    // The ocl error display carries the program build log on compile failures.
    fn from(e: ocl::Error) -> Self {
        Error::Gpu(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
