pub(crate) mod error;

pub use error::{Error, Result};
