mod common;
mod gpu;
mod image;
mod ops;

pub mod prelude;

pub use prelude::*;
