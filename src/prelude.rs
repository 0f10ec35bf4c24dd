// Error handling
pub use crate::common::{Error, Result};

// Image types
pub use crate::image::{ChannelCount, Image, ImageDesc, OutputFormat};

// Operations
pub use crate::ops::{CumulativeTables, HistEq, Histograms, BINS};

// OpenCL plumbing
pub use crate::gpu::{program_path_for_exe, GpuHistEqPipeline, OclContext};
