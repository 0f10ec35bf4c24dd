mod hist_eq;

pub use hist_eq::{CumulativeTables, HistEq, Histograms, BINS};
