mod analyzer;
pub use analyzer::{Analyzer, BackendHandle};
