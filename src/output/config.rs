//! Output configuration types

/// Configuration for output formatting.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub use_color: bool,
    /// Show file sizes next to file names
    pub show_size: bool,
}
