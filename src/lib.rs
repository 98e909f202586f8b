pub mod config;
pub mod error;
pub mod interactive;
pub mod pipeline;
pub mod subtitle;
pub mod translate;

pub use config::Config;
pub use error::{Result, SubzhError};
pub use pipeline::{print_summary, translate_file, PipelineOptions, PipelineResult};
