//! Built-in checks

pub mod build_info;
pub mod config;
pub mod pipeline;

pub use build_info::BuildInfoCheck;
pub use config::ConfigCheck;
pub use pipeline::PipelineCheck;
