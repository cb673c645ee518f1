//! Configuration loading and management.

mod file;
mod paths;
mod types;
mod validate;

pub use file::{load_color_mapping, load_config_file, save_color_mapping, save_config};
pub use paths::{config_dir, config_file_path};
pub use types::{Config, OutputMode};
pub use validate::{validate_config, validate_window};
