pub mod config;

pub use config::{config_dir, config_path, read_config, write_config};
