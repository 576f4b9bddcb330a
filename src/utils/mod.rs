pub mod config;
pub mod constants;
pub mod env;
pub mod multi_map;
pub mod progress_bars;
