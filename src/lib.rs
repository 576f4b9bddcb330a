pub mod downloads;
pub mod input;
pub mod matching;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod utils;
