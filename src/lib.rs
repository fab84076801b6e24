pub mod app;
pub mod cli;
pub mod form;
pub mod map;
pub mod render;
pub mod store;
pub mod types;
pub mod utils;
