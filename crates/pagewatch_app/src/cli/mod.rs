mod app;
mod args;
mod config;
mod render;

pub use app::run;
pub use args::Args;
