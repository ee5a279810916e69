pub mod config;
mod content;
mod gate;
mod http_layers;
mod params;
mod reply;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use http_layers::*;
pub use server::{make_app, run_server};
