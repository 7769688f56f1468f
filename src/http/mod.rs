pub mod app_error;
pub mod dataset;
pub mod health;
pub mod server;
pub mod state;
