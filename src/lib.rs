pub mod auth;
pub mod quiz;
pub mod server;
pub mod settings;
pub mod telemetry;
