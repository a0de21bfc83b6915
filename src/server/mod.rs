pub mod app;
mod htmx;
mod routes;
mod session;
mod views;

pub use session::{SessionStore, SESSION_COOKIE};
