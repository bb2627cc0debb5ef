//! HTTP serving: the [`App`] with its middleware, and the [`server()`] entry point that binds a
//! listener and handles shutdown signals.

mod app;
mod middleware;
mod server;

pub use app::App;
pub use server::server;
