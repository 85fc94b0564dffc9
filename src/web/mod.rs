//! Web server: REST API over the task store plus the browser client.

pub mod server;
pub mod templates;

pub use server::{ServerHandle, TodoServer, build_router, start_server};
