//! Todo client: the board view-controller and the HTTP client feeding it.

pub mod api;
pub mod board;

pub use api::{BoardController, ClientError, TodoClient};
pub use board::{LOAD_FAILURE_HTML, TodoBoard, html_escape};
