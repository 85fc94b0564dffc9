//! tasklist library
//!
//! Task store (SQLite and in-memory), the HTTP API with its browser
//! client, and a Rust client for the same API.

pub mod cli;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod store;
pub mod types;
pub mod web;
