//! CLI command definitions for tasklist
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::types::{Filter, TaskId};

/// Server URL used by the client commands when none is given.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Task list server and command-line client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (default: ./tasklist.yaml if present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Database connection string (overrides config and DATABASE_URL)
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Address to bind (overrides config and HOST)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Port to listen on (overrides config and PORT)
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Apply command-line overrides on top of file and environment settings.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.database {
            config.database.url = url.clone();
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the server (default if no subcommand given)
    Serve,

    /// List tasks from a running server
    List {
        /// Which tasks to show: all, active or completed
        #[arg(short, long, default_value = "all")]
        filter: Filter,

        #[command(flatten)]
        remote: RemoteArgs,
    },

    /// Add a task
    Add {
        /// Task title
        title: String,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,

        /// Priority: low, medium or high
        #[arg(short, long)]
        priority: Option<String>,

        #[command(flatten)]
        remote: RemoteArgs,
    },

    /// Mark a task completed
    Done {
        id: TaskId,

        #[command(flatten)]
        remote: RemoteArgs,
    },

    /// Mark a task active again
    Undo {
        id: TaskId,

        #[command(flatten)]
        remote: RemoteArgs,
    },

    /// Delete a task
    Rm {
        id: TaskId,

        #[command(flatten)]
        remote: RemoteArgs,
    },
}

/// Where the client commands send their requests.
#[derive(Args, Debug, Clone)]
pub struct RemoteArgs {
    /// Base URL of the tasklist server
    #[arg(long, env = "TASKLIST_URL", default_value = DEFAULT_SERVER_URL)]
    pub url: String,
}
