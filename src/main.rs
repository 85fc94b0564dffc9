//! tasklist
//!
//! A minimal todo-list server with a browser client and a command-line
//! client.

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tasklist::cli::{Cli, Command};
use tasklist::client::{BoardController, TodoClient};
use tasklist::config::Config;
use tasklist::db::Database;
use tasklist::logging::{self, LogTarget};
use tasklist::types::TaskId;
use tasklist::web;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let mut config = Config::load_or_default(cli.config.as_deref().map(Path::new))?;
    cli.apply_overrides(&mut config);

    match cli.command {
        Some(Command::Serve) | None => run_server(&config).await?,
        Some(Command::List { filter, remote }) => {
            let mut controller = connect(&remote.url)?;
            controller.refresh().await?;
            controller.set_filter(filter);
            print_board(&controller);
        }
        Some(Command::Add {
            title,
            description,
            priority,
            remote,
        }) => {
            let mut controller = connect(&remote.url)?;
            match controller
                .add(&title, description.as_deref(), priority.as_deref())
                .await?
            {
                Some(task) => println!("Added #{}: {}", task.id, task.title),
                None => anyhow::bail!("Title is required"),
            }
        }
        Some(Command::Done { id, remote }) => set_completed(&remote.url, id, true).await?,
        Some(Command::Undo { id, remote }) => set_completed(&remote.url, id, false).await?,
        Some(Command::Rm { id, remote }) => {
            let mut controller = connect(&remote.url)?;
            controller.remove(id).await?;
            println!("Deleted #{}", id);
        }
    }

    Ok(())
}

async fn run_server(config: &Config) -> Result<()> {
    let addr = config.listen_addr().await?;

    info!(url = %config.database.url, "Opening database");
    let db = Database::connect(&config.database.url)?;

    let handle = web::start_server(Arc::new(db), addr).await?;

    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl-C");
    handle.shutdown().await;

    Ok(())
}

fn connect(url: &str) -> Result<BoardController> {
    Ok(BoardController::new(TodoClient::new(url)?))
}

async fn set_completed(url: &str, id: TaskId, completed: bool) -> Result<()> {
    let mut controller = connect(url)?;
    let task = controller.set_completed(id, completed).await?;
    let state = if task.completed { "completed" } else { "active" };
    println!("#{} is now {}: {}", task.id, state, task.title);
    Ok(())
}

fn print_board(controller: &BoardController) {
    let board = controller.board();
    let (all, active, completed) = board.counts();
    println!("{}", board.render_text());
    if all > 0 {
        println!();
        println!("{} tasks, {} active, {} completed", all, active, completed);
    }
}
