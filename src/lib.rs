//! rchurch library root.
//! Exposes the CLI parser, the high-level run() function and the internal
//! modules (document store, credential check, schedule aggregation,
//! certificates, push notifications).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::context::Context;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::{AppError, AppResult};

/// Central command dispatcher for everything that needs an open store.
pub fn dispatch(cli: &Cli, ctx: &mut Context) -> AppResult<()> {
    let cmd = &cli.command;
    match cmd {
        Commands::Init | Commands::Shell => Err(AppError::InvalidInput(
            "not available inside the shell".into(),
        )),
        Commands::Config { .. } => commands::config::handle(cmd, &ctx.cfg),
        Commands::Db { .. } => commands::db::handle(cmd, ctx),
        Commands::Log { .. } => commands::log::handle(cmd, ctx),
        Commands::Backup { .. } => commands::backup::handle(cmd, ctx),
        Commands::Export { .. } | Commands::Import { .. } => commands::export::handle(cmd, ctx),
        Commands::Login { .. } | Commands::Logout | Commands::Whoami => {
            commands::auth::handle(cmd, ctx, cli.pass.as_deref())
        }
        Commands::Person { .. } => commands::person::handle(cmd, ctx),
        Commands::Schedule { .. } => commands::schedule::handle(cmd, ctx),
        Commands::Event { .. } => commands::event::handle(cmd, ctx),
        Commands::News { .. } => commands::news::handle(cmd, ctx),
        Commands::Audio { .. } => commands::audio::handle(cmd, ctx),
        Commands::Social { .. } => commands::social::handle(cmd, ctx),
        Commands::Contact { .. } => commands::contact::handle(cmd, ctx),
        Commands::Devotional { .. } => commands::devotional::handle(cmd, ctx),
        Commands::Push { .. } => commands::push::handle(cmd, ctx),
        Commands::Cert { .. } => commands::cert::handle(cmd, ctx),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    // 2️⃣ init creates the config, so it runs before loading it
    if let Commands::Init = cli.command {
        return commands::init::handle(&cli);
    }

    // 3️⃣ load config once, apply the --db override
    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = Config::resolve_db_path(custom_db)
            .to_string_lossy()
            .to_string();
    }

    match cli.command {
        Commands::Config { .. } => return commands::config::handle(&cli.command, &cfg),
        Commands::Shell => return cli::shell::run(cfg),
        _ => {}
    }

    // 4️⃣ one-shot: open the store, authenticate if asked, dispatch
    let mut ctx = Context::open(cfg)?;
    if let Some(user) = &cli.user
        && !matches!(cli.command, Commands::Login { .. })
    {
        ctx.authenticate(user, cli.pass.as_deref())?;
    }

    dispatch(&cli, &mut ctx)
}
