//! Interactive shell.
//!
//! Keeps one store (with cache), one session and one generation counter for
//! its whole lifetime, so `login` once and then run any subcommand.

use crate::cli::context::Context;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::dispatch;
use crate::errors::AppResult;
use crate::ui::messages::{error, info, warning};
use clap::Parser;
use std::io::{self, BufRead, Write};

const PROMPT: &str = "rchurch> ";

/// What one input line asks for.
#[derive(Debug)]
pub enum Line {
    Empty,
    Exit,
    Command(Box<Cli>),
    /// clap usage/help text or a tokenizer error, ready to print
    Invalid(String),
}

pub fn parse_line(line: &str) -> Line {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Line::Empty;
    }
    if matches!(trimmed, "exit" | "quit" | "\\q") {
        return Line::Exit;
    }

    let words = match shell_words::split(trimmed) {
        Ok(w) => w,
        Err(e) => return Line::Invalid(format!("cannot parse line: {}", e)),
    };

    let argv = std::iter::once("rchurch".to_string()).chain(words);
    match Cli::try_parse_from(argv) {
        Ok(cli) => Line::Command(Box::new(cli)),
        Err(e) => Line::Invalid(e.render().to_string()),
    }
}

pub fn run(cfg: Config) -> AppResult<()> {
    let mut ctx = Context::open_interactive(cfg)?;
    // Ctrl-C stops a running command, not the shell
    if let Err(e) = ctx.generation.advance_on_interrupt() {
        warning(format!("Ctrl-C handler not installed: {}", e));
    }
    info("rchurch shell. Type `help` for commands, `exit` to leave. Ctrl-C stops a push send.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}", PROMPT);
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };

        match parse_line(&line?) {
            Line::Empty => {}
            Line::Exit => break,
            Line::Invalid(msg) => println!("{}", msg.trim_end()),
            Line::Command(cli) => {
                if let Err(e) = run_one(&cli, &mut ctx) {
                    error(e);
                }
                // member edits made by this command
                if let Err(e) = ctx.sync_session() {
                    warning(format!("session refresh failed: {}", e));
                }
            }
        }
    }

    if let Some(c) = ctx.store.cache_stats() {
        log::debug!(
            "shell cache: {} hit(s), {} miss(es), {} invalidation(s)",
            c.hits,
            c.misses,
            c.invalidations
        );
    }
    if let Some(s) = ctx.session.logout() {
        info(format!("Session closed for {}", s.profile.display_name));
    }
    Ok(())
}

fn run_one(cli: &Cli, ctx: &mut Context) -> AppResult<()> {
    if cli.db.is_some() {
        warning("--db is ignored inside the shell.");
    }
    if let Some(user) = &cli.user
        && !matches!(cli.command, Commands::Login { .. })
    {
        ctx.authenticate(user, cli.pass.as_deref())?;
    }
    // each command is a new request; older in-flight work is now stale
    ctx.generation.advance();
    dispatch(cli, ctx)
}
