use std::io;
use std::process;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ccws::config::{Cli, Command, Settings};

mod commands;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CCWS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let settings = Settings::load();

    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        println!();
        return;
    };

    let result = match command {
        Command::Init(args) => commands::cmd_init(&settings, &args),
        Command::Spawn(args) => commands::cmd_spawn(&settings, &args),
        Command::Squad(args) => commands::cmd_squad(&settings, &args),
        Command::Status => commands::cmd_status(&settings),
        Command::Standup(args) => commands::cmd_standup(&settings, &args),
        Command::Teardown(args) => commands::cmd_teardown(&settings, &args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
