use clap::Parser;
use std::process::ExitCode;

use luna::LunaError;
use luna::cli::{Cli, Command};
use luna::config::{default_db_path, load_config};
use luna::journal;
use luna::status;

fn run() -> Result<(), LunaError> {
    let cli = Cli::parse();
    let config = load_config()?;
    let db_path = cli.db.unwrap_or_else(default_db_path);

    match &cli.command {
        Command::Log(args) => journal::handle_log(&db_path, &config, args),
        Command::Show(args) => journal::handle_show(&db_path, &config, args),
        Command::Delete(args) => journal::handle_delete(&db_path, &config, args),
        Command::List(args) => journal::handle_list(&db_path, &config, args),
        Command::Stats(args) => journal::handle_stats(&db_path, &config, args),
        Command::Calendar(args) => journal::handle_calendar(&db_path, &config, args),
        Command::Cycle(args) => journal::handle_cycle(&db_path, &config, args),
        Command::Advise => journal::handle_advise(&db_path, &config),
        Command::Status => status::handle_status(&db_path, &config.storage),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("LUNA_LOG", "warn")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("luna: {e}");
            ExitCode::from(1)
        }
    }
}
