//! Command dispatch.

mod alert;
mod config_cmd;
mod logs;
mod report;
mod status;
mod util;
mod vehicle;
mod watch;

use clap::CommandFactory;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { global, command } = cli;

    match command {
        Command::Status => status::run(&global).await,
        Command::Watch(args) => watch::run(&global, &args).await,
        Command::Vehicle(args) => vehicle::run(&global, args.command).await,
        Command::Alert(args) => alert::run(&global, args.command).await,
        Command::Logs(args) => logs::run(&global, args.command).await,
        Command::Report(args) => report::run(&global, args).await,
        Command::Config(args) => config_cmd::run(&global, args.command),
        Command::Completions(args) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                "fuelwatch",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
