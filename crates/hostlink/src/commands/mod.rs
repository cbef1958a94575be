//! Command dispatch. Each handler takes the service it needs; only
//! `attach`, `verify` and `alias` require provider credentials.

pub mod attach;
pub mod config_cmd;
pub mod domains;
pub mod util;
pub mod verify;

use clap::CommandFactory;
use hostlink_config::Config;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

pub async fn dispatch(
    cmd: Command,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<(), CliError> {
    match cmd {
        Command::Attach(args) => {
            let service = config::connected_service(global, cfg)?;
            attach::handle(&service, args, global).await
        }
        Command::Verify(args) => {
            let service = config::connected_service(global, cfg)?;
            verify::handle(&service, args, global).await
        }
        Command::Alias(args) => {
            let service = config::connected_service(global, cfg)?;
            attach::handle_alias(&service, args, global).await
        }
        Command::Get(args) => {
            let service = config::offline_service(global, cfg)?;
            domains::handle_get(&service, &args, global).await
        }
        Command::List => {
            let service = config::offline_service(global, cfg)?;
            domains::handle_list(&service, global).await
        }
        Command::Classify(args) => domains::handle_classify(&args, global),
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(args) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "hostlink", &mut std::io::stdout());
            Ok(())
        }
    }
}
