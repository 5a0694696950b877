//! Command implementations

pub mod acft;
pub mod completions;
pub mod config;
pub mod part;
pub mod report;
pub mod session;
pub mod shell;
pub mod stage;
pub mod status;
pub mod test;
pub mod user;

use miette::Result;

use crate::cli::{Cli, Commands, GlobalOpts};
use crate::core::logging::{init_logging, Verbosity};
use crate::core::{Config, Workspace};

/// Entry point used by `main`: set up logging and config, then run one command
pub fn run(cli: Cli) -> Result<()> {
    let Cli {
        command,
        mut global,
    } = cli;

    init_logging(Verbosity::from_flags(global.quiet, global.verbose));
    let config = Config::load();
    global.apply_config(&config);

    // These never touch the session, so skip the automatic login
    let needs_session = !matches!(
        command,
        Commands::Config(_) | Commands::Completions(_) | Commands::Login(_)
    );

    let mut ws = Workspace::seeded(config);
    if needs_session {
        session::auto_login(&mut ws, &global)?;
    }

    match command {
        Commands::Shell => shell::run(&mut ws, &global),
        command => dispatch(command, &mut ws, &global),
    }
}

/// Run one parsed command against a workspace
pub fn dispatch(command: Commands, ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    match command {
        Commands::Login(args) => session::run_login(args, ws, global),
        Commands::Logout => session::run_logout(ws, global),
        Commands::Whoami => session::run_whoami(ws, global),
        Commands::Acft(cmd) => acft::run(cmd, ws, global),
        Commands::Stage(cmd) => stage::run(cmd, ws, global),
        Commands::Part(cmd) => part::run(cmd, ws, global),
        Commands::Test(cmd) => test::run(cmd, ws, global),
        Commands::User(cmd) => user::run(cmd, ws, global),
        Commands::Report(cmd) => report::run(cmd, ws, global),
        Commands::Status(args) => status::run(args, ws, global),
        Commands::Shell => Err(miette::miette!("already inside an aerocode shell")),
        Commands::Config(cmd) => config::run(cmd, ws.config(), global),
        Commands::Completions(args) => completions::run(args),
    }
}
