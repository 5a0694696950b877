//! `aerocode login`, `logout` and `whoami`

use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{password_or_prompt, print_serialized, styled_label};
use crate::cli::GlobalOpts;
use crate::core::entity::Labeled;
use crate::core::{Module, Permission, User, Workspace};

#[derive(clap::Args, Debug)]
pub struct LoginArgs {
    /// Username (admin, engenheiro or operador)
    pub username: String,
}

/// What `whoami` reports
#[derive(Debug, Serialize)]
struct Identity<'a> {
    user: &'a User,
    modules: Vec<&'static str>,
    permissions: Vec<&'static str>,
}

/// Log in from --user/--password before the command runs
pub fn auto_login(ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    let Some(username) = global.user.as_deref() else {
        return Ok(());
    };
    let password = password_or_prompt(global.password.clone(), username)?;
    ws.login(username, &password)?;
    Ok(())
}

pub fn run_login(args: LoginArgs, ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    let password = password_or_prompt(global.password.clone(), &args.username)?;
    let user = ws.login(&args.username, &password)?;

    if !global.quiet {
        println!(
            "{} Logged in as {} ({})",
            style("✓").green(),
            style(&user.name).cyan(),
            styled_label(user.level.label(), user.level.tone())
        );
    }
    Ok(())
}

pub fn run_logout(ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    let was = ws.session().current_user().map(|u| u.name.clone());
    ws.logout();

    if !global.quiet {
        match was {
            Some(name) => println!("{} Logged out {}", style("✓").green(), style(name).cyan()),
            None => println!("Not logged in."),
        }
    }
    Ok(())
}

pub fn run_whoami(ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    let session = ws.session();
    let Some(user) = session.current_user() else {
        println!("Not logged in.");
        return Ok(());
    };

    let identity = Identity {
        user,
        modules: Module::ALL
            .iter()
            .filter(|m| session.can_access(**m))
            .map(|m| m.name())
            .collect(),
        permissions: Permission::ALL
            .iter()
            .filter(|p| session.can(**p))
            .map(|p| p.description())
            .collect(),
    };

    if print_serialized(&identity, global.format)? {
        return Ok(());
    }

    println!(
        "{} ({}) #{}",
        style(&user.name).cyan().bold(),
        styled_label(user.level.label(), user.level.tone()),
        user.id
    );
    println!("{}: {}", style("Modules").bold(), identity.modules.join(", "));
    println!(
        "{}: {}",
        style("May").bold(),
        if identity.permissions.is_empty() {
            "read only".to_string()
        } else {
            identity.permissions.join(", ")
        }
    );
    Ok(())
}
