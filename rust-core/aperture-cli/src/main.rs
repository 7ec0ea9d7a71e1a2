// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! aperture: inspect the studio permission matrix from the command line.
//!
//! Every subcommand is a thin wrapper around the query API in
//! `aperture-authz`, so what the tool prints is what the application
//! enforces.

mod formatter;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use aperture_authz::{AccessConfig, AccessDecision, Actor, AuditLog, Evaluator, Session};
use aperture_model::{Permission, Resource, Role};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use formatter::{format_report, OutputFormat};
use report::{
    ActionsReport, CheckReport, ManageReport, MatrixReport, PageReport, PagesReport, RolesReport,
};

/// Version string, pulled from Cargo.toml at compile time.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Actor id used for the throwaway session behind `check` and `page`.
const CLI_ACTOR: &str = "aperture-cli";

// ---------------------------------------------------------------------------
// CLI argument parsing
// ---------------------------------------------------------------------------

/// Studio permission inspector.
#[derive(Parser, Debug)]
#[command(name = "aperture", version = VERSION, about = "Inspect studio roles and permissions")]
struct Cli {
    /// Output format: table or json.
    #[arg(long, global = true, default_value = "table")]
    format: OutputFormat,

    /// JSON access configuration. Environment overrides apply on top.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Effective actions for every role and resource.
    Matrix,
    /// Check a single `resource::action` permission for a role.
    Check { role: Role, permission: Permission },
    /// Check whether a role may open a page.
    Page { role: Role, page: String },
    /// Role-management checks between an acting and a target role.
    Manage { acting: Role, target: Role },
    /// Actions a role may perform on a resource.
    Actions { role: Role, resource: Resource },
    /// Known pages, their gates and who can open them.
    Pages,
    /// Roles with level and manageable roles.
    Roles,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    debug!(?config, "effective configuration");

    let decision = run(cli.command, &config, cli.format)?;
    if decision == AccessDecision::Denied && cli.format == OutputFormat::Table {
        eprintln!("{}", "DENIED".red().bold());
    }
    Ok(ExitCode::from(exit_status(decision)))
}

/// Exit status for a decision: 0 when allowed, 1 when denied.
fn exit_status(decision: AccessDecision) -> u8 {
    match decision {
        AccessDecision::Allowed => 0,
        AccessDecision::Denied => 1,
    }
}

/// Execute one subcommand, printing its report.
fn run(
    command: Command,
    config: &AccessConfig,
    format: OutputFormat,
) -> anyhow::Result<AccessDecision> {
    let engine = Evaluator::studio();

    let decision = match command {
        Command::Matrix => emit(&MatrixReport::build(&engine), format)?,
        Command::Pages => emit(&PagesReport::build(&engine), format)?,
        Command::Roles => emit(&RolesReport::build(&engine), format)?,
        Command::Actions { role, resource } => {
            emit(&ActionsReport::build(&engine, role, resource), format)?
        }
        Command::Manage { acting, target } => {
            let report = ManageReport::build(&engine, acting, target);
            emit(&report, format)?;
            AccessDecision::from(report.can_manage_role)
        }
        Command::Check { role, permission } => {
            let session = bound_session(config, role)?;
            if let Err(e) = session.require_permission(permission) {
                debug!(error = %e, "permission check denied");
            }
            let mut report = CheckReport::build(&engine, role, permission);
            report.audit = session.audit_log().map(AuditLog::entries).unwrap_or_default();
            emit(&report, format)?;
            report.decision
        }
        Command::Page { role, page } => {
            let session = bound_session(config, role)?;
            if let Err(e) = session.require_page(&page) {
                debug!(error = %e, "page check denied");
            }
            let mut report = PageReport::build(&engine, role, &page);
            report.audit = session.audit_log().map(AuditLog::entries).unwrap_or_default();
            emit(&report, format)?;
            report.decision
        }
    };
    Ok(decision)
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<AccessConfig> {
    let base = match path {
        Some(path) => AccessConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AccessConfig::default(),
    };
    base.with_env_overrides()
        .context("applying environment overrides")
}

fn bound_session(config: &AccessConfig, role: Role) -> anyhow::Result<Session<'static>> {
    let mut session = Session::from_config(config);
    session.login(Actor::new(CLI_ACTOR, role))?;
    Ok(session)
}

/// Print a report and treat it as an allowed outcome.
fn emit<R>(report: &R, format: OutputFormat) -> anyhow::Result<AccessDecision>
where
    R: serde::Serialize + report::Render,
{
    println!("{}", format_report(report, format)?);
    Ok(AccessDecision::Allowed)
}
