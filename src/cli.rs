//! CLI interface for the service record journey.
//!
//! Drives a journey one page at a time from the command line, which is
//! enough to walk every route without a web front end. Each subcommand is
//! non-interactive: arguments in, plain-text page description out.
//!
//! Commands split into two groups:
//!
//! - `service-record start|sessions|graph`: no session context needed.
//! - `service-record --session <id> <command>`: everything else, operating
//!   on one stored journey.
//!
//! The `--session` flag takes a full UUID or unambiguous prefix.

mod format;
mod input;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jiff::Timestamp;
use tracing::warn;
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::graph::StepGraph;
use crate::journey::{Journey, JourneyError, Submission};
use crate::model::{JourneyState, JourneyStatus, Page, StepId};
use crate::storage::{DirectoryFileStore, FileStore, Session, SessionStore, Storage};
use crate::validate::{RawInput, RawValue, UploadedFile};

use format::{describe_page, format_graph, format_session_line, format_summary};
use input::{PendingUpload, parse_fields, parse_uploads};

/// Service record: request a military service record, one page at a time.
#[derive(Debug, Parser)]
#[command(name = "service-record", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Session ID: full UUID or unambiguous prefix (e.g. `a3b`).
    /// Required for everything except start, sessions, and graph.
    #[arg(long, global = true)]
    session: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: a request for a deceased soldier's record
  1. service-record start
     → prints a session ID (e.g. a3b0fc12)
  2. service-record --session a3b submit --field ready_to_continue=yes
  3. service-record --session a3b submit --field is_service_person_alive=no
  4. service-record --session a3b submit --field service_branch=BRITISH_ARMY
  5. service-record --session a3b submit --field date_of_birth=15/06/1914
  6. service-record --session a3b submit --field do_you_have_a_proof_of_death=yes
  7. service-record --session a3b submit --file proof_of_death=./certificate.jpg
  ...
  service-record --session a3b summary

Dates take DD/MM/YYYY or separate parts:
  --field date_of_birth.day=15 --field date_of_birth.month=6 --field date_of_birth.year=1914"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Begin a new journey. Prints the session ID.
    Start,

    /// Describe the page the session is on.
    Show,

    /// Submit answers for a step.
    ///
    /// Defaults to the step the session is on. Invalid answers are printed
    /// and nothing is stored.
    Submit {
        /// Step path, e.g. `/what-was-their-date-of-birth`.
        path: Option<String>,

        /// A field value. Repeat for each field.
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,

        /// A file to upload for a file field.
        #[arg(long = "file", value_name = "NAME=PATH")]
        files: Vec<String>,
    },

    /// Go straight to a page, e.g. to change an earlier answer.
    Visit {
        /// Page path, e.g. `/choose-your-order-type`.
        path: String,
    },

    /// Go back one page.
    Back,

    /// Exit the form: go to the cancel confirmation.
    Exit,

    /// Continue the request from an outcome page that allows it.
    Continue,

    /// Show the priced order.
    Summary,

    /// Manage stored sessions.
    Sessions {
        #[command(subcommand)]
        command: SessionsCommand,
    },

    /// Print the step graph for the configured revision.
    Graph,
}

#[derive(Debug, Subcommand)]
pub enum SessionsCommand {
    /// List stored sessions.
    List,

    /// Remove sessions idle for longer than the configured TTL.
    Purge,
}

/// Everything a command needs besides its arguments.
struct Context<'a> {
    config: &'a Config,
    storage: &'a Storage,
    journey: Journey<SystemClock>,
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config, storage: &Storage) -> Result<(), String> {
    let cli = Cli::parse();

    let graph =
        StepGraph::build(config.revision).map_err(|e| format!("failed to build journey: {e}"))?;
    let ctx = Context {
        config,
        storage,
        journey: Journey::new(graph, config.prices(), SystemClock),
    };

    let session_ref = cli.session.as_deref();

    match cli.command {
        Command::Start => cmd_start(&ctx),
        Command::Show => cmd_show(&ctx, &require_session(&ctx, session_ref)?),
        Command::Submit { path, fields, files } => {
            let session = require_session(&ctx, session_ref)?;
            cmd_submit(&ctx, session, path.as_deref(), &fields, &files)
        }
        Command::Visit { path } => cmd_visit(&ctx, require_session(&ctx, session_ref)?, &path),
        Command::Back => cmd_back(&ctx, require_session(&ctx, session_ref)?),
        Command::Exit => cmd_exit(&ctx, require_session(&ctx, session_ref)?),
        Command::Continue => cmd_continue(&ctx, require_session(&ctx, session_ref)?),
        Command::Summary => cmd_summary(&ctx, &require_session(&ctx, session_ref)?),
        Command::Sessions { command } => match command {
            SessionsCommand::List => cmd_list(&ctx),
            SessionsCommand::Purge => cmd_purge(&ctx),
        },
        Command::Graph => {
            print!("{}", format_graph(ctx.journey.graph()));
            Ok(())
        }
    }
}

// ── Session lifecycle ──

fn cmd_start(ctx: &Context<'_>) -> Result<(), String> {
    let state = ctx.journey.start();
    let session = Session::new(state, Timestamp::now());

    ctx.storage
        .create_session(&session)
        .map_err(|e| format!("failed to create session: {e}"))?;

    println!("{}", session.id);
    print_current(ctx, &session.state);
    Ok(())
}

fn cmd_list(ctx: &Context<'_>) -> Result<(), String> {
    let sessions = ctx
        .storage
        .list_sessions()
        .map_err(|e| format!("failed to list sessions: {e}"))?;

    if sessions.is_empty() {
        println!("No sessions");
        return Ok(());
    }

    for s in &sessions {
        println!("{}", format_session_line(s));
    }

    Ok(())
}

fn cmd_purge(ctx: &Context<'_>) -> Result<(), String> {
    let cutoff = Timestamp::now()
        .checked_sub(ctx.config.session_ttl())
        .map_err(|e| format!("invalid session TTL: {e}"))?;

    let purged = ctx
        .storage
        .purge_idle(cutoff)
        .map_err(|e| format!("failed to purge sessions: {e}"))?;

    eprintln!("Purged {purged} idle session(s)");
    Ok(())
}

/// Require that `--session` was provided, resolve it, and check it is live.
fn require_session(ctx: &Context<'_>, session_ref: Option<&str>) -> Result<Session, String> {
    let session_ref = session_ref.ok_or("this command requires --session <id>")?;
    let session = resolve_session(ctx.storage, session_ref)?;

    let idle = Timestamp::now().duration_since(session.updated_at);
    if idle > ctx.config.session_ttl() {
        warn!(session = %session.id, "refused expired session");
        return Err(format!(
            "session {} has expired; start a new one",
            short_id(session.id)
        ));
    }

    Ok(session)
}

/// Persist a new state for `session`.
fn save(ctx: &Context<'_>, mut session: Session, state: JourneyState) -> Result<Session, String> {
    session.state = state;
    session.updated_at = Timestamp::now();
    ctx.storage
        .update_session(&session)
        .map_err(|e| format!("failed to save session: {e}"))?;
    Ok(session)
}

// ── Navigation ──

fn cmd_show(ctx: &Context<'_>, session: &Session) -> Result<(), String> {
    print_current(ctx, &session.state);
    Ok(())
}

fn cmd_submit(
    ctx: &Context<'_>,
    session: Session,
    path: Option<&str>,
    fields: &[String],
    files: &[String],
) -> Result<(), String> {
    let step = match path {
        Some(p) => parse_page(p)?
            .as_step()
            .ok_or_else(|| format!("'{p}' is not a step with answers to submit"))?,
        None => session
            .state
            .current_page()
            .and_then(Page::as_step)
            .ok_or("the current page takes no answers; pass a step path")?,
    };

    let node = ctx.journey.graph().node(step).map_err(|e| e.to_string())?;
    let mut raw = parse_fields(&node.form, fields)?;
    let uploads = parse_uploads(&node.form, files)?;
    for upload in &uploads {
        raw.insert(upload.field, RawValue::File(upload.file.clone()));
    }

    let (store, references) = if uploads.is_empty() {
        (None, Vec::new())
    } else {
        let store = DirectoryFileStore::new(uploads_root(ctx))
            .map_err(|e| format!("failed to open upload store: {e}"))?;
        let references =
            store_uploads(&ctx.journey, &session.state, step, &mut raw, uploads, &store)?;
        (Some(store), references)
    };
    let discard = || {
        if let Some(store) = &store {
            discard_uploads(store, &references);
        }
    };

    let (state, submission) = ctx
        .journey
        .submit(step, &raw, &session.state)
        .map_err(|e| format!("submit failed: {e}"))
        .inspect_err(|_| discard())?;

    match submission {
        Submission::Advanced(_) => {
            let session = save(ctx, session, state).inspect_err(|_| discard())?;
            print_current(ctx, &session.state);
            Ok(())
        }
        Submission::Rejected(errors) => {
            discard();
            print!(
                "{}",
                describe_page(&ctx.journey, &state, Page::Step(step), Some(&errors))
            );
            Err(format!(
                "there is a problem: {} field error(s)",
                errors.number_of_errors()
            ))
        }
    }
}

/// Store `uploads` and point `raw` at them. Nothing is written unless
/// `step` is open to this journey and would accept the input.
///
/// Returns the references stored.
fn store_uploads<C: Clock>(
    journey: &Journey<C>,
    state: &JourneyState,
    step: StepId,
    raw: &mut RawInput,
    uploads: Vec<PendingUpload>,
    store: &impl FileStore,
) -> Result<Vec<String>, String> {
    if state.has_started() && !state.is_active() {
        return Err(format!("submit failed: {}", JourneyError::Ended));
    }
    if !journey.is_reachable(Page::Step(step), state) {
        return Err(format!(
            "submit failed: {}",
            JourneyError::Unreachable(Page::Step(step))
        ));
    }
    let valid = journey
        .validate(step, raw)
        .map_err(|e| e.to_string())?
        .is_valid();
    if !valid {
        return Ok(Vec::new());
    }

    let mut references = Vec::new();
    for upload in uploads {
        let stored = std::fs::read(&upload.path)
            .map_err(|e| format!("failed to read {}: {e}", upload.path.display()))
            .and_then(|bytes| {
                store
                    .store(&upload.file.filename, &bytes)
                    .map_err(|e| format!("failed to store {}: {e}", upload.file.filename))
            });
        let reference = match stored {
            Ok(reference) => reference,
            Err(e) => {
                discard_uploads(store, &references);
                return Err(e);
            }
        };
        references.push(reference.clone());
        raw.insert(
            upload.field,
            RawValue::File(UploadedFile {
                reference: Some(reference),
                ..upload.file
            }),
        );
    }
    Ok(references)
}

/// Remove uploads whose submission never landed.
fn discard_uploads(store: &impl FileStore, references: &[String]) {
    for reference in references {
        if let Err(e) = store.remove(reference) {
            warn!(%reference, error = %e, "failed to remove orphaned upload");
        }
    }
}

fn cmd_visit(ctx: &Context<'_>, session: Session, path: &str) -> Result<(), String> {
    let page = parse_page(path)?;
    let state = ctx
        .journey
        .visit(page, &session.state)
        .map_err(|e| e.to_string())?;
    let session = save(ctx, session, state)?;
    print_current(ctx, &session.state);
    Ok(())
}

fn cmd_back(ctx: &Context<'_>, session: Session) -> Result<(), String> {
    let (state, _) = ctx
        .journey
        .back(&session.state)
        .map_err(|e| e.to_string())?;
    let session = save(ctx, session, state)?;
    print_current(ctx, &session.state);
    Ok(())
}

fn cmd_exit(ctx: &Context<'_>, session: Session) -> Result<(), String> {
    let (state, _) = ctx
        .journey
        .exit(&session.state)
        .map_err(|e| e.to_string())?;
    let session = save(ctx, session, state)?;
    print_current(ctx, &session.state);
    Ok(())
}

fn cmd_continue(ctx: &Context<'_>, session: Session) -> Result<(), String> {
    let (state, _) = ctx
        .journey
        .continue_request(&session.state)
        .map_err(|e| e.to_string())?;
    let session = save(ctx, session, state)?;
    print_current(ctx, &session.state);
    Ok(())
}

fn cmd_summary(ctx: &Context<'_>, session: &Session) -> Result<(), String> {
    let summary = ctx
        .journey
        .order_summary(&session.state)
        .ok_or("no order type has been chosen yet")?;
    print!("{}", format_summary(&summary, &session.state.answers));
    if let JourneyStatus::Ended { outcome, .. } = &session.state.status {
        println!("Journey ended: {}", outcome.heading());
    }
    Ok(())
}

// ── Helpers ──

fn print_current(ctx: &Context<'_>, state: &JourneyState) {
    if let Some(page) = state.current_page() {
        print!("{}", describe_page(&ctx.journey, state, page, None));
    }
}

fn parse_page(path: &str) -> Result<Page, String> {
    Page::from_path(path).ok_or_else(|| format!("no page at '{path}'"))
}

fn uploads_root(ctx: &Context<'_>) -> PathBuf {
    ctx.config
        .uploads_root
        .clone()
        .unwrap_or_else(|| ctx.storage.uploads_dir())
}

fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

/// Resolve a session reference (full UUID or unambiguous prefix) to a session.
fn resolve_session(storage: &Storage, reference: &str) -> Result<Session, String> {
    // Try full UUID first.
    if let Ok(id) = reference.parse::<Uuid>() {
        return storage
            .load_session(id)
            .map_err(|e| format!("session not found: {e}"));
    }

    // Try as a prefix match against all sessions.
    let sessions = storage
        .list_sessions()
        .map_err(|e| format!("failed to list sessions: {e}"))?;

    let matches: Vec<&Session> = sessions
        .iter()
        .filter(|s| s.id.to_string().starts_with(reference))
        .collect();

    match matches.len() {
        0 => Err(format!("no session matching '{reference}'")),
        1 => Ok(matches[0].clone()),
        n => {
            let ids: Vec<String> = matches.iter().map(|s| short_id(s.id)).collect();
            Err(format!(
                "'{reference}' is ambiguous: matches {n} sessions: {}",
                ids.join(", ")
            ))
        }
    }
}
