//! Command execution logic.
//!
//! One handler per [`Command`] variant. Handlers look names up in the
//! directory index, call the gateway, and turn every gateway failure into
//! the command's own failure line. Nothing here returns an error.

use chrono::{Datelike, Local};
use log::{debug, warn};

use crate::config::{ANONYMOUS_USER, HELP_TEXT, pagers};
use crate::error::GatewayError;
use crate::format::{ListOptions, calendar, format_timestamp, listing, process_table};
use crate::gateway::Gateway;
use crate::models::{EntryId, EntryPatch, NewEntry, ProcessId};
use crate::parser::{AwkArgs, GrepArgs, SedArgs};
use crate::path::PathSegment;
use crate::text::{self, split_lines};

use super::{CdTarget, Command, CommandResult, Context, DirChange, Effect, Navigation, Pager};

/// Printed when the working directory cannot be listed.
pub(crate) const FETCH_FAILED: &str = "Error: Could not fetch files.";

const READ_FAILED: &str = "Error: Could not read file.";

/// Execute a parsed command and return its output and effect.
///
/// The directory index in `ctx` is refreshed in place after every
/// successful mutation. Session-level changes (working directory, capture
/// mode, navigation, clearing) are returned as an [`Effect`], not applied.
pub async fn execute<G>(cmd: Command, ctx: &mut Context<'_, G>) -> CommandResult
where
    G: Gateway + ?Sized,
{
    debug!("execute {:?}", cmd);

    match cmd {
        Command::Ls(opts) => execute_ls(ctx, opts).await,
        Command::Create { name, directory } => execute_create(ctx, &name, directory).await,
        Command::Cat(file) => execute_cat(ctx, &file).await,
        Command::Capture { file, append } => execute_capture(ctx, &file, append).await,
        Command::Page { pager, file } => execute_page(ctx, pager, &file).await,
        Command::Rm(name) => execute_rm(ctx, &name).await,
        Command::Mv { from, to } => execute_mv(ctx, &from, &to).await,
        Command::Cp { from, to } => execute_cp(ctx, &from, &to).await,
        Command::Pwd => CommandResult::line(ctx.path.display()),
        Command::Cd(target) => execute_cd(ctx, target),
        Command::Exec(file) => execute_exec(ctx, &file).await,
        Command::Ps => execute_ps(ctx).await,
        Command::Kill(pid) => execute_kill(ctx, pid).await,
        Command::Pkill(name) => execute_pkill(ctx, &name).await,
        Command::Chmod { permissions, file } => execute_chmod(ctx, permissions, &file).await,
        Command::Whoami => CommandResult::line(
            ctx.user
                .filter(|u| !u.is_empty())
                .unwrap_or(ANONYMOUS_USER),
        ),
        Command::Echo(text) => CommandResult::line(text),
        Command::Date => CommandResult::line(format_timestamp(&Local::now())),
        Command::TimeZone => {
            CommandResult::line(iana_time_zone::get_timezone().unwrap_or_default())
        }
        Command::SetDate => {
            CommandResult::line("Set-Date: This command is not supported in the simulation.")
        }
        Command::Cal => {
            let today = Local::now();
            CommandResult::output(calendar(today.year(), today.month()))
        }
        Command::Quota => execute_quota(ctx).await,
        Command::MemView => CommandResult::effect(Effect::Navigate(Navigation::MemoryViewer)),
        Command::Edit(file) => execute_edit(ctx, &file),
        Command::Clear => CommandResult::effect(Effect::Clear),
        Command::Help => CommandResult::output(HELP_TEXT.lines().map(str::to_string).collect()),
        Command::Grep(args) => execute_grep(ctx, args).await,
        Command::Sed(args) => execute_sed(ctx, args).await,
        Command::Awk(args) => execute_awk(ctx, args).await,
        Command::Usage(text) => CommandResult::line(text),
        Command::Unknown(name) => CommandResult::line(format!("command not found: {}", name)),
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Log a gateway failure and print `line` in its place.
fn gateway_failure(err: &GatewayError, line: impl Into<String>) -> CommandResult {
    let line = line.into();
    warn!("{} ({})", line, err);
    CommandResult::line(line)
}

/// Re-list the working directory after a mutation.
async fn refresh_index<G>(ctx: &mut Context<'_, G>, result: &mut CommandResult)
where
    G: Gateway + ?Sized,
{
    let parent = ctx.path.current_id();
    if let Err(err) = ctx.index.refresh(ctx.gateway, parent).await {
        warn!("refresh of {:?} failed ({})", parent, err);
        result.push(FETCH_FAILED);
    }
}

/// Outcome of resolving a name that must be a file.
enum Lookup {
    Missing,
    Directory,
    File(EntryId),
}

fn lookup_file<G>(ctx: &Context<'_, G>, name: &str) -> Lookup
where
    G: Gateway + ?Sized,
{
    match ctx.index.find(name) {
        None => Lookup::Missing,
        Some(entry) if entry.is_dir => Lookup::Directory,
        Some(entry) => Lookup::File(entry.id),
    }
}

/// Failure wording of commands that read a file by name.
#[derive(Clone, Copy)]
enum Reader {
    /// `cat`, `more`, `head`, `tail`
    Viewer(&'static str),
    /// `grep`, `sed`, `awk`
    Filter(&'static str),
}

impl Reader {
    fn missing(self, file: &str) -> String {
        match self {
            Self::Viewer(cmd) => format!("{}: no such file: {}", cmd, file),
            Self::Filter(cmd) => format!("{}: {}: No such file", cmd, file),
        }
    }

    fn directory(self, file: &str) -> String {
        match self {
            Self::Viewer(cmd) | Self::Filter(cmd) => format!("{}: {}: Is a directory", cmd, file),
        }
    }

    fn failed(self) -> String {
        match self {
            Self::Viewer(_) => READ_FAILED.to_string(),
            Self::Filter(cmd) => format!("{} failed", cmd),
        }
    }
}

/// Fetch the content of `file`, or the line to print instead.
async fn read_named<G>(
    ctx: &Context<'_, G>,
    file: &str,
    reader: Reader,
) -> Result<String, CommandResult>
where
    G: Gateway + ?Sized,
{
    let id = match lookup_file(ctx, file) {
        Lookup::Missing => return Err(CommandResult::line(reader.missing(file))),
        Lookup::Directory => return Err(CommandResult::line(reader.directory(file))),
        Lookup::File(id) => id,
    };

    ctx.gateway
        .read_content(id)
        .await
        .map_err(|err| gateway_failure(&err, reader.failed()))
}

// =============================================================================
// Filesystem
// =============================================================================

async fn execute_ls<G>(ctx: &mut Context<'_, G>, opts: ListOptions) -> CommandResult
where
    G: Gateway + ?Sized,
{
    let parent = ctx.path.current_id();
    if let Err(err) = ctx.index.refresh(ctx.gateway, parent).await {
        return gateway_failure(&err, FETCH_FAILED);
    }
    CommandResult::output(listing(ctx.index.entries(), opts))
}

async fn execute_create<G>(ctx: &mut Context<'_, G>, name: &str, directory: bool) -> CommandResult
where
    G: Gateway + ?Sized,
{
    let parent = ctx.path.current_id();
    let entry = if directory {
        NewEntry::directory(name, parent)
    } else {
        NewEntry::file(name, parent)
    };

    match ctx.gateway.create_entry(entry).await {
        Ok(_) => {
            let mut result = CommandResult::empty();
            refresh_index(ctx, &mut result).await;
            result
        }
        Err(err) => gateway_failure(&err, format!("Error: Could not create {}", name)),
    }
}

async fn execute_cat<G>(ctx: &mut Context<'_, G>, file: &str) -> CommandResult
where
    G: Gateway + ?Sized,
{
    match read_named(ctx, file, Reader::Viewer("cat")).await {
        Ok(content) => CommandResult::text(&content),
        Err(result) => result,
    }
}

/// `cat > f` / `cat >> f`: create `f` if needed, then capture the next line.
async fn execute_capture<G>(ctx: &mut Context<'_, G>, file: &str, append: bool) -> CommandResult
where
    G: Gateway + ?Sized,
{
    let mut result = CommandResult::empty();
    let target = match ctx.index.find(file).cloned() {
        Some(entry) if entry.is_dir => {
            return CommandResult::line(format!("cat: {}: Is a directory", file));
        }
        Some(entry) => entry,
        None => {
            let parent = ctx.path.current_id();
            match ctx.gateway.create_entry(NewEntry::file(file, parent)).await {
                Ok(created) => {
                    refresh_index(ctx, &mut result).await;
                    created
                }
                Err(err) => {
                    return gateway_failure(&err, format!("Error: Could not create {}", file));
                }
            }
        }
    };

    result.push(format!("Enter content for {} and press Enter:", file));
    result.with_effect(Effect::Capture { target, append })
}

async fn execute_page<G>(ctx: &mut Context<'_, G>, pager: Pager, file: &str) -> CommandResult
where
    G: Gateway + ?Sized,
{
    let content = match read_named(ctx, file, Reader::Viewer(pager.name())).await {
        Ok(content) => content,
        Err(result) => return result,
    };

    let lines = split_lines(&content);
    let shown = match pager {
        Pager::More => &lines[..],
        Pager::Head => &lines[..lines.len().min(pagers::HEAD_LINES)],
        Pager::Tail => &lines[lines.len().saturating_sub(pagers::TAIL_LINES)..],
    };
    CommandResult::output(shown.iter().map(|l| l.to_string()).collect())
}

async fn execute_rm<G>(ctx: &mut Context<'_, G>, name: &str) -> CommandResult
where
    G: Gateway + ?Sized,
{
    let Some(id) = ctx.index.find(name).map(|e| e.id) else {
        return CommandResult::line(format!("rm: no such file or directory: {}", name));
    };
    if !ctx
        .confirm
        .confirm(&format!("Are you sure you want to delete {}?", name))
    {
        debug!("rm {} declined", name);
        return CommandResult::empty();
    }

    match ctx.gateway.delete_entry(id).await {
        Ok(()) => {
            let mut result = CommandResult::empty();
            refresh_index(ctx, &mut result).await;
            result
        }
        Err(err) => gateway_failure(&err, format!("Error: Could not remove {}.", name)),
    }
}

async fn execute_mv<G>(ctx: &mut Context<'_, G>, from: &str, to: &str) -> CommandResult
where
    G: Gateway + ?Sized,
{
    let Some(id) = ctx.index.find(from).map(|e| e.id) else {
        return CommandResult::line(format!("mv: no such file or directory: {}", from));
    };

    match ctx.gateway.patch_entry(id, EntryPatch::rename(to)).await {
        Ok(()) => {
            let mut result = CommandResult::empty();
            refresh_index(ctx, &mut result).await;
            result
        }
        Err(err) => gateway_failure(&err, "Error: Operation failed."),
    }
}

async fn execute_cp<G>(ctx: &mut Context<'_, G>, from: &str, to: &str) -> CommandResult
where
    G: Gateway + ?Sized,
{
    let Some(source) = ctx.index.find(from).cloned() else {
        return CommandResult::line(format!("cp: no such file or directory: {}", from));
    };

    let copy = NewEntry {
        name: to.to_string(),
        is_directory: source.is_dir,
        parent: ctx.path.current_id(),
        content: source.content,
    };
    match ctx.gateway.create_entry(copy).await {
        Ok(_) => {
            let mut result = CommandResult::empty();
            refresh_index(ctx, &mut result).await;
            result
        }
        Err(err) => gateway_failure(&err, "Error: Operation failed."),
    }
}

fn execute_cd<G>(ctx: &Context<'_, G>, target: CdTarget) -> CommandResult
where
    G: Gateway + ?Sized,
{
    let change = match target {
        CdTarget::Root => DirChange::Root,
        CdTarget::Up => DirChange::Up,
        CdTarget::Named(name) => match ctx.index.find_dir(&name) {
            Some(dir) => DirChange::Enter(PathSegment::new(dir.id, dir.name.clone())),
            None => return CommandResult::line(format!("cd: no such directory: {}", name)),
        },
    };
    CommandResult::effect(Effect::ChangeDir(change))
}

async fn execute_chmod<G>(ctx: &mut Context<'_, G>, permissions: String, file: &str) -> CommandResult
where
    G: Gateway + ?Sized,
{
    let Some(id) = ctx.index.find(file).map(|e| e.id) else {
        return CommandResult::line(format!(
            "chmod: cannot access '{}': No such file or directory",
            file
        ));
    };

    match ctx
        .gateway
        .patch_entry(id, EntryPatch::permissions(permissions))
        .await
    {
        Ok(()) => {
            let mut result = CommandResult::empty();
            refresh_index(ctx, &mut result).await;
            result.push("");
            result
        }
        Err(err) => gateway_failure(&err, "chmod failed"),
    }
}

fn execute_edit<G>(ctx: &Context<'_, G>, file: &str) -> CommandResult
where
    G: Gateway + ?Sized,
{
    match lookup_file(ctx, file) {
        Lookup::Missing => CommandResult::line(format!("edit: {}: No such file", file)),
        Lookup::Directory => CommandResult::line(format!("edit: {}: Is a directory", file)),
        Lookup::File(id) => CommandResult::effect(Effect::Navigate(Navigation::Editor(id))),
    }
}

async fn execute_quota<G>(ctx: &mut Context<'_, G>) -> CommandResult
where
    G: Gateway + ?Sized,
{
    match ctx.gateway.quota().await {
        Ok(quota) => CommandResult::line(format!(
            "Disk usage: {} / {} bytes",
            quota.used, quota.limit
        )),
        Err(err) => gateway_failure(&err, "quota: failed to fetch quota"),
    }
}

// =============================================================================
// Processes
// =============================================================================

async fn execute_exec<G>(ctx: &mut Context<'_, G>, file: &str) -> CommandResult
where
    G: Gateway + ?Sized,
{
    let id = match lookup_file(ctx, file) {
        Lookup::Missing => return CommandResult::line(format!("exec: no such file: {}", file)),
        Lookup::Directory => {
            return CommandResult::line(format!("exec: {}: Is a directory", file));
        }
        Lookup::File(id) => id,
    };

    match ctx.gateway.create_process(id).await {
        Ok(pid) => CommandResult::line(format!("Process created with PID: {}", pid)),
        Err(err) => gateway_failure(&err, "Error: Could not create process."),
    }
}

async fn execute_ps<G>(ctx: &mut Context<'_, G>) -> CommandResult
where
    G: Gateway + ?Sized,
{
    match ctx.gateway.list_processes().await {
        Ok(rows) => CommandResult::output(process_table(&rows)),
        Err(err) => gateway_failure(&err, "Error: Could not fetch processes."),
    }
}

async fn execute_kill<G>(ctx: &mut Context<'_, G>, pid: ProcessId) -> CommandResult
where
    G: Gateway + ?Sized,
{
    match ctx.gateway.kill_process(pid).await {
        Ok(()) => CommandResult::line(format!("Terminated process {}", pid)),
        Err(err) => gateway_failure(&err, format!("kill: {}: failed", pid)),
    }
}

async fn execute_pkill<G>(ctx: &mut Context<'_, G>, name: &str) -> CommandResult
where
    G: Gateway + ?Sized,
{
    match ctx.gateway.kill_by_name(name).await {
        Ok(killed) => CommandResult::line(format!("Killed {} process(es)", killed)),
        Err(err) => gateway_failure(&err, "pkill failed"),
    }
}

// =============================================================================
// Text Utilities
// =============================================================================

async fn execute_grep<G>(ctx: &mut Context<'_, G>, args: GrepArgs) -> CommandResult
where
    G: Gateway + ?Sized,
{
    match read_named(ctx, &args.file, Reader::Filter("grep")).await {
        Ok(content) => CommandResult::text(&text::grep(
            &split_lines(&content),
            &args.pattern,
            args.options,
        )),
        Err(result) => result,
    }
}

async fn execute_sed<G>(ctx: &mut Context<'_, G>, args: SedArgs) -> CommandResult
where
    G: Gateway + ?Sized,
{
    let content = match read_named(ctx, args.file(), Reader::Filter("sed")).await {
        Ok(content) => content,
        Err(result) => return result,
    };

    match args {
        SedArgs::Delete { pattern, .. } => {
            CommandResult::text(&text::sed_delete(&split_lines(&content), &pattern))
        }
        SedArgs::Substitute {
            old, new, flags, ..
        } => match text::sed_substitute(&content, &old, &new, flags) {
            Ok(edited) => CommandResult::text(&edited),
            Err(err) => {
                warn!("sed pattern {:?} rejected ({})", old, err);
                CommandResult::line("sed failed")
            }
        },
    }
}

async fn execute_awk<G>(ctx: &mut Context<'_, G>, args: AwkArgs) -> CommandResult
where
    G: Gateway + ?Sized,
{
    match read_named(ctx, &args.file, Reader::Filter("awk")).await {
        Ok(content) => CommandResult::text(&text::awk_print(
            &split_lines(&content),
            args.column,
            args.pattern.as_deref(),
        )),
        Err(result) => result,
    }
}

// =============================================================================
// Tests
// =============================================================================
