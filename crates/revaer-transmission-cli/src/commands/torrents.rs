use std::path::Path;

use anyhow::anyhow;
use revaer_transmission::{AddTorrent, Selector, TorrentSource};

use crate::cli::{AddArgs, IdsArgs, ListArgs, MoveArgs, QueueCommand, RemoveArgs, StartArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_ack, render_added, render_torrent_list};

/// Fields fetched by `ls` when none are requested explicitly.
pub(crate) const DEFAULT_LIST_FIELDS: &[&str] = &[
    "id",
    "name",
    "status",
    "percentDone",
    "rateDownload",
    "rateUpload",
];

/// Selector-only torrent actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TorrentAction {
    Stop,
    Verify,
    Reannounce,
}

impl TorrentAction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Verify => "verify",
            Self::Reannounce => "reannounce",
        }
    }
}

fn selector(args: &IdsArgs) -> Selector {
    Selector::parse_tokens(&args.ids)
}

pub(crate) fn handle_list(ctx: &AppContext, args: &ListArgs) -> CliResult<()> {
    let fields: Vec<&str> = if args.fields.is_empty() {
        DEFAULT_LIST_FIELDS.to_vec()
    } else {
        args.fields.iter().map(String::as_str).collect()
    };
    let torrents = ctx.client.get_torrents(&selector(&args.target), &fields)?;
    render_torrent_list(&torrents, ctx.output)
}

pub(crate) fn handle_add(ctx: &AppContext, args: AddArgs) -> CliResult<()> {
    let source = args.source.trim();
    if source.is_empty() {
        return Err(CliError::validation("source must not be empty"));
    }

    let mut request = AddTorrent::new(resolve_source(source)?);
    request.download_dir = args.download_dir;
    request.paused = args.paused.then_some(true);
    request.labels = args.labels;

    let added = ctx.client.add_torrent(&request)?;
    render_added(&added, ctx.output)
}

/// Magnet links and URLs are fetched by the daemon; anything else is read locally.
fn resolve_source(source: &str) -> CliResult<TorrentSource> {
    if source.starts_with("magnet:") || source.contains("://") {
        return Ok(TorrentSource::Filename(source.to_string()));
    }
    let path = Path::new(source);
    let bytes = std::fs::read(path).map_err(|err| {
        CliError::failure(anyhow!(
            "failed to read torrent file '{}': {err}",
            path.display()
        ))
    })?;
    Ok(TorrentSource::metainfo_bytes(&bytes))
}

pub(crate) fn handle_start(ctx: &AppContext, args: &StartArgs) -> CliResult<()> {
    let selector = selector(&args.target);
    if args.now {
        ctx.client.start_now(&selector)?;
        render_ack("start-now", ctx.output)
    } else {
        ctx.client.start(&selector)?;
        render_ack("start", ctx.output)
    }
}

pub(crate) fn handle_action(
    ctx: &AppContext,
    action: TorrentAction,
    args: &IdsArgs,
) -> CliResult<()> {
    let selector = selector(args);
    match action {
        TorrentAction::Stop => ctx.client.stop(&selector)?,
        TorrentAction::Verify => ctx.client.verify(&selector)?,
        TorrentAction::Reannounce => ctx.client.reannounce(&selector)?,
    }
    render_ack(action.as_str(), ctx.output)
}

pub(crate) fn handle_remove(ctx: &AppContext, args: &RemoveArgs) -> CliResult<()> {
    if args.target.ids.is_empty() {
        return Err(CliError::validation(
            "remove requires at least one torrent id or hash",
        ));
    }
    ctx.client
        .remove_torrents(&selector(&args.target), args.delete_data)?;
    render_ack("remove", ctx.output)
}

pub(crate) fn handle_move(ctx: &AppContext, args: &MoveArgs) -> CliResult<()> {
    if args.target.ids.is_empty() {
        return Err(CliError::validation(
            "move requires at least one torrent id or hash",
        ));
    }
    ctx.client
        .set_location(&selector(&args.target), &args.location, !args.no_move)?;
    render_ack("move", ctx.output)
}

pub(crate) fn handle_queue(ctx: &AppContext, command: &QueueCommand) -> CliResult<()> {
    let (label, args) = match command {
        QueueCommand::Top(args) => ("queue top", args),
        QueueCommand::Up(args) => ("queue up", args),
        QueueCommand::Down(args) => ("queue down", args),
        QueueCommand::Bottom(args) => ("queue bottom", args),
    };
    if args.ids.is_empty() {
        return Err(CliError::validation(
            "queue moves require at least one torrent id or hash",
        ));
    }
    let selector = selector(args);
    match command {
        QueueCommand::Top(_) => ctx.client.queue_move_top(&selector)?,
        QueueCommand::Up(_) => ctx.client.queue_move_up(&selector)?,
        QueueCommand::Down(_) => ctx.client.queue_move_down(&selector)?,
        QueueCommand::Bottom(_) => ctx.client.queue_move_bottom(&selector)?,
    }
    render_ack(label, ctx.output)
}
