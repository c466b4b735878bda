//! Argument parsing and command dispatch.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::client::{AppContext, CliResult, ConnectionArgs};
use crate::commands::session::{
    handle_blocklist_update, handle_free_space, handle_port_test, handle_session_get,
    handle_session_stats,
};
use crate::commands::torrents::{
    TorrentAction, handle_action, handle_add, handle_list, handle_move, handle_queue,
    handle_remove, handle_start,
};
use crate::telemetry::{DEFAULT_LOG_LEVEL, LogFormat, init_logging};

/// Parses CLI arguments, executes the requested command, and returns the
/// process exit code.
#[must_use]
pub fn run() -> i32 {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&cli.log_level, cli.log_format) {
        eprintln!("error: {}", err.display_message());
        return err.exit_code();
    }

    let command = command_label(&cli.command);
    let result = AppContext::connect(&cli.connection, cli.output)
        .and_then(|ctx| dispatch(&ctx, cli.command));

    match result {
        Ok(()) => {
            tracing::debug!(command, "command completed");
            0
        }
        Err(err) => {
            let exit_code = err.exit_code();
            tracing::debug!(command, exit_code, "command failed");
            eprintln!("error: {}", err.display_message());
            exit_code
        }
    }
}

pub(crate) fn dispatch(ctx: &AppContext, command: Command) -> CliResult<()> {
    match command {
        Command::Ls(args) => handle_list(ctx, &args),
        Command::Add(args) => handle_add(ctx, args),
        Command::Start(args) => handle_start(ctx, &args),
        Command::Stop(args) => handle_action(ctx, TorrentAction::Stop, &args),
        Command::Verify(args) => handle_action(ctx, TorrentAction::Verify, &args),
        Command::Reannounce(args) => handle_action(ctx, TorrentAction::Reannounce, &args),
        Command::Remove(args) => handle_remove(ctx, &args),
        Command::Move(args) => handle_move(ctx, &args),
        Command::Queue(queue) => handle_queue(ctx, &queue),
        Command::Session(session) => match session {
            SessionCommand::Get(args) => handle_session_get(ctx, &args),
            SessionCommand::Stats => handle_session_stats(ctx),
        },
        Command::FreeSpace(args) => handle_free_space(ctx, &args),
        Command::PortTest => handle_port_test(ctx),
        Command::BlocklistUpdate => handle_blocklist_update(ctx),
    }
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Ls(_) => "ls",
        Command::Add(_) => "add",
        Command::Start(_) => "start",
        Command::Stop(_) => "stop",
        Command::Verify(_) => "verify",
        Command::Reannounce(_) => "reannounce",
        Command::Remove(_) => "remove",
        Command::Move(_) => "move",
        Command::Queue(_) => "queue",
        Command::Session(SessionCommand::Get(_)) => "session get",
        Command::Session(SessionCommand::Stats) => "session stats",
        Command::FreeSpace(_) => "free-space",
        Command::PortTest => "port-test",
        Command::BlocklistUpdate => "blocklist-update",
    }
}

#[derive(Debug, Parser)]
#[command(name = "revaer-tr", about = "Command-line client for Transmission daemons")]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) connection: ConnectionArgs,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[arg(
        long,
        global = true,
        env = "REVAER_TR_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL,
        help = "Log filter used when RUST_LOG is unset"
    )]
    pub(crate) log_level: String,
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub(crate) log_format: LogFormat,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List torrents.
    Ls(ListArgs),
    /// Add a torrent from a magnet link, URL, or local `.torrent` file.
    Add(AddArgs),
    /// Start torrents.
    Start(StartArgs),
    /// Stop torrents.
    Stop(IdsArgs),
    /// Verify local data.
    Verify(IdsArgs),
    /// Ask trackers for more peers.
    Reannounce(IdsArgs),
    /// Remove torrents.
    Remove(RemoveArgs),
    /// Relocate torrent data.
    Move(MoveArgs),
    /// Reorder the download queue.
    #[command(subcommand)]
    Queue(QueueCommand),
    /// Inspect the daemon session.
    #[command(subcommand)]
    Session(SessionCommand),
    /// Report free space in a directory on the daemon's host.
    FreeSpace(FreeSpaceArgs),
    /// Check whether the peer port is reachable.
    PortTest,
    /// Refresh the blocklist.
    BlocklistUpdate,
}

/// Torrent identifiers: numeric ids, hashes, or `recently-active`.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct IdsArgs {
    #[arg(value_name = "ID")]
    pub(crate) ids: Vec<String>,
}

#[derive(Debug, Args)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    pub(crate) target: IdsArgs,
    #[arg(long = "field", value_name = "FIELD", help = "Torrent field to fetch (repeatable)")]
    pub(crate) fields: Vec<String>,
}

#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    pub(crate) source: String,
    #[arg(long)]
    pub(crate) download_dir: Option<String>,
    #[arg(long)]
    pub(crate) paused: bool,
    #[arg(long = "label", value_name = "LABEL")]
    pub(crate) labels: Vec<String>,
}

#[derive(Debug, Args)]
pub(crate) struct StartArgs {
    #[command(flatten)]
    pub(crate) target: IdsArgs,
    #[arg(long, help = "Bypass the download queue")]
    pub(crate) now: bool,
}

#[derive(Debug, Args)]
pub(crate) struct RemoveArgs {
    #[command(flatten)]
    pub(crate) target: IdsArgs,
    #[arg(long, help = "Also delete downloaded data")]
    pub(crate) delete_data: bool,
}

#[derive(Debug, Args)]
pub(crate) struct MoveArgs {
    pub(crate) location: String,
    #[command(flatten)]
    pub(crate) target: IdsArgs,
    #[arg(long, help = "Only update the recorded location; leave data in place")]
    pub(crate) no_move: bool,
}

#[derive(Debug, Subcommand)]
pub(crate) enum QueueCommand {
    /// Move to the top of the queue.
    Top(IdsArgs),
    /// Move one position up.
    Up(IdsArgs),
    /// Move one position down.
    Down(IdsArgs),
    /// Move to the bottom of the queue.
    Bottom(IdsArgs),
}

#[derive(Debug, Subcommand)]
pub(crate) enum SessionCommand {
    /// Show session settings.
    Get(SessionGetArgs),
    /// Show transfer statistics.
    Stats,
}

#[derive(Debug, Args)]
pub(crate) struct SessionGetArgs {
    #[arg(long = "field", value_name = "FIELD")]
    pub(crate) fields: Vec<String>,
}

#[derive(Debug, Args)]
pub(crate) struct FreeSpaceArgs {
    pub(crate) path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("revaer-tr").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_apply_after_subcommand() {
        let cli = parse(&[
            "ls",
            "1",
            "abcdef",
            "--host",
            "nas.local",
            "--port",
            "9092",
            "--output",
            "json",
        ]);
        assert_eq!(cli.connection.host, "nas.local");
        assert_eq!(cli.connection.port, 9092);
        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Command::Ls(args) => assert_eq!(args.target.ids, vec!["1", "abcdef"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn queue_and_session_subcommands_parse() {
        assert!(matches!(
            parse(&["queue", "up", "3"]).command,
            Command::Queue(QueueCommand::Up(_))
        ));
        assert!(matches!(
            parse(&["session", "stats"]).command,
            Command::Session(SessionCommand::Stats)
        ));
        assert!(matches!(
            parse(&["blocklist-update"]).command,
            Command::BlocklistUpdate
        ));
    }

    #[test]
    fn move_flags_parse() {
        match parse(&["move", "/mnt/media", "4", "--no-move"]).command {
            Command::Move(args) => {
                assert_eq!(args.location, "/mnt/media");
                assert_eq!(args.target.ids, vec!["4"]);
                assert!(args.no_move);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn labels_cover_every_command() {
        assert_eq!(command_label(&parse(&["port-test"]).command), "port-test");
        assert_eq!(
            command_label(&parse(&["session", "get"]).command),
            "session get"
        );
    }
}
