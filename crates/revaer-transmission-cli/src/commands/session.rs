use crate::cli::{FreeSpaceArgs, SessionGetArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_arguments, render_count, render_flag, render_free_space};

pub(crate) fn handle_session_get(ctx: &AppContext, args: &SessionGetArgs) -> CliResult<()> {
    let fields: Vec<&str> = args.fields.iter().map(String::as_str).collect();
    let settings = ctx.client.session_get(&fields)?;
    render_arguments(&settings, ctx.output)
}

pub(crate) fn handle_session_stats(ctx: &AppContext) -> CliResult<()> {
    let stats = ctx.client.session_stats()?;
    render_arguments(&stats, ctx.output)
}

pub(crate) fn handle_free_space(ctx: &AppContext, args: &FreeSpaceArgs) -> CliResult<()> {
    let path = args.path.trim();
    if path.is_empty() {
        return Err(CliError::validation("path must not be empty"));
    }
    let space = ctx.client.free_space(path)?;
    render_free_space(&space, ctx.output)
}

pub(crate) fn handle_port_test(ctx: &AppContext) -> CliResult<()> {
    let open = ctx.client.port_test()?;
    render_flag("port-is-open", open, ctx.output)
}

pub(crate) fn handle_blocklist_update(ctx: &AppContext) -> CliResult<()> {
    let size = ctx.client.blocklist_update()?;
    render_count("blocklist-size", size, ctx.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use revaer_test_support::MockDaemon;
    use revaer_transmission::{ClientConfig, TransmissionClient};
    use serde_json::json;

    fn context_for(daemon: &MockDaemon) -> AppContext {
        let config = ClientConfig::default()
            .with_host(daemon.host())
            .with_port(daemon.port());
        AppContext {
            client: TransmissionClient::new(&config).expect("client"),
            output: OutputFormat::Table,
        }
    }

    #[test]
    fn session_get_learns_session_id_first() {
        let daemon = MockDaemon::start();
        let conflict = daemon.conflict_without_session("S1");
        let mock = daemon.succeed(
            "S1",
            "session-get",
            &json!({"fields": ["version"]}),
            &json!({"version": "4.0.5"}),
        );
        let ctx = context_for(&daemon);

        handle_session_get(
            &ctx,
            &SessionGetArgs {
                fields: vec!["version".to_string()],
            },
        )
        .expect("session get succeeds");
        conflict.assert();
        mock.assert();
    }

    #[test]
    fn misc_commands_render_payloads() {
        let daemon = MockDaemon::start();
        let free = daemon.succeed(
            "S1",
            "free-space",
            &json!({"path": "/data"}),
            &json!({"path": "/data", "size-bytes": 1_048_576}),
        );
        let port = daemon.succeed("S1", "port-test", &json!({}), &json!({"port-is-open": true}));
        let blocklist = daemon.succeed(
            "S1",
            "blocklist-update",
            &json!({}),
            &json!({"blocklist-size": 10}),
        );
        let stats = daemon.succeed(
            "S1",
            "session-stats",
            &json!({}),
            &json!({"activeTorrentCount": 2}),
        );
        let ctx = context_for(&daemon);
        ctx.client.set_session_token("S1");

        handle_free_space(
            &ctx,
            &FreeSpaceArgs {
                path: "/data".to_string(),
            },
        )
        .expect("free space");
        handle_port_test(&ctx).expect("port test");
        handle_blocklist_update(&ctx).expect("blocklist");
        handle_session_stats(&ctx).expect("stats");

        free.assert();
        port.assert();
        blocklist.assert();
        stats.assert();
    }

    #[test]
    fn free_space_requires_a_path() {
        let daemon = MockDaemon::start();
        let ctx = context_for(&daemon);
        let err = handle_free_space(
            &ctx,
            &FreeSpaceArgs {
                path: " ".to_string(),
            },
        )
        .expect_err("validation");
        assert_eq!(err.exit_code(), 2);
    }
}
