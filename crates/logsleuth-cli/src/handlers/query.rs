use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{SecondsFormat, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use logsleuth_engine::{append_trace_filter, gather_log_info};
use logsleuth_runtime::client::AwsClients;
use logsleuth_runtime::{QueryRunner, QuerySpec};

use crate::args::Cli;

pub async fn handle(cli: Cli) -> Result<()> {
    let mut query = fs::read_to_string(&cli.query)
        .with_context(|| format!("read query file {}", cli.query.display()))?;

    if cli.trace_id.is_none() && cli.log_groups.is_empty() {
        bail!("one or more --log-group must be specified (or use --trace-id)");
    }
    if let (Some(start), Some(end)) = (cli.start, cli.end) {
        if end < start {
            bail!("--end must be after --start");
        }
    }

    let mut log_groups = cli.log_groups.clone();
    let mut start = cli.start;
    let mut end = cli.end;

    let cancel = CancellationToken::new();
    spawn_cancel_tasks(cli.timeout, &cancel);

    let clients = AwsClients::from_env().await;

    if let Some(trace_id) = &cli.trace_id {
        let log_info = gather_log_info(&clients.trace_store, &clients.delivery_probe, trace_id)
            .await
            .with_context(|| format!("gather log info for trace {}", trace_id))?;
        let Some(log_info) = log_info else {
            bail!("no trace found for {}", trace_id);
        };

        info!(
            traces = log_info.trace_ids.len(),
            request_ids = log_info.request_ids.len(),
            log_groups = log_info.log_groups.len(),
            "trace traversal complete"
        );

        log_groups.extend(log_info.log_groups.iter().cloned());
        if log_groups.is_empty() {
            bail!("trace {} references no log groups", trace_id);
        }
        query = append_trace_filter(&query, &log_info);
        start = Some(log_info.start_time);
        end = Some(log_info.end_time);
    }

    let duration = chrono::Duration::seconds(cli.duration as i64);
    let start = start.unwrap_or_else(|| Utc::now() - duration);
    let end = end.unwrap_or(start + duration);
    if end < start {
        bail!("--end must be after --start");
    }

    info!(
        from = %start.to_rfc3339_opts(SecondsFormat::Secs, true),
        to = %end.to_rfc3339_opts(SecondsFormat::Secs, true),
        "query window"
    );

    let mut out = open_sink(cli.out.as_deref(), DefaultStream::Stdout)?;
    let mut stat = open_sink(cli.stat.as_deref(), DefaultStream::Stderr)?;

    let spec = QuerySpec {
        start_time: start,
        end_time: end,
        log_groups,
        query,
        limit: cli.limit,
    };

    let mut runner = QueryRunner::new(&clients.query_service, cancel.clone());
    let result = runner.run(&spec, &mut out, &mut stat).await;

    let flushed = out.flush().and(stat.flush());
    result?;
    flushed.context("flush output")?;
    Ok(())
}

/// Cancel the token on Ctrl-C or when the optional deadline fires. A second
/// Ctrl-C exits immediately without waiting for cleanup.
fn spawn_cancel_tasks(timeout_secs: Option<u64>, cancel: &CancellationToken) {
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, cancelling query");
            token.cancel();
            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(130);
            }
        }
    });

    if let Some(secs) = timeout_secs {
        let token = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            warn!(timeout_secs = secs, "deadline reached, cancelling query");
            token.cancel();
        });
    }
}

enum DefaultStream {
    Stdout,
    Stderr,
}

/// Open an output sink. `None` and `-` select the default stream. Files are
/// written unbuffered so rows appear the moment they are emitted.
fn open_sink(path: Option<&Path>, default: DefaultStream) -> Result<Box<dyn Write>> {
    match path {
        Some(p) if p.as_os_str() != "-" => {
            let file =
                fs::File::create(p).with_context(|| format!("create {}", p.display()))?;
            Ok(Box::new(file))
        }
        _ => Ok(match default {
            DefaultStream::Stdout => Box::new(io::stdout()),
            DefaultStream::Stderr => Box::new(io::stderr()),
        }),
    }
}
