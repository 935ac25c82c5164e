// Relocated from an inline #[cfg(test)] module (see the engine tests/ for why).
mod tests {
    use std::time::Duration;

    use chrono::DateTime;
    use tokio_util::sync::CancellationToken;

    use logsleuth_runtime::{Error, ExponentialBackoff, QueryRunner, QuerySpec};

    use logsleuth_testing::fakes::ScriptedQueryService;
    use logsleuth_types::{
        PollResponse, QueryStats, QueryStatus, ResultField, ResultPage,
    };

    fn spec() -> QuerySpec {
        QuerySpec {
            start_time: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            end_time: DateTime::from_timestamp(1_700_000_300, 0).unwrap(),
            log_groups: vec!["/aws/lambda/handler".to_string()],
            query: "fields @message".to_string(),
            limit: None,
        }
    }

    fn page(values: &[&str]) -> ResultPage {
        values
            .iter()
            .map(|v| vec![ResultField::new("@message", *v)])
            .collect()
    }

    fn stats(records_scanned: f64) -> QueryStats {
        QueryStats {
            records_matched: 1.0,
            records_scanned,
            bytes_scanned: 64.0,
        }
    }

    fn no_jitter() -> ExponentialBackoff {
        let mut backoff = ExponentialBackoff::default();
        backoff.jitter = 0.0;
        backoff
    }

    fn lines(buf: &[u8]) -> Vec<String> {
        String::from_utf8(buf.to_vec())
            .unwrap()
            .lines()
            .map(|l| l.to_string())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_complete_run_streams_rows_and_final_stats() {
        let service = ScriptedQueryService::new()
            .with_response(PollResponse {
                status: QueryStatus::Scheduled,
                statistics: Some(stats(1.0)),
                pages: vec![],
            })
            .with_response(PollResponse {
                status: QueryStatus::Running,
                statistics: Some(stats(2.0)),
                pages: vec![],
            })
            .with_response(PollResponse {
                status: QueryStatus::Complete,
                statistics: Some(stats(3.0)),
                pages: vec![page(&["r0", "r1", "r2"]), page(&["r3", "r4"])],
            });

        let mut out = Vec::new();
        let mut stat = Vec::new();
        let mut runner =
            QueryRunner::new(&service, CancellationToken::new()).with_backoff(no_jitter());
        runner.run(&spec(), &mut out, &mut stat).await.unwrap();

        let rows = lines(&out);
        assert_eq!(rows.len(), 5);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(
                serde_json::from_str::<serde_json::Value>(row).unwrap()["@message"],
                format!("r{}", i)
            );
        }

        let stat_lines = lines(&stat);
        assert_eq!(stat_lines.len(), 1);
        let snapshot: serde_json::Value = serde_json::from_str(&stat_lines[0]).unwrap();
        assert_eq!(snapshot["records_scanned"], 3.0);

        assert_eq!(service.cancel_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_returns_error_and_cancels_exactly_once() {
        let service = ScriptedQueryService::new()
            .with_response(PollResponse::status_only(QueryStatus::Running))
            .with_response(PollResponse::status_only(QueryStatus::Failed));

        let mut out = Vec::new();
        let mut stat = Vec::new();
        let mut runner =
            QueryRunner::new(&service, CancellationToken::new()).with_backoff(no_jitter());
        let err = runner.run(&spec(), &mut out, &mut stat).await.unwrap_err();

        assert!(matches!(err, Error::QueryFailed(ref status) if status == "Failed"));
        assert!(out.is_empty());
        assert_eq!(service.cancel_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_status_is_an_error() {
        let service = ScriptedQueryService::new()
            .with_response(PollResponse::status_only(QueryStatus::Other("Timeout".into())));

        let mut out = Vec::new();
        let mut stat = Vec::new();
        let mut runner =
            QueryRunner::new(&service, CancellationToken::new()).with_backoff(no_jitter());
        let err = runner.run(&spec(), &mut out, &mut stat).await.unwrap_err();

        assert!(matches!(err, Error::UnexpectedStatus(ref s) if s == "Timeout"));
        assert_eq!(service.cancel_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_precancelled_token_never_submits() {
        let service = ScriptedQueryService::new();
        let token = CancellationToken::new();
        token.cancel();

        let mut out = Vec::new();
        let mut stat = Vec::new();
        let mut runner = QueryRunner::new(&service, token).with_backoff(no_jitter());
        let err = runner.run(&spec(), &mut out, &mut stat).await.unwrap_err();

        assert!(matches!(err, Error::Cancelled));
        assert_eq!(service.submit_count(), 0);
        assert_eq!(service.cancel_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_during_first_poll_cancels_exactly_once() {
        let service = ScriptedQueryService::new().with_hanging_poll();
        let token = CancellationToken::new();

        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1)).await;
            trigger.cancel();
        });

        let mut out = Vec::new();
        let mut stat = Vec::new();
        let mut runner = QueryRunner::new(&service, token).with_backoff(no_jitter());
        let err = runner.run(&spec(), &mut out, &mut stat).await.unwrap_err();

        assert!(matches!(err, Error::Cancelled));
        assert!(out.is_empty());
        assert_eq!(service.submit_count(), 1);
        assert_eq!(service.cancel_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_during_backoff_sleep() {
        let service = ScriptedQueryService::new()
            .with_response(PollResponse::status_only(QueryStatus::Running))
            .with_hanging_poll();
        let token = CancellationToken::new();

        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1)).await;
            trigger.cancel();
        });

        let mut out = Vec::new();
        let mut stat = Vec::new();
        let mut runner = QueryRunner::new(&service, token).with_backoff(no_jitter());
        let err = runner.run(&spec(), &mut out, &mut stat).await.unwrap_err();

        assert!(matches!(err, Error::Cancelled));
        assert_eq!(service.cancel_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_transport_error_cancels_and_keeps_original_error() {
        // The hanging cancel forces the cleanup path through its timeout;
        // the transport error must survive it.
        let service = ScriptedQueryService::new()
            .with_poll_error("connection reset")
            .with_hanging_cancel();

        let mut out = Vec::new();
        let mut stat = Vec::new();
        let mut runner =
            QueryRunner::new(&service, CancellationToken::new()).with_backoff(no_jitter());
        let err = runner.run(&spec(), &mut out, &mut stat).await.unwrap_err();

        assert!(matches!(err, Error::Service(_)));
        assert!(err.to_string().contains("connection reset"));
        assert_eq!(service.cancel_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_backoff_exhaustion_is_a_hard_error() {
        let service = ScriptedQueryService::new()
            .with_response(PollResponse::status_only(QueryStatus::Scheduled));
        let mut backoff = no_jitter();
        backoff.max_attempts = Some(0);

        let mut out = Vec::new();
        let mut stat = Vec::new();
        let mut runner = QueryRunner::new(&service, CancellationToken::new()).with_backoff(backoff);
        let err = runner.run(&spec(), &mut out, &mut stat).await.unwrap_err();

        assert!(matches!(err, Error::BackoffExhausted));
        assert_eq!(service.cancel_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stats_written_even_when_query_fails() {
        let service = ScriptedQueryService::new()
            .with_response(PollResponse {
                status: QueryStatus::Running,
                statistics: Some(stats(7.0)),
                pages: vec![],
            })
            .with_response(PollResponse::status_only(QueryStatus::Failed));

        let mut out = Vec::new();
        let mut stat = Vec::new();
        let mut runner =
            QueryRunner::new(&service, CancellationToken::new()).with_backoff(no_jitter());
        let _ = runner.run(&spec(), &mut out, &mut stat).await;

        let stat_lines = lines(&stat);
        assert_eq!(stat_lines.len(), 1);
        let snapshot: serde_json::Value = serde_json::from_str(&stat_lines[0]).unwrap();
        assert_eq!(snapshot["records_scanned"], 7.0);
    }
}
