// Relocated from an inline #[cfg(test)] module (see tests/walker.rs for why).
mod tests {
    use logsleuth_engine::{gather_log_info, Error};

    use logsleuth_testing::fakes::{MemoryTraceStore, StaticDeliveryProbe};
    use logsleuth_testing::fixtures::{segment, trace};

    fn store_with_gateway() -> MemoryTraceStore {
        MemoryTraceStore::new().with_trace(trace(
            "1-root",
            vec![segment()
                .request_id("req-1")
                .times(1700000100.0, 1700000200.9)
                .rest_api("api1", "prod")
                .build()],
        ))
    }

    #[tokio::test]
    async fn test_absent_when_root_fetch_returns_nothing() {
        let store = MemoryTraceStore::new();
        let probe = StaticDeliveryProbe::new();

        let info = gather_log_info(&store, &probe, "1-missing").await.unwrap();
        assert!(info.is_none());
    }

    #[tokio::test]
    async fn test_window_padded_one_second_each_side() {
        let probe = StaticDeliveryProbe::new();
        let info = gather_log_info(&store_with_gateway(), &probe, "1-root")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(info.start_time.timestamp(), 1700000099);
        assert_eq!(info.end_time.timestamp(), 1700000201);
    }

    #[tokio::test]
    async fn test_single_timestamped_segment_still_pads() {
        let store = MemoryTraceStore::new().with_trace(trace(
            "1-root",
            vec![
                segment().times(500.0, 510.0).build(),
                segment().request_id("req-no-times").build(),
            ],
        ));
        let probe = StaticDeliveryProbe::new();

        let info = gather_log_info(&store, &probe, "1-root")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(info.start_time.timestamp(), 499);
        assert_eq!(info.end_time.timestamp(), 511);
    }

    #[tokio::test]
    async fn test_probe_not_found_excludes_pair() {
        let probe = StaticDeliveryProbe::new(); // knows no log groups
        let info = gather_log_info(&store_with_gateway(), &probe, "1-root")
            .await
            .unwrap()
            .unwrap();

        assert!(info.log_groups.is_empty());
    }

    #[tokio::test]
    async fn test_probe_hit_adds_conventional_name() {
        let probe =
            StaticDeliveryProbe::new().with_group("API-Gateway-Execution-Logs_api1/prod");
        let info = gather_log_info(&store_with_gateway(), &probe, "1-root")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            info.log_groups,
            vec!["API-Gateway-Execution-Logs_api1/prod".to_string()]
        );
    }

    #[tokio::test]
    async fn test_probe_failure_aborts() {
        let probe = StaticDeliveryProbe::new().with_error("access denied");
        let err = gather_log_info(&store_with_gateway(), &probe, "1-root")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Probe(_)));
    }

    #[tokio::test]
    async fn test_explicit_log_groups_union_with_resolved() {
        let store = MemoryTraceStore::new().with_trace(trace(
            "1-root",
            vec![segment()
                .times(100.0, 200.0)
                .rest_api("api1", "prod")
                .log_groups(&["/aws/lambda/handler"])
                .build()],
        ));
        let probe =
            StaticDeliveryProbe::new().with_group("API-Gateway-Execution-Logs_api1/prod");

        let info = gather_log_info(&store, &probe, "1-root")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            info.log_groups,
            vec![
                "/aws/lambda/handler".to_string(),
                "API-Gateway-Execution-Logs_api1/prod".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_no_timestamps_is_a_hard_error() {
        let store = MemoryTraceStore::new()
            .with_trace(trace("1-root", vec![segment().request_id("r").build()]));
        let probe = StaticDeliveryProbe::new();

        let err = gather_log_info(&store, &probe, "1-root").await.unwrap_err();
        assert!(matches!(err, Error::EmptyWindow));
    }

    #[tokio::test]
    async fn test_idempotent_over_static_store() {
        let store = store_with_gateway();
        let probe =
            StaticDeliveryProbe::new().with_group("API-Gateway-Execution-Logs_api1/prod");

        let first = gather_log_info(&store, &probe, "1-root").await.unwrap();
        let second = gather_log_info(&store, &probe, "1-root").await.unwrap();
        assert_eq!(first, second);
    }
}
