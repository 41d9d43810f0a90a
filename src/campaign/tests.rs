use super::{Campaign, CampaignConfig};
use crate::common::test_utils::{refused_endpoint, spawn_echo_target};
use crate::network::TargetEndpoint;
use crate::request::RequestSpec;
use crate::StormError;
use bytes::Bytes;
use std::time::Duration;

fn config_for(endpoint: TargetEndpoint) -> CampaignConfig {
    CampaignConfig::new(endpoint, RequestSpec::with_default_terminator("STOP\r\n\r\n"))
        .with_workers_per_wave(3)
        .with_wave_count(2)
        .with_launch_delay(Duration::from_millis(5))
        .with_per_worker_timeout(Duration::from_millis(300))
}

#[test]
fn test_defaults_follow_reference_pattern() {
    let config = CampaignConfig::new(
        TargetEndpoint::default(),
        RequestSpec::with_default_terminator("STOP\r\n\r\n"),
    );

    assert_eq!(config.workers_per_wave, 300);
    assert_eq!(config.wave_count, 10);
    assert_eq!(config.launch_delay, Duration::from_millis(100));
    assert_eq!(config.per_worker_timeout, Duration::from_secs(1));
}

#[test]
fn test_derived_worker_and_wave_configs() {
    let config = config_for(TargetEndpoint::default())
        .with_connect_timeout(Duration::from_millis(50))
        .with_join_grace(Duration::from_millis(200));

    let worker = config.worker_config();
    assert_eq!(worker.connect_timeout, Duration::from_millis(50));
    assert_eq!(worker.idle_timeout, Duration::from_millis(300));
    assert_eq!(worker.deadline, Duration::from_millis(300));

    let wave = config.wave_config();
    assert_eq!(wave.workers, 3);
    assert_eq!(wave.join_timeout, Duration::from_millis(500));
}

#[test]
fn test_invalid_configs_are_rejected() {
    let base = config_for(TargetEndpoint::default());

    assert!(matches!(
        Campaign::<crate::TcpProtocol>::new(base.clone().with_workers_per_wave(0)),
        Err(StormError::Config(_))
    ));
    assert!(Campaign::<crate::TcpProtocol>::new(base.clone().with_wave_count(0)).is_err());
    assert!(
        Campaign::<crate::TcpProtocol>::new(base.clone().with_per_worker_timeout(Duration::ZERO))
            .is_err()
    );

    let mut empty = base.clone();
    empty.request = RequestSpec::new(Bytes::new(), Bytes::new());
    assert!(Campaign::<crate::TcpProtocol>::new(empty).is_err());

    let mut no_host = base;
    no_host.endpoint = TargetEndpoint::new("", 5555);
    assert!(Campaign::<crate::TcpProtocol>::new(no_host).is_err());
}

#[tokio::test]
async fn test_unresolvable_endpoint_is_fatal_before_any_wave() {
    let campaign: Campaign =
        Campaign::new(config_for(TargetEndpoint::new("wavestorm-test.invalid", 5555))).unwrap();

    let mut waves_seen = 0;
    let result = campaign.run_with(|_| waves_seen += 1).await;

    assert!(matches!(result, Err(StormError::Resolve { .. })));
    assert_eq!(waves_seen, 0);
}

#[tokio::test]
async fn test_connection_failures_are_not_fatal() {
    let addr = refused_endpoint().unwrap();
    let campaign: Campaign = Campaign::new(config_for(addr.into())).unwrap();

    let report = campaign.run().await.unwrap();

    assert_eq!(report.waves.len(), 2);
    assert!(report.waves.iter().all(|w| w.failures == 3));
    assert_eq!(report.total_failures(), 6);
}

#[tokio::test]
async fn test_waves_run_strictly_in_sequence() {
    let (server, addr) = spawn_echo_target().await.unwrap();
    let campaign: Campaign =
        Campaign::new(config_for(addr.into()).with_wave_count(4)).unwrap();

    let mut indices = Vec::new();
    let report = campaign
        .run_with(|wave| indices.push(wave.wave_index))
        .await
        .unwrap();

    assert_eq!(indices, vec![1, 2, 3, 4]);
    for pair in report.waves.windows(2) {
        assert!(
            pair[0].finished_at() <= pair[1].started_at,
            "wave {} overlapped wave {}",
            pair[0].wave_index,
            pair[1].wave_index
        );
    }
    assert_eq!(report.total_failures(), 0);
    server.abort();
}
