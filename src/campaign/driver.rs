use super::{CampaignConfig, CampaignReport};
use crate::stream::StreamProtocol;
use crate::tcp::TcpProtocol;
use crate::wave::{WaveReport, WaveScheduler};
use crate::Result;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{info, warn};

/// Runs a configured sequence of waves against one target
///
/// # Examples
///
/// ```no_run
/// use wavestorm::{Campaign, CampaignConfig, Preset, TargetEndpoint};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let endpoint = TargetEndpoint::new("localhost", 5555);
///     let request = Preset::Get.request_spec(&endpoint)?;
///     let campaign: Campaign = Campaign::new(CampaignConfig::new(endpoint, request))?;
///
///     let report = campaign
///         .run_with(|wave| println!("wave {}: {} failures", wave.wave_index, wave.failures))
///         .await?;
///     println!("total failures: {}", report.total_failures());
///     Ok(())
/// }
/// ```
pub struct Campaign<P: StreamProtocol = TcpProtocol> {
    config: CampaignConfig,
    protocol: PhantomData<fn() -> P>,
}

impl<P: StreamProtocol + 'static> Campaign<P> {
    /// Validates the configuration; an invalid campaign is never created
    pub fn new(config: CampaignConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            protocol: PhantomData,
        })
    }

    pub fn config(&self) -> &CampaignConfig {
        &self.config
    }

    pub async fn run(&self) -> Result<CampaignReport> {
        self.run_with(|_| {}).await
    }

    /// Runs every wave in order, handing each report to `on_wave` as soon
    /// as the wave has closed
    pub async fn run_with<F>(&self, mut on_wave: F) -> Result<CampaignReport>
    where
        F: FnMut(&WaveReport),
    {
        let config = &self.config;
        let addr = config.endpoint.resolve().await?;

        if !config.request.is_terminated() {
            warn!("Request payload does not end with its terminator");
        }

        info!(
            endpoint = %config.endpoint,
            %addr,
            waves = config.wave_count,
            workers = config.workers_per_wave,
            launch_delay = ?config.launch_delay,
            timeout = ?config.per_worker_timeout,
            "Starting campaign"
        );

        let scheduler = WaveScheduler::<P>::new(
            addr,
            Arc::new(config.request.clone()),
            config.worker_config(),
            config.wave_config(),
        );

        let mut waves = Vec::with_capacity(config.wave_count);
        for wave_index in 1..=config.wave_count {
            let report = scheduler.run_wave(wave_index).await;
            on_wave(&report);
            waves.push(report);
        }

        let report = CampaignReport {
            waves,
            late_discarded: scheduler.counter().late_discarded(),
        };

        info!(
            launched = report.total_launched(),
            failures = report.total_failures(),
            late_discarded = report.late_discarded,
            "Campaign finished"
        );

        Ok(report)
    }
}
