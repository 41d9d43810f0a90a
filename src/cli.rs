use clap::{ArgGroup, Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use wavestorm::campaign::config::{
    DEFAULT_MAX_RESPONSE_BYTES, DEFAULT_WAVE_COUNT, DEFAULT_WORKERS_PER_WAVE,
};
use wavestorm::request::{Preset, RequestSpec, decode_escapes};
use wavestorm::{CampaignConfig, StormError, TargetEndpoint};

/// Parses a duration given in seconds (`0.1`, `2`) or with a unit (`250ms`, `1.5s`)
fn parse_seconds(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    let (number, scale) = if let Some(ms) = s.strip_suffix("ms") {
        (ms, 1e-3)
    } else if let Some(secs) = s.strip_suffix('s') {
        (secs, 1.0)
    } else {
        (s, 1.0)
    };

    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration '{s}' (expected e.g. 0.1, 250ms, 2s)"))?;
    Duration::try_from_secs_f64(value * scale)
        .map_err(|_| format!("duration '{s}' must be a finite, non-negative number"))
}

fn parse_preset(input: &str) -> Result<Preset, String> {
    input.parse().map_err(|e: StormError| e.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per wave
    Human,
    /// One JSON object per wave (NDJSON)
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "wavestorm",
    version,
    about = "Opens waves of concurrent connections against a server and counts the failures",
    group(ArgGroup::new("request").args(["payload", "payload_file", "preset"]))
)]
pub struct Cli {
    /// Target host
    #[arg(long, env = "WAVESTORM_HOST", default_value = "localhost")]
    pub host: String,

    /// Target port
    #[arg(long, env = "WAVESTORM_PORT", default_value_t = 5555)]
    pub port: u16,

    /// Request payload; accepts \r, \n, \t, \0, \\ and \xNN escapes
    #[arg(long)]
    pub payload: Option<String>,

    /// Read the raw request payload from a file
    #[arg(long, value_name = "PATH")]
    pub payload_file: Option<PathBuf>,

    /// Built-in request (default: get)
    #[arg(long, value_parser = parse_preset)]
    pub preset: Option<Preset>,

    /// Response marker that ends reading; same escapes as --payload, empty disables
    #[arg(long, default_value = r"\r\n\r\n")]
    pub terminator: String,

    /// Connections launched per wave
    #[arg(long, default_value_t = DEFAULT_WORKERS_PER_WAVE)]
    pub workers: usize,

    /// Number of waves
    #[arg(long, default_value_t = DEFAULT_WAVE_COUNT)]
    pub waves: usize,

    /// Pause between launches, in seconds
    #[arg(long, value_parser = parse_seconds, default_value = "0.1")]
    pub launch_delay: Duration,

    /// Deadline for each connection, in seconds
    #[arg(long, value_parser = parse_seconds, default_value = "1")]
    pub timeout: Duration,

    /// Connect timeout, in seconds (default: --timeout)
    #[arg(long, value_parser = parse_seconds)]
    pub connect_timeout: Option<Duration>,

    /// Per-read idle timeout, in seconds (default: --timeout)
    #[arg(long, value_parser = parse_seconds)]
    pub idle_timeout: Option<Duration>,

    /// Extra time to wait for each worker beyond --timeout, in seconds
    #[arg(long, value_parser = parse_seconds, default_value = "0.5")]
    pub join_grace: Duration,

    /// Stop reading a response after this many bytes
    #[arg(long, default_value_t = DEFAULT_MAX_RESPONSE_BYTES)]
    pub max_response_bytes: usize,

    /// Report format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,
}

impl Cli {
    fn request(&self, endpoint: &TargetEndpoint) -> wavestorm::Result<RequestSpec> {
        let terminator = decode_escapes(&self.terminator)?;

        if let Some(payload) = &self.payload {
            return Ok(RequestSpec::new(decode_escapes(payload)?, terminator));
        }
        if let Some(path) = &self.payload_file {
            let payload = std::fs::read(path).map_err(|e| {
                StormError::Config(format!("cannot read payload file {}: {e}", path.display()))
            })?;
            return Ok(RequestSpec::new(payload, terminator));
        }

        let preset = self.preset.unwrap_or(Preset::Get);
        let mut spec = preset.request_spec(endpoint)?;
        spec.terminator = terminator;
        Ok(spec)
    }

    /// Builds the campaign configuration; `Campaign::new` validates it
    pub fn into_config(self) -> wavestorm::Result<CampaignConfig> {
        let endpoint = TargetEndpoint::new(self.host.clone(), self.port);
        let request = self.request(&endpoint)?;

        let mut config = CampaignConfig::new(endpoint, request)
            .with_workers_per_wave(self.workers)
            .with_wave_count(self.waves)
            .with_launch_delay(self.launch_delay)
            .with_per_worker_timeout(self.timeout)
            .with_join_grace(self.join_grace)
            .with_max_response_bytes(self.max_response_bytes);
        config.connect_timeout = self.connect_timeout;
        config.idle_timeout = self.idle_timeout;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wavestorm::{Campaign, TcpProtocol};

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["wavestorm"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_build_reference_campaign() {
        let config = parse(&[]).into_config().unwrap();

        assert_eq!(config.endpoint.to_string(), "localhost:5555");
        assert_eq!(config.workers_per_wave, 300);
        assert_eq!(config.wave_count, 10);
        assert_eq!(config.launch_delay, Duration::from_millis(100));
        assert_eq!(config.per_worker_timeout, Duration::from_secs(1));
        assert!(config.request.payload.starts_with(b"GET /dhtml/atree/drag_and_drop.html"));
    }

    #[test]
    fn test_escaped_payload() {
        let config = parse(&["--payload", r"STOP\r\n\r\n", "--workers", "5", "--waves", "1"])
            .into_config()
            .unwrap();

        assert_eq!(&config.request.payload[..], b"STOP\r\n\r\n");
        assert_eq!(config.workers_per_wave, 5);
        assert_eq!(config.wave_count, 1);
    }

    #[test]
    fn test_payload_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"HEAD / HTTP/1.1\r\n\r\n").unwrap();

        let path = file.path().to_str().unwrap();
        let config = parse(&["--payload-file", path]).into_config().unwrap();

        assert_eq!(&config.request.payload[..], b"HEAD / HTTP/1.1\r\n\r\n");
    }

    #[test]
    fn test_preset_and_payload_conflict() {
        let result = Cli::try_parse_from(["wavestorm", "--preset", "stop", "--payload", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_fractional_seconds() {
        let config = parse(&["--launch-delay", "0.01", "--timeout", "250ms", "--join-grace", "2s"])
            .into_config()
            .unwrap();

        assert_eq!(config.launch_delay, Duration::from_millis(10));
        assert_eq!(config.per_worker_timeout, Duration::from_millis(250));
        assert_eq!(config.join_grace, Duration::from_secs(2));
    }

    #[test]
    fn test_rejects_bad_durations() {
        assert!(Cli::try_parse_from(["wavestorm", "--launch-delay", "-1"]).is_err());
        assert!(Cli::try_parse_from(["wavestorm", "--timeout", "soon"]).is_err());
    }

    #[test]
    fn test_zero_workers_is_rejected_by_campaign() {
        let config = parse(&["--workers", "0"]).into_config().unwrap();
        assert!(Campaign::<TcpProtocol>::new(config).is_err());
    }

    #[test]
    fn test_unknown_preset() {
        assert!(Cli::try_parse_from(["wavestorm", "--preset", "post"]).is_err());
    }
}
