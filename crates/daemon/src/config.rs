//! Daemon configuration loaded from `WORKPOOL_*` environment variables

use std::time::Duration;
use workpool_core::application::{FaultPolicy, ProcessorConfig};
use workpool_core::error::{AppError, Result};

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9527;
const DEFAULT_WORKERS: &[usize] = &[1, 3];
const DEFAULT_TICK_MS: u64 = 1000;
const DEFAULT_PROCESSING_MS: u64 = 5000;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    pub rpc_host: String,
    pub rpc_port: u16,
    /// One processor per entry; processor ids are 1-based positions
    pub workers: Vec<usize>,
    pub tick_interval: Duration,
    /// Simulated work per message
    pub processing_time: Duration,
    pub queue_capacity: Option<usize>,
    pub fault_policy: FaultPolicy,
    pub log_format: LogFormat,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            rpc_host: DEFAULT_RPC_HOST.to_string(),
            rpc_port: DEFAULT_RPC_PORT,
            workers: DEFAULT_WORKERS.to_vec(),
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            processing_time: Duration::from_millis(DEFAULT_PROCESSING_MS),
            queue_capacity: None,
            fault_policy: FaultPolicy::Terminate,
            log_format: LogFormat::Pretty,
        }
    }
}

impl DaemonConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup (unset keys keep their defaults)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(host) = lookup("WORKPOOL_RPC_HOST") {
            config.rpc_host = host;
        }
        if let Some(port) = lookup("WORKPOOL_RPC_PORT") {
            config.rpc_port = parse("WORKPOOL_RPC_PORT", &port)?;
        }
        if let Some(workers) = lookup("WORKPOOL_WORKERS") {
            config.workers = parse_workers(&workers)?;
        }
        if let Some(tick) = lookup("WORKPOOL_TICK_MS") {
            config.tick_interval = Duration::from_millis(parse("WORKPOOL_TICK_MS", &tick)?);
        }
        if let Some(ms) = lookup("WORKPOOL_PROCESSING_MS") {
            config.processing_time = Duration::from_millis(parse("WORKPOOL_PROCESSING_MS", &ms)?);
        }
        if let Some(capacity) = lookup("WORKPOOL_QUEUE_CAPACITY") {
            config.queue_capacity = Some(parse("WORKPOOL_QUEUE_CAPACITY", &capacity)?);
        }
        if let Some(policy) = lookup("WORKPOOL_FAULT_POLICY") {
            config.fault_policy = policy.parse()?;
        }
        if let Some(format) = lookup("WORKPOOL_LOG_FORMAT") {
            config.log_format = match format.trim().to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                other => {
                    return Err(AppError::Config(format!(
                        "WORKPOOL_LOG_FORMAT='{}' (expected pretty|json)",
                        other
                    )))
                }
            };
        }

        Ok(config)
    }

    /// Processor configuration for the processor at `index` in `workers`
    pub fn processor_config(&self, index: usize) -> ProcessorConfig {
        let mut config = ProcessorConfig::new(self.workers[index])
            .with_tick_interval(self.tick_interval)
            .with_fault_policy(self.fault_policy);
        config.queue_capacity = self.queue_capacity;
        config
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| AppError::Config(format!("{}='{}': {}", key, value, e)))
}

fn parse_workers(value: &str) -> Result<Vec<usize>> {
    let workers = value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| parse("WORKPOOL_WORKERS", part))
        .collect::<Result<Vec<usize>>>()?;

    if workers.is_empty() {
        return Err(AppError::Config(
            "WORKPOOL_WORKERS must list at least one processor".to_string(),
        ));
    }
    Ok(workers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_two_processor_setup() {
        let config = DaemonConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, DaemonConfig::default());
        assert_eq!(config.workers, vec![1, 3]);
        assert_eq!(config.rpc_port, 9527);
        assert_eq!(config.tick_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_overrides() {
        let config = DaemonConfig::from_lookup(lookup(&[
            ("WORKPOOL_RPC_PORT", "8080"),
            ("WORKPOOL_WORKERS", "2, 4,1"),
            ("WORKPOOL_TICK_MS", "250"),
            ("WORKPOOL_PROCESSING_MS", "10"),
            ("WORKPOOL_QUEUE_CAPACITY", "100"),
            ("WORKPOOL_FAULT_POLICY", "respawn"),
            ("WORKPOOL_LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(config.rpc_port, 8080);
        assert_eq!(config.workers, vec![2, 4, 1]);
        assert_eq!(config.tick_interval, Duration::from_millis(250));
        assert_eq!(config.processing_time, Duration::from_millis(10));
        assert_eq!(config.queue_capacity, Some(100));
        assert_eq!(config.fault_policy, FaultPolicy::Respawn);
        assert_eq!(config.log_format, LogFormat::Json);

        let processor = config.processor_config(1);
        assert_eq!(processor.worker_count, 4);
        assert_eq!(processor.queue_capacity, Some(100));
        assert_eq!(processor.fault_policy, FaultPolicy::Respawn);
    }

    #[test]
    fn test_malformed_values_are_config_errors() {
        for (key, value) in [
            ("WORKPOOL_RPC_PORT", "port"),
            ("WORKPOOL_WORKERS", "1,x"),
            ("WORKPOOL_WORKERS", " , "),
            ("WORKPOOL_TICK_MS", "-5"),
            ("WORKPOOL_FAULT_POLICY", "ignore"),
            ("WORKPOOL_LOG_FORMAT", "xml"),
        ] {
            let result = DaemonConfig::from_lookup(lookup(&[(key, value)]));
            assert!(
                matches!(result, Err(AppError::Config(_))),
                "{}={} should fail",
                key,
                value
            );
        }
    }

    #[test]
    fn test_log_format_values() {
        let config = DaemonConfig::from_lookup(lookup(&[("WORKPOOL_LOG_FORMAT", "pretty")])).unwrap();
        assert_eq!(config.log_format, LogFormat::Pretty);

        let config = DaemonConfig::from_lookup(lookup(&[("WORKPOOL_LOG_FORMAT", "JSON")])).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
