pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use sweepr_common::config::{
    Config, DEFAULT_BASE_ADDRESS, DEFAULT_LOG_PATH, DEFAULT_MAX_CONCURRENT_HOSTS,
    DEFAULT_TIMEOUT_MILLIS, ScanConfig,
};
use sweepr_common::error::ConfigError;
use sweepr_common::network::ports::PortSet;
use sweepr_common::network::range::{self, TargetRange};

#[derive(Parser, Debug)]
#[command(name = "sweepr", version)]
#[command(about = "A concurrent host/port liveness prober.")]
pub struct CommandLine {
    /// Address prefix shared by every scanned host, e.g. 192.168.1
    #[arg(short, long, default_value = DEFAULT_BASE_ADDRESS)]
    pub base_address: String,

    /// Host suffixes to scan under the base address, inclusive
    #[arg(short = 'r', long, default_value = "1-254", value_parser = range::parse_host_range)]
    pub host_range: (u8, u8),

    /// Scan this target instead: 10.0.0.5, 10.0.0.1-50 or 10.0.0.0/24
    #[arg(short, long, conflicts_with_all = ["base_address", "host_range"])]
    pub target: Option<TargetRange>,

    /// Ports to probe on every host, e.g. 22,80,8000-8010
    #[arg(short, long, default_value = "21,22,23,80,443,3306,8080")]
    pub ports: PortSet,

    /// Budget for a single connection attempt, in milliseconds
    #[arg(long = "timeout", default_value_t = DEFAULT_TIMEOUT_MILLIS)]
    pub timeout_millis: u64,

    /// File the findings are written to; truncated on every run
    #[arg(short = 'o', long, default_value = DEFAULT_LOG_PATH)]
    pub log_path: PathBuf,

    /// Maximum number of hosts scanned at the same time
    #[arg(short, long, default_value_t = DEFAULT_MAX_CONCURRENT_HOSTS)]
    pub concurrency: usize,

    /// Reduce output, repeat for less (-qq)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// Do not print the banner
    #[arg(long)]
    pub no_banner: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn display_config(&self) -> Config {
        Config {
            no_banner: self.no_banner,
            quiet: self.quiet,
        }
    }

    /// Builds and validates the session settings.
    pub fn scan_config(&self) -> Result<ScanConfig, ConfigError> {
        let targets: TargetRange = match self.target {
            Some(target) => target,
            None => {
                let (min, max) = self.host_range;
                TargetRange::from_prefix(&self.base_address, min, max)?
            }
        };

        let cfg = ScanConfig::new(targets, self.ports.clone())
            .with_timeout(Duration::from_millis(self.timeout_millis))
            .with_log_path(&self.log_path)
            .with_max_concurrent_hosts(self.concurrency);

        cfg.validate()?;
        Ok(cfg)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
