//! Resolved server settings.
//!
//! The binary fills this from CLI flags and environment variables; tests
//! build it directly.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Artifact location used when none is configured.
pub const DEFAULT_MODEL_PATH: &str = "modelo_cancer.json";

/// Port used when none is configured.
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind; all interfaces by default.
    pub host: IpAddr,
    pub port: u16,
    /// Classifier artifact, loaded once at startup.
    pub model_path: PathBuf,
    /// Upper bound on predictions running on the blocking pool at once.
    pub max_concurrent_inferences: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            max_concurrent_inferences: default_inference_slots(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Inference slot count, never below one.
    pub fn inference_slots(&self) -> usize {
        self.max_concurrent_inferences.max(1)
    }
}

/// One slot per available CPU.
pub fn default_inference_slots() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_on_all_interfaces_port_5000() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:5000");
        assert_eq!(config.model_path, PathBuf::from("modelo_cancer.json"));
        assert!(config.inference_slots() >= 1);
    }

    #[test]
    fn zero_slots_clamps_to_one() {
        let config = ServerConfig {
            max_concurrent_inferences: 0,
            ..ServerConfig::default()
        };
        assert_eq!(config.inference_slots(), 1);
    }
}
