//! Listener settings for the JSON API.

use std::net::{AddrParseError, IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};

/// Where the API listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port for `/health` and `/api/v1/*`.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Interface to bind, e.g. `127.0.0.1` to keep the shop API local.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl ServerConfig {
    /// Resolve the bind address and port into a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.bind_address.trim().parse()?;
        Ok(SocketAddr::new(ip, self.http_port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            bind_address: default_bind_address(),
        }
    }
}

const fn default_http_port() -> u16 {
    8080
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_listens_on_all_interfaces() {
        let addr = ServerConfig::default().socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn rejects_hostnames() {
        let config = ServerConfig {
            bind_address: "localhost".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }
}
