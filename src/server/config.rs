use super::RequestsLoggingLevel;
use std::net::{IpAddr, Ipv4Addr};

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub bind_address: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 4001,
        }
    }
}
