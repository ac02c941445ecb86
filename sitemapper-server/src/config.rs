use crate::error::{Result, ServerError};
use clap::ArgMatches;
use sitemapper_scanner::FetchPolicy;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub fetch_policy: FetchPolicy,
    pub max_depth: Option<usize>,
    pub max_concurrency: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            fetch_policy: FetchPolicy::default(),
            max_depth: None,
            max_concurrency: None,
        }
    }
}

impl ServerConfig {
    /// Build a config from parsed command-line arguments.
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let mut config = Self::default();

        if let Some(host) = matches.get_one::<String>("host") {
            config.host = host.clone();
        }
        if let Some(port) = matches.get_one::<u16>("port") {
            config.port = *port;
        }
        if let Some(timeout) = matches.get_one::<u64>("timeout") {
            config.fetch_policy = config
                .fetch_policy
                .with_timeout(Duration::from_secs(*timeout));
        }
        config.max_depth = matches.get_one::<usize>("max-depth").copied();
        config.max_concurrency = matches.get_one::<usize>("max-concurrency").copied();

        config
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ServerError::Config(format!("invalid listen address: {}", e)))
    }
}
