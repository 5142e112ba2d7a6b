//! Server configuration.

use std::net::SocketAddr;

/// Address the server binds to when none is given.
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address
    pub bind: SocketAddr,
    /// Seed for the shared RNG; `None` seeds from OS entropy
    pub seed: Option<u64>,
    /// Allow cross-origin requests from any origin
    pub cors: bool,
    /// Log every request through the tracing subscriber
    pub trace_requests: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            seed: None,
            cors: true,
            trace_requests: true,
        }
    }
}

impl ServerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the listen address.
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    /// Seed the RNG used for measurement noise and mystery picks.
    ///
    /// Fixed seeds make readings reproducible across restarts; useful for
    /// demos and grading, not for actual games.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable permissive CORS.
    pub fn with_cors(mut self, cors: bool) -> Self {
        self.cors = cors;
        self
    }

    /// Enable or disable per-request tracing.
    pub fn with_request_tracing(mut self, trace_requests: bool) -> Self {
        self.trace_requests = trace_requests;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bind_matches_constant() {
        let config = ServerConfig::default();
        assert_eq!(config.bind, DEFAULT_BIND.parse::<SocketAddr>().unwrap());
        assert!(config.cors);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder() {
        let config = ServerConfig::new()
            .with_bind("0.0.0.0:8080".parse().unwrap())
            .with_seed(Some(7))
            .with_cors(false)
            .with_request_tracing(false);
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.seed, Some(7));
        assert!(!config.cors);
        assert!(!config.trace_requests);
    }
}
