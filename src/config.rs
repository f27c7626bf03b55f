//! Runtime configuration.
//!
//! Values come from CLI flags with environment fallbacks (see
//! [`crate::cli::Cli`]); this module validates them and resolves the bind
//! address.

use crate::error::{Error, Result};
use crate::expr::EvalLimits;
use std::net::{SocketAddr, ToSocketAddrs};

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8501;

/// Maximum accepted request body size in bytes.
pub const DEFAULT_BODY_LIMIT: usize = 16 * 1024;

/// Settings for the HTTP server.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub addr: SocketAddr,
    /// Maximum request body size in bytes.
    pub body_limit: usize,
    /// Limits passed to the evaluator.
    pub limits: EvalLimits,
}

impl ServerConfig {
    /// Builds a validated server configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the host does not resolve or the limits
    /// are invalid.
    pub fn new(host: &str, port: u16, limits: EvalLimits) -> Result<Self> {
        validate_limits(&limits)?;
        let addr = (host, port)
            .to_socket_addrs()
            .map_err(|e| Error::Config {
                message: format!("invalid host '{host}': {e}"),
            })?
            .next()
            .ok_or_else(|| Error::Config {
                message: format!("host '{host}' did not resolve to any address"),
            })?;

        Ok(Self {
            addr,
            body_limit: DEFAULT_BODY_LIMIT,
            limits,
        })
    }
}

/// Checks that evaluation limits are usable.
///
/// # Errors
///
/// Returns [`Error::Config`] naming the first invalid field.
pub fn validate_limits(limits: &EvalLimits) -> Result<()> {
    if limits.max_length == 0 {
        return Err(Error::Config {
            message: "max_length must be at least 1".to_string(),
        });
    }
    if limits.max_depth == 0 {
        return Err(Error::Config {
            message: "max_depth must be at least 1".to_string(),
        });
    }
    if !limits.max_exponent.is_finite() || limits.max_exponent <= 0.0 {
        return Err(Error::Config {
            message: format!(
                "max_exponent must be a positive finite number, got {}",
                limits.max_exponent
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::new(DEFAULT_HOST, DEFAULT_PORT, EvalLimits::default()).unwrap();
        assert_eq!(config.addr.port(), 8501);
        assert!(config.addr.ip().is_loopback());
        assert_eq!(config.body_limit, DEFAULT_BODY_LIMIT);
    }

    #[test]
    fn test_server_config_invalid_host() {
        let result = ServerConfig::new("not a host!", 8501, EvalLimits::default());
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_validate_limits() {
        assert!(validate_limits(&EvalLimits::default()).is_ok());

        let limits = EvalLimits {
            max_length: 0,
            ..EvalLimits::default()
        };
        assert!(validate_limits(&limits).is_err());

        let limits = EvalLimits {
            max_depth: 0,
            ..EvalLimits::default()
        };
        assert!(validate_limits(&limits).is_err());

        let limits = EvalLimits {
            max_exponent: f64::NAN,
            ..EvalLimits::default()
        };
        let err = validate_limits(&limits).unwrap_err();
        assert!(err.to_string().contains("max_exponent"));
    }
}
