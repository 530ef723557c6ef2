//! Environment-driven configuration for the HTTP service

use std::str::FromStr;

use crate::analysis::AnalysisOptions;
use crate::error::{FrameError, FrameResult};

/// Server settings plus the analysis defaults applied to every request
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub analysis: AnalysisOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8086,
            analysis: AnalysisOptions::default(),
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT`, `FRAME_SOLVER_SPARSE_THRESHOLD` and
    /// `FRAME_SOLVER_PIVOT_TOLERANCE` from the process environment
    pub fn from_env() -> FrameResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> FrameResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = parse(&lookup, "PORT")? {
            config.port = port;
        }
        if let Some(threshold) = parse(&lookup, "FRAME_SOLVER_SPARSE_THRESHOLD")? {
            config.analysis.sparse_threshold = threshold;
        }
        if let Some(tol) = parse::<f64, _>(&lookup, "FRAME_SOLVER_PIVOT_TOLERANCE")? {
            if !(tol.is_finite() && tol >= 0.0) {
                return Err(FrameError::InvalidInput(format!(
                    "FRAME_SOLVER_PIVOT_TOLERANCE must be a non-negative number, got {}",
                    tol
                )));
            }
            config.analysis.pivot_tolerance = tol;
        }

        Ok(config)
    }

    /// `host:port` for binding
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> FrameResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
            FrameError::InvalidInput(format!("{} has invalid value '{}': {}", key, raw, e))
        }),
    }
}
