//! Startup configuration.
//!
//! Every setting can be given as a flag or through its environment variable.
//! Any invalid value is fatal; nothing is silently clamped or replaced with a
//! default.

use std::fmt;

use aws_readonly_core::schema::{
    DEFAULT_SESSION_DURATION, MAX_SESSION_DURATION, MIN_SESSION_DURATION,
};
use clap::{Parser, ValueEnum};

/// Region used when `AWS_REGION` is unset or empty.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only AWS MCP server over stdio
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "aws-readonly-server", version, about)]
pub struct ServerConfig {
    /// AWS region for every client
    #[arg(long, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Role assumed before serving, if any
    #[arg(long, env = "AWS_ASSUME_ROLE_ARN")]
    pub assume_role_arn: Option<String>,

    /// Session duration for the startup role assumption, in seconds
    #[arg(
        long,
        env = "AWS_SESSION_DURATION",
        default_value_t = DEFAULT_SESSION_DURATION,
        value_parser = clap::value_parser!(i32)
            .range(i64::from(MIN_SESSION_DURATION)..=i64::from(MAX_SESSION_DURATION))
    )]
    pub session_duration: i32,

    /// Log verbosity
    #[arg(long, env = "LOG_LEVEL", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            assume_role_arn: None,
            session_duration: DEFAULT_SESSION_DURATION,
            log_level: LogLevel::default(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the command line and the process environment.
    pub fn load() -> Result<Self, clap::Error> {
        Self::try_parse().map(Self::normalize)
    }

    /// Empty region and role values count as unset.
    pub fn normalize(mut self) -> Self {
        if self.region.trim().is_empty() {
            self.region = DEFAULT_REGION.to_string();
        }
        self.assume_role_arn = self.assume_role_arn.filter(|arn| !arn.trim().is_empty());
        self
    }
}
