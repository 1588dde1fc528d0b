// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use super::EngineArgs;

/// Default request body limit (16 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Text Extractor API server
#[derive(Parser, Debug, Clone)]
#[command(name = "text-extractor")]
#[command(version)]
#[command(about = "HTTP service that extracts text from uploaded images", long_about = None)]
pub struct ServerConfig {
    /// Interface to listen on
    #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "API_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Working directory for staged uploads (created if absent)
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Maximum request body size in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    #[command(flatten)]
    pub engine: EngineArgs,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("port must be non-zero");
        }
        if self.max_upload_bytes == 0 {
            anyhow::bail!("max upload size must be greater than zero");
        }
        self.socket_addr()?;
        self.engine.validate()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("Invalid listen host '{}'", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
