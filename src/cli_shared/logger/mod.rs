// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use anyhow::Context as _;
use tracing_subscriber::{EnvFilter, Layer, Registry, prelude::*};

use crate::cli_shared::cli::LogConfig;
use crate::utils::misc::LoggingColor;

/// Installs the global subscriber, logging to stderr.
pub fn setup_logger(color: &LoggingColor, config: &LogConfig) -> anyhow::Result<()> {
    let filter = get_env_filter(default_env_filter(config)?);
    let layer: Box<dyn Layer<Registry> + Send + Sync> = if config.json {
        Box::new(
            tracing_subscriber::fmt::Layer::new()
                .json()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
    } else {
        Box::new(
            tracing_subscriber::fmt::Layer::new()
                .with_ansi(color.coloring_enabled())
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
    };
    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .context("cannot install logger")
}

/// Returns an [`EnvFilter`] according to the `RUST_LOG` environment variable, or `def`.
fn get_env_filter(def: EnvFilter) -> EnvFilter {
    use std::env::{
        self,
        VarError::{NotPresent, NotUnicode},
    };
    match env::var(EnvFilter::DEFAULT_ENV) {
        Ok(s) => EnvFilter::new(s),
        Err(NotPresent) => def,
        Err(NotUnicode(_)) => EnvFilter::default(),
    }
}

fn default_env_filter(config: &LogConfig) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(&config.filter)
        .with_context(|| format!("invalid log filter {:?}", config.filter))
}
