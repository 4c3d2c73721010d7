// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::ffi::OsString;

use super::cli::Cli;
use crate::cli_shared::{logger::setup_logger, read_config};
use clap::Parser as _;

pub fn main<ArgT>(args: impl IntoIterator<Item = ArgT>) -> anyhow::Result<()>
where
    ArgT: Into<OsString> + Clone,
{
    // Capture Cli inputs
    let cli = Cli::parse_from(args);
    let config = read_config(cli.config.as_deref())?;
    setup_logger(&cli.color, &config.log)?;
    cli.run(&config)
}
