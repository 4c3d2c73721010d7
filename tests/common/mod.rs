// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use assert_cmd::{Command, cargo::cargo_bin_cmd};

pub fn tool() -> Command {
    cargo_bin_cmd!("state-surgery")
}
