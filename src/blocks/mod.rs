// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod block;
mod header;

pub use block::Block;
pub use header::{EMPTY_UNCLE_HASH, Header};
