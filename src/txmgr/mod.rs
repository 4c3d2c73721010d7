// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Bookkeeping for a loop that posts a transaction and waits for it to be
//! mined.

mod send_state;

pub use send_state::{SendError, SendState};
