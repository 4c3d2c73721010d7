// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use ahash::HashSet;
use ethereum_types::H256;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

/// Message fragment nodes return when the nonce was already used.
const NONCE_TOO_LOW: &str = "nonce too low";

/// Outcome of a failed send, as far as [`SendState`] cares.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// A transaction with the same sender and nonce was already accepted.
    #[error("nonce too low")]
    NonceTooLow,
    #[error("{0}")]
    Other(String),
}

impl SendError {
    /// Classifies an error message returned by a node.
    pub fn from_rpc_message(message: &str) -> Self {
        if message.to_lowercase().contains(NONCE_TOO_LOW) {
            Self::NonceTooLow
        } else {
            Self::Other(message.to_owned())
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    /// Consecutive `NonceTooLow` errors since the last mined transaction.
    nonce_too_low_count: u64,
    mined: HashSet<H256>,
}

/// Tracks the send attempts of one logical transaction and decides when
/// the sender should give up.
///
/// Repeated `NonceTooLow` errors mean someone else consumed the nonce, unless
/// one of our own transactions was mined, in which case they are expected.
/// The sending and the confirming task may share one instance.
#[derive(Debug)]
pub struct SendState {
    inner: Mutex<Inner>,
    safe_abort_nonce_too_low_count: u64,
}

impl SendState {
    pub fn new(safe_abort_nonce_too_low_count: u64) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            safe_abort_nonce_too_low_count,
        }
    }

    /// Records the result of a send attempt. `None` is a successful send.
    pub fn process_send_error(&self, err: Option<&SendError>) {
        match err {
            Some(SendError::NonceTooLow) => {
                let mut inner = self.inner.lock();
                inner.nonce_too_low_count += 1;
                debug!(count = inner.nonce_too_low_count, "Nonce too low");
            }
            Some(SendError::Other(message)) => debug!(%message, "Send failed"),
            None => {}
        }
    }

    pub fn tx_mined(&self, hash: H256) {
        let mut inner = self.inner.lock();
        inner.mined.insert(hash);
        inner.nonce_too_low_count = 0;
    }

    /// A previously mined transaction was reorged out. Unknown hashes are
    /// ignored.
    pub fn tx_not_mined(&self, hash: H256) {
        let mut inner = self.inner.lock();
        if inner.mined.remove(&hash) && inner.mined.is_empty() {
            warn!(hash = ?hash, "Last mined transaction was reorged out");
        }
    }

    pub fn should_abort_immediately(&self) -> bool {
        let inner = self.inner.lock();
        inner.mined.is_empty() && inner.nonce_too_low_count >= self.safe_abort_nonce_too_low_count
    }

    pub fn is_waiting_for_confirmation(&self) -> bool {
        !self.inner.lock().mined.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use rstest::rstest;

    const K: u64 = 3;

    #[derive(Debug, Clone, Copy)]
    enum Event {
        Sent,
        Other,
        NonceTooLow,
        Mined(u64),
        NotMined(u64),
    }
    use Event::*;

    fn replay(events: &[Event]) -> SendState {
        let state = SendState::new(K);
        let other = SendError::Other("insufficient funds".into());
        for event in events {
            match *event {
                Sent => state.process_send_error(None),
                Other => state.process_send_error(Some(&other)),
                NonceTooLow => state.process_send_error(Some(&SendError::NonceTooLow)),
                Mined(h) => state.tx_mined(H256::from_low_u64_be(h)),
                NotMined(h) => state.tx_not_mined(H256::from_low_u64_be(h)),
            }
        }
        state
    }

    #[rstest]
    #[case::fresh(&[], false, false)]
    #[case::successful_sends(&[Sent, Sent, Sent], false, false)]
    #[case::other_errors(&[Other, Other, Other, Other], false, false)]
    #[case::nonce_too_low(&[NonceTooLow, NonceTooLow, NonceTooLow], true, false)]
    #[case::below_threshold(&[NonceTooLow, NonceTooLow], false, false)]
    #[case::other_errors_do_not_reset(
        &[NonceTooLow, Other, NonceTooLow, Sent, NonceTooLow],
        true,
        false
    )]
    #[case::mined_first(
        &[Mined(1), NonceTooLow, NonceTooLow, NonceTooLow],
        false,
        true
    )]
    #[case::mine_resets_counter(
        &[
            NonceTooLow,
            NonceTooLow,
            Mined(1),
            NotMined(1),
            NonceTooLow,
        ],
        false,
        false
    )]
    #[case::unmined_then_nonce_too_low(
        &[
            NonceTooLow,
            NonceTooLow,
            Mined(1),
            NotMined(1),
            NonceTooLow,
            NonceTooLow,
            NonceTooLow,
        ],
        true,
        false
    )]
    #[case::unknown_unmine(
        &[NonceTooLow, NonceTooLow, NonceTooLow, NotMined(1)],
        true,
        false
    )]
    #[case::one_of_two_unmined(
        &[
            Mined(1),
            Mined(2),
            NotMined(1),
            NonceTooLow,
            NonceTooLow,
            NonceTooLow,
        ],
        false,
        true
    )]
    fn send_state(#[case] events: &[Event], #[case] abort: bool, #[case] waiting: bool) {
        let state = replay(events);
        assert_eq!(state.should_abort_immediately(), abort);
        assert_eq!(state.is_waiting_for_confirmation(), waiting);
    }

    #[test]
    fn unmine_keeps_counter() {
        let state = replay(&[NonceTooLow, NonceTooLow, NonceTooLow, Mined(1)]);
        assert!(!state.should_abort_immediately());
        state.tx_not_mined(H256::from_low_u64_be(1));
        assert!(!state.should_abort_immediately());
        state.process_send_error(Some(&SendError::NonceTooLow));
        state.process_send_error(Some(&SendError::NonceTooLow));
        assert!(!state.should_abort_immediately());
        state.process_send_error(Some(&SendError::NonceTooLow));
        assert!(state.should_abort_immediately());
    }

    #[rstest]
    #[case("nonce too low", SendError::NonceTooLow)]
    #[case("Nonce too low: address 0x01, tx: 5 state: 7", SendError::NonceTooLow)]
    #[case(
        "replacement transaction underpriced",
        SendError::Other("replacement transaction underpriced".into())
    )]
    fn classify_rpc_errors(#[case] message: &str, #[case] expected: SendError) {
        assert_eq!(SendError::from_rpc_message(message), expected);
    }

    #[test]
    fn shared_between_threads() {
        let state = Arc::new(SendState::new(K));
        let sender = {
            let state = Arc::clone(&state);
            thread::spawn(move || {
                for _ in 0..100 {
                    state.process_send_error(Some(&SendError::NonceTooLow));
                }
            })
        };
        let confirmer = {
            let state = Arc::clone(&state);
            thread::spawn(move || {
                for i in 0..100 {
                    state.tx_mined(H256::from_low_u64_be(i));
                }
            })
        };
        sender.join().unwrap();
        confirmer.join().unwrap();

        assert!(state.is_waiting_for_confirmation());
        assert!(!state.should_abort_immediately());
        for i in 0..100 {
            state.tx_not_mined(H256::from_low_u64_be(i));
        }
        assert!(!state.is_waiting_for_confirmation());
        for _ in 0..K {
            state.process_send_error(Some(&SendError::NonceTooLow));
        }
        assert!(state.should_abort_immediately());
    }
}
