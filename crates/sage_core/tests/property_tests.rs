//! Property-based tests for session phases and the gateway error taxonomy.

use proptest::prelude::*;
use sage_core::{GatewayError, Phase, SessionState};

fn rank(phase: Phase) -> u8 {
    match phase {
        Phase::Probing => 0,
        Phase::Remote => 1,
        Phase::Local => 2,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Any sequence of confirm/degrade calls only moves the phase forward,
    /// and `degrade` reports a transition at most once.
    #[test]
    fn phase_only_moves_forward(ops in proptest::collection::vec(any::<bool>(), 0..50)) {
        let mut state = SessionState::new();
        let mut transitions = 0;
        for degrade in ops {
            let before = rank(state.phase);
            if degrade {
                if state.degrade() {
                    transitions += 1;
                }
            } else {
                state.confirm_remote();
            }
            prop_assert!(rank(state.phase) >= before);
        }
        prop_assert!(transitions <= 1);
        prop_assert_eq!(state.using_remote(), state.phase != Phase::Local);
    }

    /// Decoding never panics, and the fixed statuses decode to themselves.
    #[test]
    fn from_status_is_total(status in 100u16..600, msg in proptest::option::of("\\PC{0,80}")) {
        let err = GatewayError::from_status(status, msg);
        if matches!(status, 400 | 401 | 402 | 429) {
            prop_assert_eq!(err.status_code(), status);
        }
        prop_assert!(!err.to_string().is_empty() || matches!(err, GatewayError::InvalidRequest(_)));
    }
}
