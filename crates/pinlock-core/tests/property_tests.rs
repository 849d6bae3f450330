//! Property-based tests for the keypad buffers and PIN checks
//!
//! These tests verify invariants that should hold for all keypad input.

mod common;

use common::Fixture;
use pinlock_core::memory::Route;
use pinlock_core::password::random_password;
use pinlock_core::{CredentialKey, Digit, PinCheck, PinField};
use proptest::prelude::*;

// ============================================
// Strategies
// ============================================

fn arb_digit() -> impl Strategy<Value = Digit> {
    (0u8..=9).prop_map(|d| Digit::new(d).unwrap())
}

fn arb_field() -> impl Strategy<Value = PinField> {
    prop_oneof![
        Just(PinField::Pin),
        Just(PinField::NewPin),
        Just(PinField::PinVerify),
    ]
}

fn arb_pin(max_len: usize) -> impl Strategy<Value = String> {
    proptest::string::string_regex(&format!("[0-9]{{0,{}}}", max_len)).unwrap()
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

// ============================================
// Property Tests
// ============================================

proptest! {
    #[test]
    fn push_appends_below_max(field in arb_field(), start in arb_pin(5), digit in arb_digit()) {
        let mut fx = Fixture::new();
        fx.ctl.store_mut().auth.set(field, &start).unwrap();

        fx.ctl.push_pin_digit(digit, field);

        let buf = fx.ctl.store().auth.buffer(field).to_string();
        prop_assert_eq!(buf.len(), start.len() + 1);
        prop_assert!(buf.starts_with(&start));
        prop_assert_eq!(buf.chars().last(), Some(digit.as_char()));
    }

    #[test]
    fn push_is_noop_at_max(field in arb_field(), start in "[0-9]{6}", digit in arb_digit()) {
        let mut fx = Fixture::new();
        fx.ctl.store_mut().auth.set(field, &start).unwrap();

        fx.ctl.push_pin_digit(digit, field);

        prop_assert_eq!(fx.ctl.store().auth.buffer(field), start.as_str());
        prop_assert!(fx.nav.routes().is_empty());
    }

    #[test]
    fn pop_removes_last(field in arb_field(), start in "[0-9]{1,6}") {
        let mut fx = Fixture::new();
        fx.ctl.store_mut().auth.set(field, &start).unwrap();

        fx.ctl.pop_pin_digit(field);

        prop_assert_eq!(fx.ctl.store().auth.buffer(field), &start[..start.len() - 1]);
    }

    #[test]
    fn pop_empty_is_noop(field in arb_field()) {
        let mut fx = Fixture::new();

        fx.ctl.pop_pin_digit(field);

        prop_assert_eq!(fx.ctl.store().auth.buffer(field), "");
        let expected = if field == PinField::PinVerify { vec![Route::SetPin] } else { vec![] };
        prop_assert_eq!(fx.nav.routes(), expected);
    }

    #[test]
    fn buffers_stay_digits_within_bounds(
        keys in proptest::collection::vec((arb_field(), proptest::option::of(arb_digit())), 0..40)
    ) {
        let mut fx = Fixture::new();
        for (field, key) in keys {
            match key {
                Some(digit) => fx.ctl.push_pin_digit(digit, field),
                None => fx.ctl.pop_pin_digit(field),
            }
        }

        let auth = &fx.ctl.store().auth;
        for field in [PinField::Pin, PinField::NewPin, PinField::PinVerify] {
            let buf = auth.buffer(field);
            prop_assert!(buf.len() <= 6);
            prop_assert!(buf.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn check_new_pin_accepts_only_equal_complete_pins(a in arb_pin(6), b in arb_pin(6)) {
        let mut fx = Fixture::new();
        fx.ctl.store_mut().auth.set(PinField::NewPin, &a).unwrap();
        fx.ctl.store_mut().auth.set(PinField::PinVerify, &b).unwrap();

        let result = block_on(fx.ctl.check_new_pin()).unwrap();

        if a == b && a.len() == 6 {
            prop_assert_eq!(result, PinCheck::Accepted);
            prop_assert_eq!(fx.secure.get(CredentialKey::DevicePin), Some(a));
            prop_assert_eq!(fx.wallet.new_password_checks().len(), 1);
            prop_assert!(fx.alerts.is_empty());
        } else {
            prop_assert_eq!(result, PinCheck::Rejected);
            prop_assert!(fx.secure.writes().is_empty());
            prop_assert!(fx.wallet.new_password_checks().is_empty());
            prop_assert_eq!(fx.alerts.len(), 1);
        }
    }

    #[test]
    fn check_pin_unlocks_only_on_match(entered in "[0-9]{6}", stored in "[0-9]{6}") {
        let secure = pinlock_core::memory::MemorySecureStore::new()
            .with_item(CredentialKey::DevicePin, stored.clone())
            .with_item(CredentialKey::WalletPassword, "pw");
        let mut fx = Fixture::with(secure, pinlock_core::memory::ScriptedBiometrics::unavailable());
        fx.ctl.store_mut().auth.set(PinField::Pin, &entered).unwrap();

        block_on(fx.ctl.check_pin()).unwrap();

        let unlocks = fx.wallet.password_checks().len();
        if entered == stored {
            prop_assert_eq!(unlocks, 1);
            prop_assert!(fx.alerts.is_empty());
        } else {
            prop_assert_eq!(unlocks, 0);
            prop_assert_eq!(fx.alerts.len(), 1);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_password_is_lower_hex(_seed in any::<u8>()) {
        let password = random_password();
        prop_assert_eq!(password.len(), 64);
        prop_assert!(password.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')));
    }
}
