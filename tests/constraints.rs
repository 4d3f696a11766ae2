//! Tests that swap the process-wide constraint table. They live in their
//! own binary, serialized behind a lock, so the swaps cannot race the
//! other suites.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, OnceLock};

use pretty_assertions::assert_eq;
use selfies::{
    decode, get_preset_constraints, get_semantic_constraints, get_semantic_robust_alphabet,
    set_default_constraints, set_semantic_constraints, ConstraintsError,
};

fn lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(Mutex::default)
        .lock()
        .expect("constraint test lock")
}

/// Restores the default table when a test finishes, panicking or not.
struct RestoreDefault;

impl Drop for RestoreDefault {
    fn drop(&mut self) {
        set_default_constraints();
    }
}

#[test]
fn triple_bond_clamps_after_restricting_carbon() {
    let _guard = lock();
    let _restore = RestoreDefault;

    assert_eq!(decode("[C][#C]").unwrap(), "C#C");

    let mut limits = get_preset_constraints("default").unwrap();
    limits.insert("C".to_string(), 1);
    set_semantic_constraints(limits).unwrap();

    assert_eq!(decode("[C][#C]").unwrap(), "CC");
}

#[test]
fn get_returns_a_fresh_copy() {
    let _guard = lock();
    let _restore = RestoreDefault;

    let mut copy = get_semantic_constraints();
    copy.insert("C".to_string(), 0);

    assert_eq!(get_semantic_constraints()["C"], 4);
}

#[test]
fn set_then_get_round_trips() {
    let _guard = lock();
    let _restore = RestoreDefault;

    let limits = get_preset_constraints("octet_rule").unwrap();
    set_semantic_constraints(limits.clone()).unwrap();

    assert_eq!(get_semantic_constraints(), limits);
}

#[test]
fn invalid_tables_are_rejected_and_leave_the_old_one_installed() {
    let _guard = lock();
    let _restore = RestoreDefault;

    let before = get_semantic_constraints();

    let mut missing_fallback: HashMap<String, u8> = before.clone();
    missing_fallback.remove("?");
    assert_eq!(
        set_semantic_constraints(missing_fallback).unwrap_err(),
        ConstraintsError::MissingFallback
    );

    let mut bad_key = before.clone();
    bad_key.insert("Qq+1".to_string(), 3);
    assert_eq!(
        set_semantic_constraints(bad_key).unwrap_err(),
        ConstraintsError::InvalidKey("Qq+1".to_string())
    );

    assert_eq!(get_semantic_constraints(), before);
}

#[test]
fn robust_alphabet_follows_the_installed_table() {
    let _guard = lock();
    let _restore = RestoreDefault;

    assert!(get_semantic_robust_alphabet().contains("[#C]"));

    let mut limits = get_preset_constraints("default").unwrap();
    limits.insert("C".to_string(), 2);
    set_semantic_constraints(limits).unwrap();

    let alphabet = get_semantic_robust_alphabet();
    assert!(alphabet.contains("[=C]"));
    assert!(!alphabet.contains("[#C]"));
}

#[test]
fn hypervalent_preset_admits_heptavalent_iodine() {
    let _guard = lock();
    let _restore = RestoreDefault;

    set_semantic_constraints(get_preset_constraints("hypervalent").unwrap()).unwrap();

    // Under the default table this would clamp down to a single bond.
    assert_eq!(decode("[I][#C]").unwrap(), "I#C");
}
