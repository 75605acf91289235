//! # Thread-Safety Checks
//!
//! Compile-time assertions, used by the tests of every shared type.

/// Fails to compile unless `S` is `Send`.
pub fn static_is_send_check<S: Send>(_: &S) {}

/// Fails to compile unless `S` is `Sync`.
pub fn static_is_sync_check<S: Sync>(_: &S) {}

/// Fails to compile unless `S` is `Send` and `Sync`.
pub fn static_is_send_sync_check<S: Send + Sync>(v: &S) {
    static_is_send_check(v);
    static_is_sync_check(v);
}
