//! Integration tests for the binding seam itself: what happens when the
//! native artifact is not installed.
//!
//! These run in an environment without libkustomer, which is exactly the
//! failure mode they pin down: every operation must surface a catchable
//! error naming the missing dependency, never a crash, and the outcome must
//! be identical on every retry.

use _pykustomer::bridge::{session, EnsureTransaction};
use _pykustomer::KustomerError;

fn expect_linkage_error<T: std::fmt::Debug>(result: Result<T, KustomerError>) -> String {
    match result {
        Err(KustomerError::Linkage(msg)) => msg,
        other => panic!("expected a linkage error, got {:?}", other),
    }
}

#[test]
fn test_missing_native_library_is_a_catchable_error() {
    let message = expect_linkage_error(session::initialize(Some("groupware")));
    // The diagnostic names the artifact and how to point the loader at it.
    assert!(message.contains("kustomer"), "{}", message);
    assert!(message.contains("KUSTOMER_LIB_DIR"), "{}", message);
}

#[test]
fn test_every_entry_point_reports_the_same_missing_dependency() {
    let first = expect_linkage_error(session::initialize(None));
    let again = expect_linkage_error(session::initialize(None));
    assert_eq!(first, again);

    let from_wait = expect_linkage_error(session::wait_until_ready(1));
    assert_eq!(first, from_wait);

    let from_version = expect_linkage_error(session::version());
    assert_eq!(first, from_version);

    let from_begin = expect_linkage_error(EnsureTransaction::begin());
    assert_eq!(first, from_begin);

    let from_dump = expect_linkage_error(session::dump_claims_raw());
    assert_eq!(first, from_dump);
}

#[test]
fn test_marshaling_is_checked_before_the_boundary() {
    // An interior nul can never be represented as a C string; the call must
    // fail as a marshaling error, not as a linkage or native error.
    let err = session::initialize(Some("bad\0name")).unwrap_err();
    assert!(matches!(err, KustomerError::Marshal(_)), "{:?}", err);
}
