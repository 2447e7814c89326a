use super::*;

#[test]
fn unique_violation_is_conflict() {
    let err = StoreError::from_sqlstate("23505", "duplicate key value violates unique constraint \"games_pkey\"");
    assert!(matches!(err, Some(StoreError::Conflict(msg)) if msg.contains("games_pkey")));
}

#[test]
fn other_integrity_violations_and_data_exceptions_are_rejected() {
    for code in ["23502", "23503", "23514", "22021", "22P02", "22003"] {
        let err = StoreError::from_sqlstate(code, "constraint failed");
        assert!(matches!(err, Some(StoreError::Rejected(_))), "{code} should be rejected");
    }
}

#[test]
fn non_integrity_codes_are_not_classified() {
    assert!(StoreError::from_sqlstate("40001", "serialization failure").is_none());
    assert!(StoreError::from_sqlstate("57014", "canceling statement").is_none());
}

#[test]
fn non_database_sqlx_errors_map_to_database() {
    let err = StoreError::from(sqlx::Error::PoolTimedOut);
    assert!(matches!(err, StoreError::Database(sqlx::Error::PoolTimedOut)));
}

#[test]
fn rejected_displays_store_message_verbatim() {
    let err = StoreError::Rejected("null value in column \"title\"".into());
    assert_eq!(err.to_string(), "null value in column \"title\"");
}
