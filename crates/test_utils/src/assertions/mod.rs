// Path: crates/test_utils/src/assertions/mod.rs
//! Assertion utilities for testing

/// Assert that a result is OK and unwrap it
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(err) => panic!("Expected Ok, got Err: {:?}", err),
        }
    };
    ($expr:expr, $($arg:tt)+) => {
        match $expr {
            Ok(val) => val,
            Err(err) => panic!("Expected Ok, got Err: {:?} ({})", err, format!($($arg)+)),
        }
    };
}

/// Assert that a result is Err and unwrap the error
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(val) => panic!("Expected Err, got Ok: {:?}", val),
            Err(err) => err,
        }
    };
    ($expr:expr, $($arg:tt)+) => {
        match $expr {
            Ok(val) => panic!("Expected Err, got Ok: {:?} ({})", val, format!($($arg)+)),
            Err(err) => err,
        }
    };
}

/// Assert that a transactional result failed with a specific governance error.
#[macro_export]
macro_rules! assert_governance_err {
    ($expr:expr, $pattern:pat) => {
        match $expr {
            Ok(val) => panic!("Expected governance error, got Ok: {:?}", val),
            Err(err) => {
                if !matches!(err.as_governance(), Some($pattern)) {
                    panic!(
                        "Expected governance error matching {}, got: {:?}",
                        stringify!($pattern),
                        err
                    );
                }
                err
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use agora_types::error::{GovernanceError, TransactionError};

    #[test]
    fn test_assert_ok_and_err_unwrap() {
        let ok: Result<u8, ()> = Ok(3);
        assert_eq!(assert_ok!(ok), 3);
        let err: Result<(), &str> = Err("boom");
        assert_eq!(assert_err!(err), "boom");
    }

    #[test]
    fn test_assert_governance_err() {
        let res: Result<(), TransactionError> = Err(GovernanceError::InactiveProposal(1).into());
        let err = assert_governance_err!(res, GovernanceError::InactiveProposal(1));
        assert_eq!(err.to_string(), "inactive proposal: 1");
    }

    #[test]
    #[should_panic(expected = "Expected governance error")]
    fn test_assert_governance_err_rejects_other_variants() {
        let res: Result<(), TransactionError> = Err(GovernanceError::EmptyProposal.into());
        assert_governance_err!(res, GovernanceError::InactiveProposal(_));
    }
}
