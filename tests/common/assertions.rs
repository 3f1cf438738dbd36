//! Custom assertion macros

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert an HTTP status, printing the JSON body on mismatch
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $expected:expr) => {
        assert_eq!(
            $response.status, $expected,
            "unexpected status, body: {}",
            $response.body
        );
    };
}

/// Assert that a JSON error body carries the given status
#[macro_export]
macro_rules! assert_error_body {
    ($response:expr, $status:expr) => {
        $crate::assert_status!($response, $status);
        assert_eq!($response.body["status"], $status.as_u16());
        assert!(
            $response.body["error"].is_string(),
            "error body missing message: {}",
            $response.body
        );
    };
}
