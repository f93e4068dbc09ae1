use anyhow::Error;
use tablestate::prelude::TableStateError;

/// Exit code 2 for malformed input (a token or json that does not decode), 1 otherwise.
pub fn exit_code(err: &Error) -> i32 {
    if err.downcast_ref::<TableStateError>().is_some()
        || err
            .downcast_ref::<serde_path_to_error::Error<serde_json::Error>>()
            .is_some()
    {
        return 2;
    }
    1
}
