//! Utility macros used internally by the crate.

/// Returns early with `Err($error)` when the predicate does not hold.
///
/// ```text
/// ensure!(header_count < max_headers, ParseError::too_many_headers(max_headers));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
