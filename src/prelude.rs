#![allow(unused_imports)]

pub use tracing::{Level, debug, info, instrument, trace, warn};

pub use crate::error::{Error, Result};

/// Fail with the given error unless the condition holds.
macro_rules! ensure {
    ($condition:expr, $error:expr $(,)?) => {
        if !$condition {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
