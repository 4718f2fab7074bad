//! Logging facade.
//!
//! With the `tracing` feature these are the `tracing` macros, so structured
//! fields (`debug!(count = n, "...")`) work. Without it every call expands to
//! nothing and the engine carries no logging dependency at all.

#[cfg(feature = "tracing")]
pub use tracing::{debug, info, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! __tagalign_debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! __tagalign_info {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! __tagalign_warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{
    __tagalign_debug as debug, __tagalign_info as info, __tagalign_warn as warn,
};
