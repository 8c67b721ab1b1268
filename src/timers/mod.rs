//! Hierarchical wall clock timers for the solver's phases.

// Instant is not available from std on wasm targets
cfg_if::cfg_if! {
    if #[cfg(target_family = "wasm")] {
        pub(crate) use web_time::Instant;
    } else {
        pub(crate) use std::time::Instant;
    }
}

mod timers;
pub use self::timers::Timers;
pub(crate) use self::timers::{notimeit, timeit};
