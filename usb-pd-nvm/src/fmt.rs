//! Crate-local logging macros, forwarded to `defmt` or `log` depending on the enabled feature

#[cfg(all(feature = "log", feature = "defmt", not(doc)))]
compile_error!("features `log` and `defmt` are mutually exclusive");

#[cfg(all(not(doc), feature = "defmt"))]
mod backend {
    /// Logs a trace message using the selected backend
    #[collapse_debuginfo(yes)]
    macro_rules! trace {
        ($s:literal $(, $x:expr)* $(,)?) => {
            ::defmt::trace!($s $(, $x)*)
        };
    }

    /// Logs a debug message using the selected backend
    #[collapse_debuginfo(yes)]
    macro_rules! debug {
        ($s:literal $(, $x:expr)* $(,)?) => {
            ::defmt::debug!($s $(, $x)*)
        };
    }

    /// Logs an info message using the selected backend
    #[collapse_debuginfo(yes)]
    macro_rules! info {
        ($s:literal $(, $x:expr)* $(,)?) => {
            ::defmt::info!($s $(, $x)*)
        };
    }

    /// Logs a warning using the selected backend
    #[collapse_debuginfo(yes)]
    macro_rules! warn_ {
        ($s:literal $(, $x:expr)* $(,)?) => {
            ::defmt::warn!($s $(, $x)*)
        };
    }

    /// Logs an error using the selected backend
    #[collapse_debuginfo(yes)]
    macro_rules! error {
        ($s:literal $(, $x:expr)* $(,)?) => {
            ::defmt::error!($s $(, $x)*)
        };
    }

    pub(crate) use {debug, error, info, trace, warn_ as warn};
}

#[cfg(all(not(doc), feature = "log"))]
mod backend {
    /// Logs a trace message using the selected backend
    #[collapse_debuginfo(yes)]
    macro_rules! trace {
        ($s:literal $(, $x:expr)* $(,)?) => {
            ::log::trace!($s $(, $x)*)
        };
    }

    /// Logs a debug message using the selected backend
    #[collapse_debuginfo(yes)]
    macro_rules! debug {
        ($s:literal $(, $x:expr)* $(,)?) => {
            ::log::debug!($s $(, $x)*)
        };
    }

    /// Logs an info message using the selected backend
    #[collapse_debuginfo(yes)]
    macro_rules! info {
        ($s:literal $(, $x:expr)* $(,)?) => {
            ::log::info!($s $(, $x)*)
        };
    }

    /// Logs a warning using the selected backend
    #[collapse_debuginfo(yes)]
    macro_rules! warn_ {
        ($s:literal $(, $x:expr)* $(,)?) => {
            ::log::warn!($s $(, $x)*)
        };
    }

    /// Logs an error using the selected backend
    #[collapse_debuginfo(yes)]
    macro_rules! error {
        ($s:literal $(, $x:expr)* $(,)?) => {
            ::log::error!($s $(, $x)*)
        };
    }

    pub(crate) use {debug, error, info, trace, warn_ as warn};
}

// No backend selected (or building docs): arguments are still borrowed so they type-check and count as used
#[cfg(any(doc, not(any(feature = "defmt", feature = "log"))))]
mod backend {
    /// Logs a trace message using the selected backend
    #[collapse_debuginfo(yes)]
    macro_rules! trace {
        ($s:literal $(, $x:expr)* $(,)?) => {{
            let _ = ($(&$x,)*);
        }};
    }

    /// Logs a debug message using the selected backend
    #[collapse_debuginfo(yes)]
    macro_rules! debug {
        ($s:literal $(, $x:expr)* $(,)?) => {{
            let _ = ($(&$x,)*);
        }};
    }

    /// Logs an info message using the selected backend
    #[collapse_debuginfo(yes)]
    macro_rules! info {
        ($s:literal $(, $x:expr)* $(,)?) => {{
            let _ = ($(&$x,)*);
        }};
    }

    /// Logs a warning using the selected backend
    #[collapse_debuginfo(yes)]
    macro_rules! warn_ {
        ($s:literal $(, $x:expr)* $(,)?) => {{
            let _ = ($(&$x,)*);
        }};
    }

    /// Logs an error using the selected backend
    #[collapse_debuginfo(yes)]
    macro_rules! error {
        ($s:literal $(, $x:expr)* $(,)?) => {{
            let _ = ($(&$x,)*);
        }};
    }

    pub(crate) use {debug, error, info, trace, warn_ as warn};
}

pub(crate) use backend::{debug, error, info, trace, warn};
