//! Log output setup.
//!
//! The subscriber is never installed as the process-wide default. Callers
//! get a [`Dispatch`] handle and run the build inside
//! [`tracing::dispatcher::with_default`], so the verbosity decision lives
//! in one value that is passed in rather than in global state.

use tracing::Dispatch;
use tracing_subscriber::EnvFilter;

/// Default filter directive for the given verbosity.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Build the dispatcher for a run. `RUST_LOG` overrides the verbosity default.
pub fn dispatch(verbose: bool) -> Dispatch {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .finish();

    Dispatch::new(subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_selects_debug() {
        assert_eq!(default_directive(true), "debug");
        assert_eq!(default_directive(false), "info");
    }

    #[test]
    fn dispatch_is_scoped() {
        let dispatch = dispatch(false);
        let ran = tracing::dispatcher::with_default(&dispatch, || {
            tracing::info!("inside scoped dispatcher");
            true
        });
        assert!(ran);
    }
}
