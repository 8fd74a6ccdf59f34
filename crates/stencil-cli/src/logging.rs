//! Tracing subscriber set-up for the `stencil` binary.
//!
//! The library crates only emit events. The pipeline milestones come from
//! `stencil_core` (validate, resolve, render, assemble, export); the
//! per-artifact spans come from the renderers in `stencil_adapters`. Each
//! `-v` opens up the core one step before the renderers:
//!
//! | Flags     | `stencil` / `stencil_core` | `stencil_adapters` | Span timings |
//! |-----------|----------------------------|--------------------|--------------|
//! | `--quiet` | error                      | error              | no           |
//! | (none)    | warn                       | warn               | no           |
//! | `-v`      | info                       | warn               | no           |
//! | `-vv`     | debug                      | info               | yes          |
//! | `-vvv`    | trace                      | trace              | yes          |
//!
//! `STENCIL_LOG`, then `RUST_LOG`, replace the table with any `EnvFilter`
//! directive string, e.g. `STENCIL_LOG=stencil_adapters::renderer=debug`.

use std::io::IsTerminal as _;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::cli::GlobalArgs;

/// Filter variable read before `RUST_LOG`.
pub const LOG_ENV: &str = "STENCIL_LOG";

/// Filter levels derived from the global flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Verbosity {
    core: LevelFilter,
    renderers: LevelFilter,
}

impl Verbosity {
    fn from_args(args: &GlobalArgs) -> Self {
        let (core, renderers) = match (args.quiet, args.verbose) {
            (true, _) => (LevelFilter::ERROR, LevelFilter::ERROR),
            (false, 0) => (LevelFilter::WARN, LevelFilter::WARN),
            (false, 1) => (LevelFilter::INFO, LevelFilter::WARN),
            (false, 2) => (LevelFilter::DEBUG, LevelFilter::INFO),
            (false, _) => (LevelFilter::TRACE, LevelFilter::TRACE),
        };
        Self { core, renderers }
    }

    /// `EnvFilter` directives; anything outside the workspace stays at warn.
    fn directives(self) -> String {
        let Self { core, renderers } = self;
        format!("warn,stencil={core},stencil_core={core},stencil_adapters={renderers}")
            .to_lowercase()
    }

    /// Span close events, which carry `time.busy`.
    fn span_events(self) -> FmtSpan {
        if self.core >= LevelFilter::DEBUG {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

/// Install the global subscriber, writing to stderr so stdout stays clean for
/// `--format json`.
///
/// Call once, before any tracing macro fires.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let verbosity = Verbosity::from_args(args);
    let filter = env_filter(LOG_ENV)
        .or_else(|| env_filter(EnvFilter::DEFAULT_ENV))
        .unwrap_or_else(|| EnvFilter::new(verbosity.directives()));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!args.no_color && std::io::stderr().is_terminal())
        .with_target(verbosity.core >= LevelFilter::DEBUG)
        .with_span_events(verbosity.span_events());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))
}

/// A filter from `var`, if it is set and parses.
fn env_filter(var: &str) -> Option<EnvFilter> {
    EnvFilter::try_from_env(var).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(verbose: u8, quiet: bool) -> GlobalArgs {
        GlobalArgs {
            verbose,
            quiet,
            no_color: true,
            config: None,
            format: None,
        }
    }

    #[test]
    fn default_only_warns() {
        assert_eq!(
            Verbosity::from_args(&args(0, false)).directives(),
            "warn,stencil=warn,stencil_core=warn,stencil_adapters=warn"
        );
    }

    #[test]
    fn renderers_trail_the_pipeline_by_one_step() {
        let one = Verbosity::from_args(&args(1, false));
        assert_eq!((one.core, one.renderers), (LevelFilter::INFO, LevelFilter::WARN));

        let two = Verbosity::from_args(&args(2, false));
        assert_eq!(
            two.directives(),
            "warn,stencil=debug,stencil_core=debug,stencil_adapters=info"
        );
    }

    #[test]
    fn three_or_more_traces_everything() {
        for verbose in [3, 9] {
            let v = Verbosity::from_args(&args(verbose, false));
            assert_eq!((v.core, v.renderers), (LevelFilter::TRACE, LevelFilter::TRACE));
        }
    }

    #[test]
    fn quiet_wins_over_verbose() {
        let v = Verbosity::from_args(&args(3, true));
        assert_eq!((v.core, v.renderers), (LevelFilter::ERROR, LevelFilter::ERROR));
    }

    #[test]
    fn span_timings_start_at_debug() {
        assert_eq!(Verbosity::from_args(&args(1, false)).span_events(), FmtSpan::NONE);
        assert_eq!(Verbosity::from_args(&args(2, false)).span_events(), FmtSpan::CLOSE);
    }

    #[test]
    fn directives_parse_as_a_filter() {
        for verbose in 0..4 {
            let directives = Verbosity::from_args(&args(verbose, false)).directives();
            assert!(EnvFilter::try_new(&directives).is_ok(), "{directives}");
        }
    }
}
