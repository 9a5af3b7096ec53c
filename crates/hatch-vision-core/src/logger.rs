//! Stderr logging for the frame loop.
//!
//! Lines look like `[   1.250s DEBUG shape_filter] profile 0: 2 of 5 contours kept`,
//! the stage being the last segment of the emitting module path. Records from
//! other crates are only shown at `warn` and above, so a `debug` run stays
//! focused on the detection stages.

use std::fmt;
use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

/// Module path prefix shared by every crate of this workspace.
const OWN_TARGET_PREFIX: &str = "hatch_vision";

struct FrameLoopLogger {
    level: LevelFilter,
    started: Instant,
}

impl FrameLoopLogger {
    fn passes(&self, level: Level, target: &str) -> bool {
        level <= self.level && (target.starts_with(OWN_TARGET_PREFIX) || level <= Level::Warn)
    }
}

impl Log for FrameLoopLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.passes(metadata.level(), metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            self.started.elapsed().as_secs_f64(),
            record.level(),
            record.target(),
            record.args(),
        );
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Last `::` segment of a log target.
fn stage_of(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

fn format_line(elapsed_s: f64, level: Level, target: &str, msg: &fmt::Arguments<'_>) -> String {
    format!("[{elapsed_s:8.3}s {level:>5} {}] {msg}", stage_of(target))
}

static LOGGER: OnceLock<FrameLoopLogger> = OnceLock::new();

/// Install the frame-loop logger.
///
/// Only the first call takes effect; later calls keep the original level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| FrameLoopLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Output style for [`init_tracing`].
#[cfg(feature = "tracing")]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TraceFormat {
    /// Human-readable lines stamped with process uptime.
    #[default]
    Text,
    /// One flattened JSON object per event, for log shipping off the robot.
    Json,
}

/// Install a `tracing` subscriber that reports detection spans on close.
///
/// `RUST_LOG` overrides the default `hatch_vision=info` directive.
#[cfg(feature = "tracing")]
pub fn init_tracing(format: TraceFormat) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,{OWN_TARGET_PREFIX}=info")));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE);
    // Already-installed subscribers win.
    let _ = match format {
        TraceFormat::Json => builder.json().flatten_event(true).finish().try_init(),
        TraceFormat::Text => builder
            .with_timer(tracing_subscriber::fmt::time::Uptime::default())
            .finish()
            .try_init(),
    };
}
