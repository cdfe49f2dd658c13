//! Log-file bootstrap.
//!
//! One file per calendar day named `YYYY-MM-DD.log`, line format
//! `<LEVEL> <HH:MM:SS> <message>`. Diagnostic detail goes here, never
//! to the console; the TUI owns the terminal.

use std::fmt;
use std::path::Path;

use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::config::LoggingConfig;

/// `<LEVEL> <HH:MM:SS> <message>`
struct LogLineFormat;

impl<S, N> FormatEvent<S, N> for LogLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let timestamp = chrono::Local::now().format("%H:%M:%S");
        write!(writer, "{} {} ", event.metadata().level(), timestamp)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Initialize the daily-file subscriber.
///
/// The returned guard flushes the non-blocking writer on drop; keep it
/// alive for the life of `main`.
pub fn init(cfg: &LoggingConfig) -> std::io::Result<WorkerGuard> {
    let dir = Path::new(&cfg.dir);
    std::fs::create_dir_all(dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_suffix("log")
        .build(dir)
        .map_err(std::io::Error::other)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.level.clone()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .event_format(LogLineFormat)
        .init();

    Ok(guard)
}
