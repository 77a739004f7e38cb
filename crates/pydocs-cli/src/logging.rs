//! Logging context for the binary: stderr plus a size-rotated log file.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

const DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Where and how the log file is written.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub dir: PathBuf,
    pub file_name: String,
    /// Rotate once the file would reach this many bytes.
    pub max_bytes: u64,
    /// Number of rotated files kept (`parser.log.1` is the newest).
    pub backups: usize,
}

impl LogConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_name: "parser.log".to_string(),
            max_bytes: 1_000_000,
            backups: 5,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// Append-only log file that rolls over by size.
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    /// `None` between closing the old file and opening the new one.
    file: Option<File>,
    written: u64,
}

impl RotatingFile {
    pub fn open(config: &LogConfig) -> io::Result<Self> {
        fs::create_dir_all(&config.dir)?;
        let path = config.path();
        let file = open_append(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            max_bytes: config.max_bytes,
            backups: config.backups,
            file: Some(file),
            written,
        })
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    /// Shift `log.N-1` to `log.N` down to `log` to `log.1`, dropping the
    /// oldest, then start a fresh file.
    ///
    /// The current file is closed before anything is renamed.
    fn rotate(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        self.written = 0;
        if self.backups == 0 {
            self.file = Some(File::create(&self.path)?);
            return Ok(());
        }
        for index in (1..self.backups).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))?;
        self.file = Some(open_append(&self.path)?);
        Ok(())
    }

    fn needs_rollover(&self, incoming: usize) -> bool {
        self.max_bytes > 0 && self.written > 0 && self.written + incoming as u64 >= self.max_bytes
    }

    /// The open file, reopened in append mode if a rotation failed midway.
    fn current(&mut self) -> io::Result<&mut File> {
        if self.file.is_none() {
            let file = open_append(&self.path)?;
            self.written = file.metadata()?.len();
            self.file = Some(file);
        }
        match self.file.as_mut() {
            Some(file) => Ok(file),
            None => Err(io::Error::other("log file is not open")),
        }
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.needs_rollover(buf.len()) {
            self.rotate()?;
        }
        let n = self.current()?.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// `"dd.mm.YYYY HH:MM:SS - [LEVEL] - message"`
struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
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
        write!(
            writer,
            "{} - [{}] - ",
            Local::now().format(DATETIME_FORMAT),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Keeps the log pipeline alive. Dropping it flushes the file writer and
/// uninstalls the subscriber.
pub struct LogContext {
    _default: tracing::subscriber::DefaultGuard,
    _worker: WorkerGuard,
}

/// Build the subscriber and install it as the default for the current
/// thread. `RUST_LOG` overrides the `info` level.
pub fn init(config: &LogConfig) -> io::Result<LogContext> {
    let file = RotatingFile::open(config)?;
    let (file_writer, worker) = tracing_appender::non_blocking(file);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat)
                .with_writer(file_writer),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat)
                .with_writer(io::stderr),
        );

    Ok(LogContext {
        _default: tracing::subscriber::set_default(subscriber),
        _worker: worker,
    })
}
