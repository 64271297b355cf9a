//! Log output module
//!
//! Routes the access and error streams to stdout/stderr or append-only
//! files. Targets are fixed once at startup.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

static WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Where one log stream ends up
enum Sink {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

impl Sink {
    fn for_path(path: Option<&str>, console: Self) -> io::Result<Self> {
        match path {
            Some(p) => Ok(Self::File(Mutex::new(open_append(p)?))),
            None => Ok(console),
        }
    }

    fn write(&self, message: &str) {
        match self {
            Self::Stdout => println!("{message}"),
            Self::Stderr => eprintln!("{message}"),
            Self::File(file) => {
                if let Ok(mut f) = file.lock() {
                    let _ = writeln!(f, "{message}");
                }
            }
        }
    }
}

/// Thread-safe pair of access/error streams
pub struct LogWriter {
    access: Sink,
    error: Sink,
}

impl LogWriter {
    pub fn write_access(&self, message: &str) {
        self.access.write(message);
    }

    pub fn write_error(&self, message: &str) {
        self.error.write(message);
    }
}

/// Open a log file for appending, creating parent directories as needed
fn open_append(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global writer; call once at application startup
pub fn init(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter {
        access: Sink::for_path(access_log_file, Sink::Stdout)?,
        error: Sink::for_path(error_log_file, Sink::Stderr)?,
    };

    WRITER.set(writer).map_err(|_| {
        io::Error::new(io::ErrorKind::AlreadyExists, "logger already initialized")
    })
}

/// The installed writer; panics when `init()` has not run, so callers must
/// check `is_initialized()` first
pub fn get() -> &'static LogWriter {
    WRITER.get().expect("logger not initialized")
}

pub fn is_initialized() -> bool {
    WRITER.get().is_some()
}
