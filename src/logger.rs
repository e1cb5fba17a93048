use std::cell::RefCell;
use std::fmt::Display;
use std::fs::File;
use std::io::{Result as IoResult, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};

static LOG_FILE: OnceLock<Arc<Mutex<File>>> = OnceLock::new();
thread_local! {
    static LOG_PREFIX: RefCell<Option<String>> = const { RefCell::new(None) };
}

#[derive(Clone, Copy)]
enum Level {
    Warning,
    Error,
}

impl Level {
    const fn label(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

fn format_with_prefix(message: impl Display) -> String {
    current_log_prefix().map_or_else(|| message.to_string(), |p| format!("{p}: {message}"))
}

fn emit(level: Level, message: &str) {
    let message = format_with_prefix(message);
    eprintln!("{}: {message}", level.label());
    if let Some(writer) = LOG_FILE.get()
        && let Ok(mut file) = writer.lock()
    {
        let _ = writeln!(file, "{}: {message}", level.label());
    }
}

/// Configures a log file that receives decoder warnings and errors.
///
/// Only the first successful call installs a writer; later calls still
/// create their file but leave the original writer in place.
///
/// # Errors
///
/// Returns an error if the log file cannot be created.
pub fn set_log_file(path: &Path) -> IoResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let _ = LOG_FILE.set(Arc::new(Mutex::new(file)));
    Ok(())
}

/// Returns the prefix installed on the current thread, if any.
#[must_use]
pub fn current_log_prefix() -> Option<String> {
    LOG_PREFIX.with(|prefix| prefix.borrow().clone())
}

/// Sets a thread-local prefix that will be prepended to subsequent log
/// messages. Returns a guard that restores the previous prefix on drop.
pub fn set_log_prefix(prefix: impl Into<String>) -> LogPrefixGuard {
    let previous = LOG_PREFIX.with(|slot| slot.borrow_mut().replace(prefix.into()));
    LogPrefixGuard { previous }
}

#[must_use = "the prefix is removed as soon as the guard is dropped"]
pub struct LogPrefixGuard {
    previous: Option<String>,
}

impl Drop for LogPrefixGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        LOG_PREFIX.with(|slot| {
            *slot.borrow_mut() = previous;
        });
    }
}

pub fn log_warn(message: &str) {
    emit(Level::Warning, message);
}

pub fn log_error(message: &str) {
    emit(Level::Error, message);
}
