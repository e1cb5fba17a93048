use std::any::Any;
use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

use crate::error::{Error, Result, Section};
use crate::logger::{current_log_prefix, log_error, log_warn, set_log_prefix};

use super::partition::Partition;

fn panic_message(payload: &(dyn Any + Send)) -> Cow<'static, str> {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        Cow::Borrowed(*message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        Cow::Owned(message.clone())
    } else {
        Cow::Borrowed("non-string panic payload")
    }
}

/// Runs `task` under a panic guard, turning both returned errors and panics
/// into a [`Error::TaskFailed`] attributed to `section`.
pub(crate) fn guard_task<F>(section: Section, task: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    let source = match panic::catch_unwind(AssertUnwindSafe(task)) {
        Ok(Ok(())) => return Ok(()),
        Ok(Err(err)) => err,
        Err(payload) => Error::Panicked {
            details: panic_message(payload.as_ref()),
        },
    };
    Err(Error::TaskFailed {
        section,
        source: Box::new(source),
    })
}

fn run_guarded(partition: Partition<'_>) -> Result<()> {
    guard_task(partition.section(), || partition.decode())
}

/// Runs every partition to completion and reports the first failure.
///
/// A single partition is decoded on the calling thread. Otherwise each
/// partition is spawned on the rayon pool and the call returns once all of
/// them have finished; failures never cancel sibling partitions.
///
/// # Errors
///
/// Returns the first [`Error::TaskFailed`] recorded by any partition.
#[cfg_attr(feature = "hotpath", hotpath::measure)]
pub fn run_partitions<'a, I>(partitions: I) -> Result<()>
where
    I: IntoIterator<Item = Partition<'a>>,
    I::IntoIter: Send,
{
    let mut partitions = partitions.into_iter().peekable();
    let Some(first) = partitions.next() else {
        return Ok(());
    };
    if partitions.peek().is_none() {
        return run_guarded(first).inspect_err(|err| log_error(&err.to_string()));
    }

    let first_failure: OnceLock<Error> = OnceLock::new();
    let prefix = current_log_prefix();
    rayon::scope(|scope| {
        for partition in std::iter::once(first).chain(partitions) {
            let first_failure = &first_failure;
            let prefix = prefix.clone();
            scope.spawn(move |_| {
                let _prefix = prefix.map(set_log_prefix);
                if let Err(err) = run_guarded(partition)
                    && let Err(discarded) = first_failure.set(err)
                {
                    log_warn(&format!("discarding additional failure: {discarded}"));
                }
            });
        }
    });

    match first_failure.into_inner() {
        Some(err) => {
            log_error(&err.to_string());
            Err(err)
        }
        None => Ok(()),
    }
}
