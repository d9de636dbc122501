//! The generic key/value logging interface and its adapter onto a leveled backend.

use crate::{entry::Entry, Error, Level, Value};
use std::panic::Location;

/// Generic structured logging interface accepting alternating keys and values
pub trait Logger {
    /// Log a flat key/value sequence.
    ///
    /// Implementations in this crate never return an error.
    #[track_caller]
    fn log(&self, kvs: &[Value]) -> Result<(), Error>;

    /// Returns a logger with `kvs` bound to every subsequent entry
    fn with(&self, kvs: &[Value]) -> Self
    where
        Self: Sized;
}

/// A structured logging engine which distinguishes levels and a message
///
/// `caller` is the location of the original [`Logger::log`] call, so backends
/// can report the user's call site rather than the adapter's.
pub trait Backend: Sized {
    /// Emit a debug entry
    fn debug(&self, message: &str, fields: &[&Value], caller: &'static Location<'static>);

    /// Emit an info entry
    fn info(&self, message: &str, fields: &[&Value], caller: &'static Location<'static>);

    /// Emit a warning entry
    fn warn(&self, message: &str, fields: &[&Value], caller: &'static Location<'static>);

    /// Emit an error entry
    fn error(&self, message: &str, fields: &[&Value], caller: &'static Location<'static>);

    /// Returns an equivalent backend with `fields` permanently bound
    fn with(&self, fields: &[Value]) -> Self;
}

/// Adapts a [`Backend`] to the [`Logger`] interface.
///
/// `log` extracts the `level`/`lvl` and `message`/`msg` keys from each call
/// (see [`Entry::parse`]) and forwards the message and remaining fields to the
/// matching backend method.
///
/// `with` hands its key/values straight to [`Backend::with`] without that
/// extraction. A backend may therefore treat a bound `level` key as fixing the
/// level of every later entry, in which case a `level` passed to `log` can't
/// override it.
#[derive(Debug, Clone, Default)]
pub struct Adapter<B> {
    backend: B,
}

impl<B: Backend> Adapter<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: Backend> Logger for Adapter<B> {
    #[track_caller]
    fn log(&self, kvs: &[Value]) -> Result<(), Error> {
        let caller = Location::caller();
        let entry = Entry::parse(kvs);
        let backend = &self.backend;
        match entry.resolved_level() {
            Level::Debug => backend.debug(entry.message, &entry.fields, caller),
            Level::Info => backend.info(entry.message, &entry.fields, caller),
            Level::Warn => backend.warn(entry.message, &entry.fields, caller),
            Level::Error => backend.error(entry.message, &entry.fields, caller),
        }
        Ok(())
    }

    fn with(&self, kvs: &[Value]) -> Self {
        Self::new(self.backend.with(kvs))
    }
}
