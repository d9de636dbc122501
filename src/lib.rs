//! `kv_env_logger` adapts flat key/value logging calls onto the `log` crate and renders them as JSON
//! through `env_logger`.
//!
//! A [`Logger`] accepts a sequence of alternating keys and values. The values under `level` (or `lvl`)
//! and `message` (or `msg`) pick the level and message of the emitted record, everything else is
//! forwarded as structured fields.
//!
//! ```no_run
//! use kv_env_logger::{kvs, Adapter, LogBackend, Logger};
//!
//! kv_env_logger::init();
//! let logger = Adapter::new(LogBackend::new()).with(&kvs!["request_id", 42]);
//! logger.log(&kvs!["level", "warn", "msg", "slow response", "elapsed_ms", 1250])?;
//! # Ok::<(), kv_env_logger::Error>(())
//! ```
//!
//! `env_logger` controls the active log levels via a `RUST_LOG` env variable.
//!
//! ## features
//!
//! * `iso-timestamps`
//!
//! By default, a timestamp field called `ts` is emitted with the current unix epoch timestamp in milliseconds.
//! You can replace this with ISO-8601 timestamps by enabling the `iso-timestamps` feature. Note, this will add `chrono` crate
//! to your dependency tree.
//!
//! ```toml
//! [dependencies]
//! kv_env_logger = { version = "0.1", features = ["iso-timestamps"] }
//! ```
//! * `backtrace`
//!
//! When registering a panic hook with `panic_hook` by default backtraces are omitted. You can
//! annotate your error with them by enabling the `backtrace` feature.
//!
//! ```toml
//! [dependencies]
//! kv_env_logger = { version = "0.1", features = ["backtrace"] }
//! ```

// export to make types accessible without
// requiring adding another Cargo.toml dependency
#[doc(hidden)]
pub extern crate env_logger;

mod adapter;
mod backend;
pub mod entry;
mod error;
mod level;

pub use adapter::{Adapter, Backend, Logger};
pub use backend::LogBackend;
pub use entry::Entry;
pub use error::Error;
pub use level::Level;
pub use serde_json::Value;

use env_logger::Builder;
use log::kv;
use std::{io, panic, thread};

/// Builds a `Vec<Value>` key/value sequence from anything convertible into a [`Value`]
///
/// ```
/// let kvs = kv_env_logger::kvs!["level", "debug", "attempt", 3];
/// assert_eq!(kvs.len(), 4);
/// ```
#[macro_export]
macro_rules! kvs {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($kv:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($kv)),+]
    };
}

/// Register configured json env logger implementation with `log` crate.
///
/// Applications should ensure this fn gets called once and only once per application
/// lifetime
///
/// # panics
///
/// Panics of logger has already been configured
pub fn init() {
    if let Err(err) = try_init() {
        panic!("failed to initialize kv_env_logger: {}", err);
    }
}

/// Register configured json env logger with `log` crate
///
/// Will yield an [`Error::SetLogger`] when a logger has already
/// been configured
pub fn try_init() -> Result<(), Error> {
    builder().try_init()?;
    Ok(())
}

/// Register a panic hook that logs panic information as an `error` entry
/// through the globally installed logger
pub fn panic_hook() {
    let logger = Adapter::new(LogBackend::new());
    panic::set_hook(Box::new(move |info| {
        let thread = thread::current();
        let thread = thread.name().unwrap_or("unnamed");

        let msg = match info.payload().downcast_ref::<&'static str>() {
            Some(s) => *s,
            None => match info.payload().downcast_ref::<String>() {
                Some(s) => &**s,
                None => "Box<Any>",
            },
        };

        let mut kvs = kvs![
            "level",
            "error",
            "message",
            format!("panicked at '{}'", msg),
            "thread",
            thread
        ];
        if let Some(location) = info.location() {
            kvs.extend(kvs![
                "location",
                format!("{}:{}", location.file(), location.line())
            ]);
        }
        #[cfg(feature = "backtrace")]
        {
            kvs.extend(kvs![
                "backtrace",
                format!("{:?}", backtrace::Backtrace::new())
            ]);
        }

        logger.log(&kvs).ok();
    }));
}

/// Yields the standard env_logger builder configured to log in JSON format
pub fn builder() -> Builder {
    let mut builder = Builder::from_default_env();
    builder.format(|f, record| {
        use io::Write;

        write!(f, "{{\"level\":")?;
        write_json_str(f, level_name(record.level()))?;

        #[cfg(feature = "iso-timestamps")]
        {
            write!(
                f,
                ",\"ts\":\"{}\"",
                chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
            )?;
        }
        #[cfg(not(feature = "iso-timestamps"))]
        {
            write!(
                f,
                ",\"ts\":{}",
                std::time::UNIX_EPOCH
                    .elapsed()
                    .map(|elapsed| elapsed.as_millis())
                    .unwrap_or_default()
            )?;
        }
        write!(f, ",\"msg\":")?;
        write_json_str(f, &record.args().to_string())?;

        if let (Some(file), Some(line)) = (record.file(), record.line()) {
            write!(f, ",\"caller\":")?;
            write_json_str(f, &format!("{}:{}", file, line))?;
        }

        struct Visitor<'a, W: Write> {
            writer: &'a mut W,
        }

        impl<'kvs, 'a, W: Write> kv::VisitSource<'kvs> for Visitor<'a, W> {
            fn visit_pair(
                &mut self,
                key: kv::Key<'kvs>,
                val: kv::Value<'kvs>,
            ) -> Result<(), kv::Error> {
                write!(self.writer, ",")?;
                write_json_str(self.writer, key.as_str())?;
                write!(self.writer, ":")?;
                serde_json::to_writer(&mut *self.writer, &val).map_err(kv::Error::boxed)?;
                Ok(())
            }
        }

        let mut visitor = Visitor { writer: f };
        record
            .key_values()
            .visit(&mut visitor)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;
        writeln!(f, "}}")
    });

    builder
}

fn level_name(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "error",
        log::Level::Warn => "warn",
        log::Level::Info => "info",
        log::Level::Debug => "debug",
        log::Level::Trace => "trace",
    }
}

fn write_json_str<W: io::Write>(
    writer: &mut W,
    raw: &str,
) -> std::io::Result<()> {
    serde_json::to_writer(writer, raw)?;
    Ok(())
}
