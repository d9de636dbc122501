//! A [`Backend`] emitting records through the `log` facade.

use crate::{adapter::Backend, Level, Value};
use log::{kv, Log, Metadata, Record};
use std::{borrow::Cow, fmt, panic::Location, sync::Arc};

/// Key under which a trailing key without a value is reported
const IGNORED_KEY: &str = "ignored";

/// Emits entries as `log` records carrying key/values.
///
/// Fields bound through [`Backend::with`] are emitted ahead of per-call fields.
/// Binding a `level` key whose value is a known level name pins every record
/// of the derived backend to that level.
#[derive(Clone)]
pub struct LogBackend {
    sink: Arc<dyn Log>,
    target: Cow<'static, str>,
    fields: Vec<(String, Value)>,
    level: Option<Level>,
}

impl Default for LogBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LogBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogBackend")
            .field("target", &self.target)
            .field("fields", &self.fields)
            .field("level", &self.level)
            .finish()
    }
}

impl LogBackend {
    /// Emits through whichever logger is installed with `log::set_logger`
    pub fn new() -> Self {
        Self::with_sink(Arc::new(GlobalLogger))
    }

    /// Emits into `sink` directly, bypassing the global logger
    pub fn with_sink(sink: Arc<dyn Log>) -> Self {
        Self {
            sink,
            target: Cow::Borrowed(env!("CARGO_PKG_NAME")),
            fields: Vec::new(),
            level: None,
        }
    }

    /// Overrides the target recorded on every emitted record.
    ///
    /// Records default to the `kv_env_logger` target rather than the calling
    /// module, so `RUST_LOG` directives naming your crate (`myapp=debug`) only
    /// match once the target is set to that name.
    pub fn target(mut self, target: impl Into<Cow<'static, str>>) -> Self {
        self.target = target.into();
        self
    }

    /// Fields bound so far, in binding order
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Level fixed by a bound `level` key, if any
    pub fn pinned_level(&self) -> Option<Level> {
        self.level
    }

    fn emit(
        &self,
        level: Level,
        message: &str,
        fields: &[&Value],
        caller: &'static Location<'static>,
    ) {
        let level = log::Level::from(self.level.unwrap_or(level));
        let metadata = Metadata::builder()
            .level(level)
            .target(&self.target)
            .build();
        if !self.sink.enabled(&metadata) {
            return;
        }

        let residual = pairs(fields.iter().copied());
        let kvs: Vec<(&str, kv::Value)> = self
            .fields
            .iter()
            .map(|(key, value)| (key.as_str(), value))
            .chain(residual.iter().map(|(key, value)| (&**key, *value)))
            .map(|(key, value)| (key, kv::Value::from_serde(value)))
            .collect();
        let kvs = kvs.as_slice();

        self.sink.log(
            &Record::builder()
                .args(format_args!("{}", message))
                .level(level)
                .target(&self.target)
                .file_static(Some(caller.file()))
                .line(Some(caller.line()))
                .key_values(&kvs)
                .build(),
        );
    }
}

impl Backend for LogBackend {
    fn debug(&self, message: &str, fields: &[&Value], caller: &'static Location<'static>) {
        self.emit(Level::Debug, message, fields, caller)
    }

    fn info(&self, message: &str, fields: &[&Value], caller: &'static Location<'static>) {
        self.emit(Level::Info, message, fields, caller)
    }

    fn warn(&self, message: &str, fields: &[&Value], caller: &'static Location<'static>) {
        self.emit(Level::Warn, message, fields, caller)
    }

    fn error(&self, message: &str, fields: &[&Value], caller: &'static Location<'static>) {
        self.emit(Level::Error, message, fields, caller)
    }

    fn with(&self, fields: &[Value]) -> Self {
        let mut derived = self.clone();
        for (key, value) in pairs(fields.iter()) {
            if key == "level" {
                let level = value.as_str().and_then(|name| name.parse::<Level>().ok());
                if let Some(level) = level {
                    derived.level = Some(level);
                    continue;
                }
            }
            derived.fields.push((key.into_owned(), value.clone()));
        }
        derived
    }
}

/// Pairs up a flat sequence into key/values.
///
/// Non-string keys are rendered as JSON text. A trailing key without a value is
/// kept under [`IGNORED_KEY`].
fn pairs<'a, I>(flat: I) -> Vec<(Cow<'a, str>, &'a Value)>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut flat = flat.into_iter();
    let mut pairs = Vec::new();
    while let Some(key) = flat.next() {
        match flat.next() {
            Some(value) => pairs.push((key_name(key), value)),
            None => pairs.push((Cow::Borrowed(IGNORED_KEY), key)),
        }
    }
    pairs
}

fn key_name(key: &Value) -> Cow<'_, str> {
    match key {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

/// Forwards to the logger installed with `log::set_logger`
struct GlobalLogger;

impl Log for GlobalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level() && log::logger().enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if record.level() <= log::max_level() {
            log::logger().log(record)
        }
    }

    fn flush(&self) {
        log::logger().flush()
    }
}
