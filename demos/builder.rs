//! an example demonstrating some common features for kv_env_logger
//! To enable low level logging levels set an env variable RUST_LOG. i.e. RUST_LOG=debug

use kv_env_logger::{kvs, Adapter, LogBackend, Logger};

fn main() -> Result<(), kv_env_logger::Error> {
    kv_env_logger::builder()
        .target(kv_env_logger::env_logger::Target::Stdout)
        .init();
    kv_env_logger::panic_hook();

    let logger = Adapter::new(LogBackend::new().target("demo")).with(&kvs!["service", "builder"]);
    logger.log(&kvs!["level", "debug", "msg", "I am a debug", "foo", 2.3])?;
    logger.log(&kvs!["msg", "I am an info", "tags", serde_json::json!(["a", "b"])])?;

    // a bound level wins over any level passed to log
    let pinned = logger.with(&kvs!["level", "warn"]);
    pinned.log(&kvs!["level", "error", "msg", "I am still a warning"])?;

    panic!("I am a panic");
}
