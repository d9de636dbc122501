//! an example demonstrating the default JSON logger
//! To enable low level logging levels set an env variable RUST_LOG. i.e. RUST_LOG=debug

use kv_env_logger::{kvs, Adapter, LogBackend, Logger};

fn main() -> Result<(), kv_env_logger::Error> {
    kv_env_logger::init();
    let logger = Adapter::new(LogBackend::new());
    logger.log(&kvs!["level", "debug", "msg", "I am a debug", "foo", 1])?;
    logger.log(&kvs!["msg", "I am an info"])?;
    logger.log(&kvs!["lvl", "warn", "message", "I am a warning"])?;
    logger.log(&kvs!["level", "error", "msg", "I am an error"])?;
    logger.log(&kvs!["task_id", 567, "thread_id", "12"])?;
    Ok(())
}
