//! Logging setup: a rolling application log via `log4rs`, configured
//! programmatically.

use log::LevelFilter;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::{
    CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::{Path, PathBuf};

const ROLL_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const ENCODER_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";

/// Initializes logging into `{dir}/foliodb.log` with rolled files kept
/// alongside. Already-initialized loggers are left in place, so tests can
/// call this repeatedly.
///
/// # Errors
/// Returns an error if the log directory cannot be created or the appender
/// cannot be built.
pub fn init(dir: Option<&Path>, level: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let base = dir
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    std::fs::create_dir_all(&base)?;
    let lvl = match level.unwrap_or("info").to_ascii_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };
    let roller = FixedWindowRoller::builder()
        .build(&format!("{}", base.join("foliodb.{}.log").display()), 7)?;
    let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(ROLL_SIZE_BYTES)), Box::new(roller));
    let appender = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(ENCODER_PATTERN)))
        .build(base.join("foliodb.log"), Box::new(policy))?;
    let config = Config::builder()
        .appender(Appender::builder().build("app", Box::new(appender)))
        .build(Root::builder().appender("app").build(lvl))?;
    let _ = log4rs::init_config(config);
    Ok(())
}

/// Reads `FOLIODB_LOG_DIR` and `FOLIODB_LOG_LEVEL` and initializes from
/// them, falling back to the working directory at `info`.
///
/// # Errors
/// Propagates [`init`] failures.
pub fn init_from_env() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::var("FOLIODB_LOG_DIR").ok().map(PathBuf::from);
    let level = std::env::var("FOLIODB_LOG_LEVEL").ok();
    init(dir.as_deref(), level.as_deref())
}
