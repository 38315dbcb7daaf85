//! Logging setup
//!
//! The subscriber is installed before the configuration is read, so warnings
//! from config lookup reach the log. The configured level is applied
//! afterwards through a reload handle; `RUST_LOG`, when set, always wins.

use tracing::Subscriber;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{reload, EnvFilter, Registry};

/// Level used until the configuration has been loaded
pub const STARTUP_LEVEL: &str = "info";

/// Handle for switching to the configured level once it is known
pub struct LogLevelHandle {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogLevelHandle {
    /// Apply `logging.level` from the config; no-op when `RUST_LOG` is set
    pub fn apply_config_level(&self, level: &str) -> anyhow::Result<()> {
        if self.from_env {
            return Ok(());
        }
        self.handle.reload(EnvFilter::try_new(level)?)?;
        Ok(())
    }
}

/// Build the subscriber writing to `make_writer`, with its level handle
pub fn subscriber<W>(make_writer: W) -> (impl Subscriber + Send + Sync + 'static, LogLevelHandle)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(STARTUP_LEVEL), false),
    };
    let (filter, handle) = reload::Layer::new(filter);

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(make_writer));

    (subscriber, LogLevelHandle { handle, from_env })
}

/// Install the global stdout subscriber
pub fn init() -> LogLevelHandle {
    let (subscriber, handle) = subscriber(std::io::stdout);
    subscriber.init();
    handle
}
