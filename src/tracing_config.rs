use std::{env, error::Error};

use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt,
};

/// Environment variable selecting the log output format (`pretty` or `json`).
pub const LOG_FORMAT_VAR: &str = "CONFIGSTORE_LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset: this crate's events at info and
/// above, nothing from dependencies.
pub const DEFAULT_FILTER: &str = "configstore=info";

/// Installs a global subscriber for the store's `tracing` events.
///
/// `RUST_LOG` overrides [`DEFAULT_FILTER`]. Output is pretty-printed unless
/// [`LOG_FORMAT_VAR`] is set to `json`.
///
/// # Errors
/// Returns error if a global subscriber is already installed
pub fn init() -> Result<(), Box<dyn Error + Send + Sync>> {
    let format = env::var(LOG_FORMAT_VAR).unwrap_or_default();

    tracing_subscriber::registry()
        .with(env_filter())
        .with(output_layer(&format))
        .try_init()?;

    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn output_layer<S>(format: &str) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    match format {
        "json" => fmt::layer()
            .json()
            .with_target(true)
            .with_level(true)
            .boxed(),
        _ => fmt::layer()
            .pretty()
            .with_target(true)
            .with_level(true)
            .with_thread_names(true)
            .boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_scoped_to_this_crate() {
        let filter = EnvFilter::new(DEFAULT_FILTER);

        assert_eq!(filter.to_string(), "configstore=info");
    }
}
