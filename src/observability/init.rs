//! Tracing subscriber setup.

use super::file_writer::RotationPolicy;
use super::tracer::{self, ExportTarget};
use crate::infrastructure::paths::get_data_dir;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SERVICE_NAME: &str = "moviematch";

/// File name of the trace export inside the data directory.
pub const TRACE_FILE: &str = "moviematch-otlp.json";

/// Installs the global subscriber: an [`EnvFilter`] plus an OpenTelemetry
/// layer exporting to `<data_dir>/moviematch-otlp.json`.
///
/// The filter comes from `RUST_LOG` when set, otherwise from
/// `config.trace_level`, otherwise `"info"`.
///
/// Tracing is best effort. If the data directory cannot be created the
/// function returns without installing anything, and calling it a second time
/// leaves the first subscriber in place.
///
/// # Example
///
/// ```rust,no_run
/// use moviematch::observability::init_tracing;
/// use moviematch::Config;
///
/// let config = Config {
///     trace_level: Some("moviematch=debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
///
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let data_dir = get_data_dir(config.data_dir.as_deref());
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.trace_level.as_deref().unwrap_or("info"))
    });

    let resource = Resource::new(vec![opentelemetry::KeyValue::new("service.name", SERVICE_NAME)]);
    let target = ExportTarget {
        file_path: data_dir.join(TRACE_FILE),
        rotation: RotationPolicy {
            max_bytes: config.trace_max_bytes,
            backups: config.trace_backups,
        },
        scope: SERVICE_NAME,
    };
    let provider = tracer::create_tracer_provider(target, resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let _ = tracing_subscriber::registry().with(filter).with(otel_layer).try_init();
}
