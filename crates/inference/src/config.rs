use {
    crate::{provider::Provider, report::REPORTED_VALUES},
    onnx::LoggingLevel,
    std::path::PathBuf,
};

/// Settings for one inference run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub model_path: PathBuf,
    pub ort_log_level: LoggingLevel,
    pub log_id: String,
    pub reported_values: usize,
}

impl RunConfig {
    /// Verbose runtime logging under the provider's log id.
    pub fn new(model_path: impl Into<PathBuf>, provider: &Provider) -> Self {
        Self {
            model_path: model_path.into(),
            ort_log_level: LoggingLevel::Verbose,
            log_id: provider.log_id().to_string(),
            reported_values: REPORTED_VALUES,
        }
    }
}

/// First positional argument, or `default` when none is given.
pub fn model_path_from_args<I>(args: I, default: &str) -> PathBuf
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
