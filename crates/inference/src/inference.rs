use {
    crate::{
        config::RunConfig,
        error::{InferError, Result},
        pipeline::run_pipeline,
        provider::Provider,
        report::OutputReport,
    },
    onnx::Onnx,
    std::{io::Write, sync::Arc},
};

/// A runtime environment bound to one execution provider.
#[derive(Debug)]
pub struct Inference {
    onnx: Arc<Onnx>,
    provider: Provider,
}

impl Inference {
    /// Load the runtime and create its environment with the configured
    /// logging level and id.
    pub fn new(provider: Provider, config: &RunConfig) -> Result<Self> {
        let onnx =
            Onnx::new(config.ort_log_level, &config.log_id).map_err(InferError::Environment)?;
        base::log_info!("Inference device: {}", provider);
        if matches!(provider, Provider::Cuda { .. }) && !onnx.has_cuda() {
            base::log_warn!("runtime library has no CUDA provider symbol; append will fail");
        }
        Ok(Self { onnx, provider })
    }

    pub fn run(&self, config: &RunConfig, out: &mut impl Write) -> Result<OutputReport> {
        run_pipeline(&self.onnx, &self.provider, config, out)
    }
}

/// One complete request against the real runtime.
pub fn run_with_onnx(
    provider: Provider,
    config: &RunConfig,
    out: &mut impl Write,
) -> Result<OutputReport> {
    Inference::new(provider, config)?.run(config, out)
}
