//! Seams between the pipeline and the runtime.
//!
//! The pipeline only talks to these traits. [`onnx`] types implement them for
//! real runs; tests supply in-memory doubles.

use {
    crate::assembly::{TensorData, TensorView},
    onnx::{ExecutionMode, OnnxError, Value},
    std::{path::Path, sync::Arc},
};

/// Mutable session configuration, before the session exists.
pub trait SessionConfig {
    fn set_sequential_execution(&mut self) -> onnx::Result<()>;
    fn disable_mem_pattern(&mut self) -> onnx::Result<()>;
    fn append_cuda(&mut self, device_id: i32) -> onnx::Result<()>;
    fn append_directml(&mut self, device_id: i32) -> onnx::Result<()>;
}

/// An initialized runtime able to create configurations and load models.
pub trait Runtime {
    type Config: SessionConfig;
    type Session: ModelSession;

    fn session_config(&self) -> onnx::Result<Self::Config>;
    fn load_session(&self, config: Self::Config, model_path: &Path)
    -> onnx::Result<Self::Session>;
}

/// A loaded model.
pub trait ModelSession {
    type Output: OutputTensor;

    fn input_names(&self) -> onnx::Result<Vec<String>>;
    fn output_names(&self) -> onnx::Result<Vec<String>>;
    fn run(
        &mut self,
        inputs: &[(&str, TensorView<'_>)],
        output_names: &[&str],
    ) -> onnx::Result<Vec<Self::Output>>;
}

/// One value returned by a run.
pub trait OutputTensor {
    fn is_tensor(&self) -> onnx::Result<bool>;
    fn element_count(&self) -> onnx::Result<usize>;
    /// At most `limit` leading elements, as `f32`.
    fn leading_f32(&self, limit: usize) -> onnx::Result<Vec<f32>>;
}

impl SessionConfig for onnx::SessionOptions {
    fn set_sequential_execution(&mut self) -> onnx::Result<()> {
        self.set_execution_mode(ExecutionMode::Sequential)
    }

    fn disable_mem_pattern(&mut self) -> onnx::Result<()> {
        onnx::SessionOptions::disable_mem_pattern(self)
    }

    fn append_cuda(&mut self, device_id: i32) -> onnx::Result<()> {
        onnx::SessionOptions::append_cuda(self, device_id)
    }

    fn append_directml(&mut self, device_id: i32) -> onnx::Result<()> {
        onnx::SessionOptions::append_directml(self, device_id)
    }
}

impl Runtime for Arc<onnx::Onnx> {
    type Config = onnx::SessionOptions;
    type Session = onnx::Session;

    fn session_config(&self) -> onnx::Result<Self::Config> {
        self.session_options()
    }

    fn load_session(
        &self,
        config: Self::Config,
        model_path: &Path,
    ) -> onnx::Result<Self::Session> {
        self.create_session(config, model_path)
    }
}

impl ModelSession for onnx::Session {
    type Output = Value;

    fn input_names(&self) -> onnx::Result<Vec<String>> {
        onnx::Session::input_names(self)
    }

    fn output_names(&self) -> onnx::Result<Vec<String>> {
        onnx::Session::output_names(self)
    }

    fn run(
        &mut self,
        inputs: &[(&str, TensorView<'_>)],
        output_names: &[&str],
    ) -> onnx::Result<Vec<Value>> {
        let values = inputs
            .iter()
            .map(|(_, view)| to_value(&self.onnx, view))
            .collect::<onnx::Result<Vec<_>>>()?;
        let bindings: Vec<(&str, &Value)> = inputs
            .iter()
            .zip(&values)
            .map(|((name, _), value)| (*name, value))
            .collect();
        onnx::Session::run(self, &bindings, output_names)
    }
}

fn to_value(onnx: &Arc<onnx::Onnx>, view: &TensorView<'_>) -> Result<Value, OnnxError> {
    match view.data() {
        TensorData::Int64(data) => Value::from_slice(onnx, view.shape(), data),
        TensorData::Float16(data) => Value::from_slice(onnx, view.shape(), data),
    }
}

impl OutputTensor for Value {
    fn is_tensor(&self) -> onnx::Result<bool> {
        Value::is_tensor(self)
    }

    fn element_count(&self) -> onnx::Result<usize> {
        Value::element_count(self)
    }

    fn leading_f32(&self, limit: usize) -> onnx::Result<Vec<f32>> {
        self.extract_as_f32(limit)
    }
}
