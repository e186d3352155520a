//! In-memory runtime doubles for pipeline tests.

#![allow(dead_code)]

use {
    inference::{ModelSession, OutputTensor, Runtime, SessionConfig, TensorView},
    onnx::{ElementType, ErrorCode, OnnxError},
    std::{
        cell::{Cell, RefCell},
        path::{Path, PathBuf},
        rc::Rc,
    },
};

/// Everything the pipeline asked of the runtime, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SessionConfig,
    Sequential,
    DisableMemPattern,
    AppendCuda(i32),
    AppendDirectMl(i32),
    Load(PathBuf),
    InputNames,
    OutputNames,
    Run,
}

/// One input as seen by `run`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundInput {
    pub name: String,
    pub shape: Vec<usize>,
    pub element_type: ElementType,
    pub element_count: usize,
    pub ptr: usize,
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

#[derive(Debug, Clone)]
pub struct MockOutput {
    pub tensor: bool,
    pub data: Vec<f32>,
    pub reads: Rc<Cell<usize>>,
}

impl MockOutput {
    pub fn tensor(data: Vec<f32>) -> Self {
        Self {
            tensor: true,
            data,
            reads: Rc::new(Cell::new(0)),
        }
    }

    pub fn non_tensor() -> Self {
        Self {
            tensor: false,
            data: vec![1.0; 16],
            reads: Rc::new(Cell::new(0)),
        }
    }
}

impl OutputTensor for MockOutput {
    fn is_tensor(&self) -> onnx::Result<bool> {
        Ok(self.tensor)
    }

    fn element_count(&self) -> onnx::Result<usize> {
        Ok(self.data.len())
    }

    fn leading_f32(&self, limit: usize) -> onnx::Result<Vec<f32>> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.data.iter().copied().take(limit).collect())
    }
}

pub struct MockConfig {
    log: CallLog,
    fail_append: bool,
}

impl SessionConfig for MockConfig {
    fn set_sequential_execution(&mut self) -> onnx::Result<()> {
        self.log.borrow_mut().push(Call::Sequential);
        Ok(())
    }

    fn disable_mem_pattern(&mut self) -> onnx::Result<()> {
        self.log.borrow_mut().push(Call::DisableMemPattern);
        Ok(())
    }

    fn append_cuda(&mut self, device_id: i32) -> onnx::Result<()> {
        self.log.borrow_mut().push(Call::AppendCuda(device_id));
        if self.fail_append {
            return Err(OnnxError::new(ErrorCode::EpFail, "no CUDA device"));
        }
        Ok(())
    }

    fn append_directml(&mut self, device_id: i32) -> onnx::Result<()> {
        self.log.borrow_mut().push(Call::AppendDirectMl(device_id));
        if self.fail_append {
            return Err(OnnxError::new(ErrorCode::EpFail, "no DirectML device"));
        }
        Ok(())
    }
}

pub struct MockSession {
    log: CallLog,
    inputs: Vec<String>,
    outputs: Vec<MockOutput>,
    fail_run: bool,
    bound: Rc<RefCell<Vec<BoundInput>>>,
}

impl ModelSession for MockSession {
    type Output = MockOutput;

    fn input_names(&self) -> onnx::Result<Vec<String>> {
        self.log.borrow_mut().push(Call::InputNames);
        Ok(self.inputs.clone())
    }

    fn output_names(&self) -> onnx::Result<Vec<String>> {
        self.log.borrow_mut().push(Call::OutputNames);
        Ok((0..self.outputs.len()).map(|i| format!("output_{}", i)).collect())
    }

    fn run(
        &mut self,
        inputs: &[(&str, TensorView<'_>)],
        _output_names: &[&str],
    ) -> onnx::Result<Vec<MockOutput>> {
        self.log.borrow_mut().push(Call::Run);
        *self.bound.borrow_mut() = inputs
            .iter()
            .map(|(name, view)| BoundInput {
                name: name.to_string(),
                shape: view.shape().to_vec(),
                element_type: view.element_type(),
                element_count: view.element_count(),
                ptr: view.data().as_ptr() as usize,
            })
            .collect();
        if self.fail_run {
            return Err(OnnxError::new(ErrorCode::RuntimeException, "kernel failed"));
        }
        Ok(self.outputs.clone())
    }
}

/// Scriptable runtime. Defaults to a three-input model with one 16-value output.
pub struct MockRuntime {
    pub log: CallLog,
    pub bound: Rc<RefCell<Vec<BoundInput>>>,
    pub inputs: Vec<String>,
    pub outputs: Vec<MockOutput>,
    pub fail_config: bool,
    pub fail_append: bool,
    pub fail_load: bool,
    pub fail_run: bool,
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self {
            log: CallLog::default(),
            bound: Rc::default(),
            inputs: decoder_inputs(0),
            outputs: vec![MockOutput::tensor((0..16).map(|i| i as f32 * 0.5).collect())],
            fail_config: false,
            fail_append: false,
            fail_load: false,
            fail_run: false,
        }
    }
}

impl MockRuntime {
    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    pub fn bound(&self) -> Vec<BoundInput> {
        self.bound.borrow().clone()
    }

    pub fn called(&self, call: &Call) -> bool {
        self.log.borrow().contains(call)
    }

    pub fn position(&self, call: &Call) -> Option<usize> {
        self.log.borrow().iter().position(|c| c == call)
    }
}

impl Runtime for MockRuntime {
    type Config = MockConfig;
    type Session = MockSession;

    fn session_config(&self) -> onnx::Result<MockConfig> {
        self.log.borrow_mut().push(Call::SessionConfig);
        if self.fail_config {
            return Err(OnnxError::new(ErrorCode::Fail, "out of memory"));
        }
        Ok(MockConfig {
            log: self.log.clone(),
            fail_append: self.fail_append,
        })
    }

    fn load_session(&self, _config: MockConfig, model_path: &Path) -> onnx::Result<MockSession> {
        self.log.borrow_mut().push(Call::Load(model_path.to_path_buf()));
        if self.fail_load {
            return Err(OnnxError::new(ErrorCode::NoSuchFile, "file not found"));
        }
        Ok(MockSession {
            log: self.log.clone(),
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
            fail_run: self.fail_run,
            bound: self.bound.clone(),
        })
    }
}

/// Token inputs followed by `cache_slots` past key/value names.
pub fn decoder_inputs(cache_slots: usize) -> Vec<String> {
    let mut names = vec![
        "input_ids".to_string(),
        "position_ids".to_string(),
        "attention_mask".to_string(),
    ];
    for layer in 0..cache_slots {
        names.push(format!("past_key_values.{}", layer));
    }
    names
}
