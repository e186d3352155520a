use {onnx::OnnxError, std::path::PathBuf, thiserror::Error};

/// Every failure of a single inference request, tagged by the stage it came from.
///
/// The runtime reports provider problems through status objects and
/// session/run problems as errors; both arrive here as [`OnnxError`] and get
/// wrapped with their stage so callers handle exactly one type.
#[derive(Error, Debug)]
pub enum InferError {
    #[error("Failed to create ONNX Runtime environment: {0}")]
    Environment(#[source] OnnxError),

    #[error("Failed to append {provider} execution provider: {source}")]
    Provider {
        provider: &'static str,
        #[source]
        source: OnnxError,
    },

    #[error("Failed to load model {}: {source}", path.display())]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: OnnxError,
    },

    #[error("Failed to query session: {0}")]
    Session(#[source] OnnxError),

    #[error("Model declares {found} inputs, expected at least {expected}")]
    Signature { expected: usize, found: usize },

    #[error("Tensor shape {shape:?} needs {expected} elements, got {found}")]
    Shape {
        shape: Vec<usize>,
        expected: usize,
        found: usize,
    },

    #[error("Inference failed: {0}")]
    Run(#[source] OnnxError),

    #[error("Failed to read output: {0}")]
    Output(#[source] OnnxError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InferError>;
