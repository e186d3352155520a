use {
    crate::{
        error::{InferError, Result},
        runtime::SessionConfig,
    },
    base::log_debug,
    std::fmt,
};

/// Hardware execution provider a session is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Cuda { device_id: i32 },
    DirectMl { device_id: i32 },
}

impl Provider {
    pub fn cuda(device_id: i32) -> Self {
        Provider::Cuda { device_id }
    }

    pub fn directml(device_id: i32) -> Self {
        Provider::DirectMl { device_id }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Cuda { .. } => "CUDA",
            Provider::DirectMl { .. } => "DirectML",
        }
    }

    /// Identifier handed to the runtime's logger.
    pub fn log_id(&self) -> &'static str {
        match self {
            Provider::Cuda { .. } => "CUDA_Debug",
            Provider::DirectMl { .. } => "DML_Debug",
        }
    }

    /// Line printed once the provider is registered.
    pub fn banner(&self) -> &'static str {
        match self {
            Provider::Cuda { .. } => "CUDA execution provider appended successfully.",
            Provider::DirectMl { .. } => "DML API pointer successfully retrieved.",
        }
    }

    pub fn device_id(&self) -> i32 {
        match self {
            Provider::Cuda { device_id } | Provider::DirectMl { device_id } => *device_id,
        }
    }

    /// Apply the session flags the provider needs before it is appended.
    ///
    /// DirectML cannot run with parallel execution or memory pattern
    /// planning, so both are switched off. CUDA needs nothing.
    pub fn configure<C: SessionConfig>(&self, config: &mut C) -> Result<()> {
        match self {
            Provider::Cuda { .. } => Ok(()),
            Provider::DirectMl { .. } => {
                config
                    .set_sequential_execution()
                    .map_err(|source| self.error(source))?;
                config
                    .disable_mem_pattern()
                    .map_err(|source| self.error(source))?;
                log_debug!("{}: sequential execution, memory pattern disabled", self.name());
                Ok(())
            }
        }
    }

    /// Register the provider on `config`.
    pub fn append<C: SessionConfig>(&self, config: &mut C) -> Result<()> {
        let result = match self {
            Provider::Cuda { device_id } => config.append_cuda(*device_id),
            Provider::DirectMl { device_id } => config.append_directml(*device_id),
        };
        result.map_err(|source| self.error(source))
    }

    fn error(&self, source: onnx::OnnxError) -> InferError {
        InferError::Provider {
            provider: self.name(),
            source,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (device {})", self.name(), self.device_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(Provider::cuda(0).name(), "CUDA");
        assert_eq!(Provider::directml(0).name(), "DirectML");
        assert_eq!(Provider::cuda(0).log_id(), "CUDA_Debug");
        assert_eq!(Provider::directml(0).log_id(), "DML_Debug");
    }

    #[test]
    fn test_banners() {
        assert_eq!(
            Provider::cuda(0).banner(),
            "CUDA execution provider appended successfully."
        );
        assert_eq!(
            Provider::directml(0).banner(),
            "DML API pointer successfully retrieved."
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Provider::directml(1).to_string(), "DirectML (device 1)");
    }
}
