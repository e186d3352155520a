use {
    crate::{dl::DynLib, error::check_status, *},
    std::{
        ffi::{CString, c_void},
        path::Path,
        ptr::null_mut,
        sync::Arc,
    },
};

/// Loaded runtime: the shared library, the versioned API table, one
/// environment, and the entry points this crate calls.
pub struct Onnx {
    pub(crate) api: *const ffi::OrtApi,
    pub(crate) environment: *mut ffi::OrtEnv,
    pub(crate) allocator: *mut ffi::OrtAllocator,
    pub(crate) allocator_free: ffi::AllocatorFreeFn,
    pub(crate) append_cuda: Option<ffi::AppendExecutionProviderCudaFn>,
    pub(crate) get_execution_provider_api: ffi::GetExecutionProviderApiFn,
    pub(crate) create_session: ffi::CreateSessionFn,
    pub(crate) create_session_options: ffi::CreateSessionOptionsFn,
    pub(crate) set_session_execution_mode: ffi::SetSessionExecutionModeFn,
    pub(crate) disable_mem_pattern: ffi::DisableMemPatternFn,
    pub(crate) release_session_options: ffi::ReleaseSessionOptionsFn,
    pub(crate) session_get_input_count: ffi::SessionGetCountFn,
    pub(crate) session_get_output_count: ffi::SessionGetCountFn,
    pub(crate) session_get_input_name: ffi::SessionGetNameFn,
    pub(crate) session_get_output_name: ffi::SessionGetNameFn,
    pub(crate) run: ffi::RunFn,
    pub(crate) release_session: ffi::ReleaseSessionFn,
    pub(crate) create_memory_info: ffi::CreateCpuMemoryInfoFn,
    pub(crate) release_memory_info: ffi::ReleaseMemoryInfoFn,
    pub(crate) create_tensor: ffi::CreateTensorWithDataAsOrtValueFn,
    pub(crate) release_value: ffi::ReleaseValueFn,
    pub(crate) is_tensor: ffi::IsTensorFn,
    pub(crate) get_tensor_mutable_data: ffi::GetTensorMutableDataFn,
    pub(crate) get_tensor_type_and_shape: ffi::GetTensorTypeAndShapeFn,
    pub(crate) get_tensor_element_type: ffi::GetTensorElementTypeFn,
    pub(crate) get_dimensions_count: ffi::GetDimensionsCountFn,
    pub(crate) get_dimensions: ffi::GetDimensionsFn,
    pub(crate) get_tensor_shape_element_count: ffi::GetTensorShapeElementCountFn,
    pub(crate) release_tensor_type_and_shape_info: ffi::ReleaseTensorTypeAndShapeInfoFn,
    // keeps every pointer above valid; dropped last
    _library: DynLib,
}

unsafe impl Send for Onnx {}
unsafe impl Sync for Onnx {}

impl std::fmt::Debug for Onnx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Onnx")
            .field("environment", &self.environment)
            .field("cuda_exported", &self.append_cuda.is_some())
            .finish()
    }
}

impl Onnx {
    /// Load the runtime library and create an environment logging at
    /// `log_level` under `log_id`.
    ///
    /// # Errors
    /// Returns an error if the library cannot be found, does not support
    /// [`ffi::ORT_API_VERSION`], or refuses to create the environment.
    pub fn new(log_level: ffi::OrtLoggingLevel, log_id: &str) -> Result<Arc<Self>> {
        let library = dl::open_runtime().map_err(OnnxError::runtime_error)?;
        Self::from_library(library, log_level, log_id)
    }

    /// Same as [`Onnx::new`] but with an explicit library path.
    pub fn from_path(
        library_path: impl AsRef<Path>,
        log_level: ffi::OrtLoggingLevel,
        log_id: &str,
    ) -> Result<Arc<Self>> {
        let library = DynLib::open(library_path.as_ref()).map_err(OnnxError::runtime_error)?;
        Self::from_library(library, log_level, log_id)
    }

    fn from_library(
        library: DynLib,
        log_level: ffi::OrtLoggingLevel,
        log_id: &str,
    ) -> Result<Arc<Self>> {
        // get API base
        let get_api_base = unsafe { library.sym(c"OrtGetApiBase") }
            .ok_or_else(|| OnnxError::runtime_error("OrtGetApiBase not exported by library"))?;
        let get_api_base: ffi::OrtGetApiBaseFn = unsafe { std::mem::transmute(get_api_base) };
        let api_base = unsafe { get_api_base() };
        if api_base.is_null() {
            return Err(OnnxError::runtime_error("Failed to get ONNX runtime API base"));
        }

        // get versioned API
        let api = unsafe { ((*api_base).GetApi)(ffi::ORT_API_VERSION) };
        if api.is_null() {
            return Err(OnnxError::runtime_error(format!(
                "ONNX runtime doesn't support API version {}. Your runtime may be too old.",
                ffi::ORT_API_VERSION
            )));
        }

        // only GPU builds export the CUDA entry point
        let append_cuda = unsafe { library.sym(c"OrtSessionOptionsAppendExecutionProvider_CUDA") }
            .map(|ptr| unsafe {
                std::mem::transmute::<*mut c_void, ffi::AppendExecutionProviderCudaFn>(ptr)
            });

        let table = unsafe { &*api };
        let create_env: ffi::CreateEnvFn = unsafe { table.get_fn(ffi::IDX_CREATE_ENV) };
        let release_env: ffi::ReleaseEnvFn = unsafe { table.get_fn(ffi::IDX_RELEASE_ENV) };

        // create environment
        let log_id = CString::new(log_id)
            .map_err(|_| OnnxError::runtime_error("Null byte in log id"))?;
        let mut environment: *mut ffi::OrtEnv = null_mut();
        let status = unsafe { create_env(log_level, log_id.as_ptr(), &mut environment as *mut _) };
        unsafe { check_status(api, status, ())? };

        // get allocator
        let mut allocator: *mut ffi::OrtAllocator = null_mut();
        let get_allocator: ffi::GetAllocatorWithDefaultOptionsFn =
            unsafe { table.get_fn(ffi::IDX_GET_ALLOCATOR_WITH_DEFAULT_OPTIONS) };
        let status = unsafe { get_allocator(&mut allocator as *mut _) };
        if let Err(error) = unsafe { check_status(api, status, ()) } {
            unsafe { release_env(environment) };
            return Err(error);
        }

        unsafe {
            Ok(Arc::new(Self {
                api,
                environment,
                allocator,
                allocator_free: table.get_fn(ffi::IDX_ALLOCATOR_FREE),
                append_cuda,
                get_execution_provider_api: table.get_fn(ffi::IDX_GET_EXECUTION_PROVIDER_API),
                create_session: table.get_fn(ffi::IDX_CREATE_SESSION),
                create_session_options: table.get_fn(ffi::IDX_CREATE_SESSION_OPTIONS),
                set_session_execution_mode: table.get_fn(ffi::IDX_SET_SESSION_EXECUTION_MODE),
                disable_mem_pattern: table.get_fn(ffi::IDX_DISABLE_MEM_PATTERN),
                release_session_options: table.get_fn(ffi::IDX_RELEASE_SESSION_OPTIONS),
                session_get_input_count: table.get_fn(ffi::IDX_SESSION_GET_INPUT_COUNT),
                session_get_output_count: table.get_fn(ffi::IDX_SESSION_GET_OUTPUT_COUNT),
                session_get_input_name: table.get_fn(ffi::IDX_SESSION_GET_INPUT_NAME),
                session_get_output_name: table.get_fn(ffi::IDX_SESSION_GET_OUTPUT_NAME),
                run: table.get_fn(ffi::IDX_RUN),
                release_session: table.get_fn(ffi::IDX_RELEASE_SESSION),
                create_memory_info: table.get_fn(ffi::IDX_CREATE_CPU_MEMORY_INFO),
                release_memory_info: table.get_fn(ffi::IDX_RELEASE_MEMORY_INFO),
                create_tensor: table.get_fn(ffi::IDX_CREATE_TENSOR_WITH_DATA_AS_ORT_VALUE),
                release_value: table.get_fn(ffi::IDX_RELEASE_VALUE),
                is_tensor: table.get_fn(ffi::IDX_IS_TENSOR),
                get_tensor_mutable_data: table.get_fn(ffi::IDX_GET_TENSOR_MUTABLE_DATA),
                get_tensor_type_and_shape: table.get_fn(ffi::IDX_GET_TENSOR_TYPE_AND_SHAPE),
                get_tensor_element_type: table.get_fn(ffi::IDX_GET_TENSOR_ELEMENT_TYPE),
                get_dimensions_count: table.get_fn(ffi::IDX_GET_DIMENSIONS_COUNT),
                get_dimensions: table.get_fn(ffi::IDX_GET_DIMENSIONS),
                get_tensor_shape_element_count: table
                    .get_fn(ffi::IDX_GET_TENSOR_SHAPE_ELEMENT_COUNT),
                release_tensor_type_and_shape_info: table
                    .get_fn(ffi::IDX_RELEASE_TENSOR_TYPE_AND_SHAPE_INFO),
                _library: library,
            }))
        }
    }

    /// Fresh session options with runtime defaults.
    pub fn session_options(self: &Arc<Self>) -> Result<SessionOptions> {
        let mut options: *mut ffi::OrtSessionOptions = null_mut();
        let status = unsafe { (self.create_session_options)(&mut options as *mut _) };
        unsafe { check_status(self.api, status, ())? };
        Ok(SessionOptions {
            onnx: Arc::clone(self),
            options,
        })
    }

    /// Load the model at `model_path` into a session configured by `options`.
    /// The options are consumed and released whether or not loading succeeds.
    pub fn create_session(
        self: &Arc<Self>,
        options: SessionOptions,
        model_path: impl AsRef<Path>,
    ) -> Result<Session> {
        let path = encode_path(model_path.as_ref())?;
        let mut session: *mut ffi::OrtSession = null_mut();
        let status = unsafe {
            (self.create_session)(
                self.environment,
                path.as_ptr(),
                options.as_ptr(),
                &mut session as *mut _,
            )
        };
        drop(options);
        unsafe { check_status(self.api, status, ())? };

        Ok(Session {
            onnx: Arc::clone(self),
            session,
        })
    }

    /// Whether the loaded library exports the CUDA provider entry point.
    pub fn has_cuda(&self) -> bool {
        self.append_cuda.is_some()
    }
}

impl Drop for Onnx {
    fn drop(&mut self) {
        let release_env: ffi::ReleaseEnvFn = unsafe { (*self.api).get_fn(ffi::IDX_RELEASE_ENV) };
        unsafe { release_env(self.environment) };
    }
}

#[cfg(windows)]
fn encode_path(path: &Path) -> Result<Vec<ffi::OrtChar>> {
    use std::os::windows::ffi::OsStrExt;
    let wide: Vec<u16> = path.as_os_str().encode_wide().collect();
    if wide.contains(&0) {
        return Err(OnnxError::runtime_error("Null byte in model path"));
    }
    Ok(wide.into_iter().chain(std::iter::once(0)).collect())
}

#[cfg(not(windows))]
fn encode_path(path: &Path) -> Result<Vec<ffi::OrtChar>> {
    let path_str = path
        .to_str()
        .ok_or_else(|| OnnxError::runtime_error("Invalid UTF-8 in model path"))?;
    let c_path =
        CString::new(path_str).map_err(|_| OnnxError::runtime_error("Null byte in model path"))?;
    Ok(c_path
        .as_bytes_with_nul()
        .iter()
        .map(|&b| b as ffi::OrtChar)
        .collect())
}
