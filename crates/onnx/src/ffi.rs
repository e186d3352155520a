use std::ffi::{c_char, c_int, c_void};

macro_rules! opaque_handles {
    ($($name:ident),* $(,)?) => {
        $(
            #[repr(C)]
            pub struct $name {
                _private: [u8; 0],
            }
        )*
    };
}

opaque_handles! {
    OrtEnv,
    OrtSession,
    OrtSessionOptions,
    OrtValue,
    OrtStatus,
    OrtMemoryInfo,
    OrtAllocator,
    OrtRunOptions,
    OrtTensorTypeAndShapeInfo,
}

/// Path character type expected by `CreateSession`: UTF-16 on Windows, bytes elsewhere.
#[cfg(windows)]
pub type OrtChar = u16;
#[cfg(not(windows))]
pub type OrtChar = c_char;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrtLoggingLevel {
    Verbose = 0,
    Info = 1,
    Warning = 2,
    Error = 3,
    Fatal = 4,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ONNXTensorElementDataType {
    Undefined = 0,
    Float = 1,
    Uint8 = 2,
    Int8 = 3,
    Uint16 = 4,
    Int16 = 5,
    Int32 = 6,
    Int64 = 7,
    String = 8,
    Bool = 9,
    Float16 = 10,
    Double = 11,
    Uint32 = 12,
    Uint64 = 13,
    Complex64 = 14,
    Complex128 = 15,
    BFloat16 = 16,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrtErrorCode {
    Ok = 0,
    Fail = 1,
    InvalidArgument = 2,
    NoSuchFile = 3,
    NoModel = 4,
    EngineError = 5,
    RuntimeException = 6,
    InvalidProtobuf = 7,
    ModelLoaded = 8,
    NotImplemented = 9,
    InvalidGraph = 10,
    EpFail = 11,
}

// Values written by the runtime arrive as plain integers; newer releases add
// codes and element types this table does not know.
macro_rules! from_raw {
    ($name:ident { $($variant:ident),* $(,)? }) => {
        impl TryFrom<c_int> for $name {
            type Error = c_int;

            fn try_from(raw: c_int) -> Result<Self, c_int> {
                $(
                    if raw == $name::$variant as c_int {
                        return Ok($name::$variant);
                    }
                )*
                Err(raw)
            }
        }
    };
}

from_raw!(ONNXTensorElementDataType {
    Undefined, Float, Uint8, Int8, Uint16, Int16, Int32, Int64, String, Bool, Float16, Double,
    Uint32, Uint64, Complex64, Complex128, BFloat16,
});

from_raw!(OrtErrorCode {
    Ok, Fail, InvalidArgument, NoSuchFile, NoModel, EngineError, RuntimeException,
    InvalidProtobuf, ModelLoaded, NotImplemented, InvalidGraph, EpFail,
});

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Sequential = 0,
    Parallel = 1,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrtMemType {
    CpuInput = -2,
    CpuOutput = -1,
    Default = 0,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrtAllocatorType {
    Invalid = -1,
    Device = 0,
    Arena = 1,
}

#[repr(C)]
#[allow(non_snake_case)]
pub struct OrtApiBase {
    pub GetApi: unsafe extern "C" fn(version: u32) -> *const OrtApi,
    pub GetVersionString: unsafe extern "C" fn() -> *const c_char,
}

#[repr(C)]
pub struct OrtApi {
    _private: [u8; 0],
}

unsafe impl Send for OrtApi {}
unsafe impl Sync for OrtApi {}

/// Leading entry of the DirectML provider table returned by
/// `GetExecutionProviderApi("DML", ..)`. Later entries are never read.
#[repr(C)]
#[allow(non_snake_case)]
pub struct OrtDmlApi {
    pub SessionOptionsAppendExecutionProvider_DML:
        unsafe extern "C" fn(options: *mut OrtSessionOptions, device_id: i32) -> *mut OrtStatus,
}

/// Exported entry point, resolved from the shared library at load time.
pub type OrtGetApiBaseFn = unsafe extern "C" fn() -> *const OrtApiBase;

/// Exported by GPU builds of the runtime only.
pub type AppendExecutionProviderCudaFn =
    unsafe extern "C" fn(options: *mut OrtSessionOptions, device_id: i32) -> *mut OrtStatus;

pub type GetErrorCodeFn = unsafe extern "C" fn(status: *const OrtStatus) -> c_int;
pub type GetErrorMessageFn = unsafe extern "C" fn(status: *const OrtStatus) -> *const c_char;
pub type ReleaseStatusFn = unsafe extern "C" fn(status: *mut OrtStatus);
pub type CreateEnvFn = unsafe extern "C" fn(
    log_level: OrtLoggingLevel,
    log_id: *const c_char,
    out: *mut *mut OrtEnv,
) -> *mut OrtStatus;
pub type ReleaseEnvFn = unsafe extern "C" fn(env: *mut OrtEnv);
pub type GetAllocatorWithDefaultOptionsFn =
    unsafe extern "C" fn(out: *mut *mut OrtAllocator) -> *mut OrtStatus;
pub type AllocatorFreeFn =
    unsafe extern "C" fn(allocator: *mut OrtAllocator, ptr: *mut c_void) -> *mut OrtStatus;
pub type GetExecutionProviderApiFn = unsafe extern "C" fn(
    provider_name: *const c_char,
    version: u32,
    provider_api: *mut *const c_void,
) -> *mut OrtStatus;

pub type CreateSessionOptionsFn =
    unsafe extern "C" fn(out: *mut *mut OrtSessionOptions) -> *mut OrtStatus;
pub type ReleaseSessionOptionsFn = unsafe extern "C" fn(options: *mut OrtSessionOptions);
pub type SetSessionExecutionModeFn =
    unsafe extern "C" fn(options: *mut OrtSessionOptions, mode: ExecutionMode) -> *mut OrtStatus;
pub type DisableMemPatternFn =
    unsafe extern "C" fn(options: *mut OrtSessionOptions) -> *mut OrtStatus;

pub type CreateSessionFn = unsafe extern "C" fn(
    env: *const OrtEnv,
    model_path: *const OrtChar,
    options: *const OrtSessionOptions,
    out: *mut *mut OrtSession,
) -> *mut OrtStatus;
pub type ReleaseSessionFn = unsafe extern "C" fn(session: *mut OrtSession);
pub type SessionGetCountFn =
    unsafe extern "C" fn(session: *const OrtSession, out: *mut usize) -> *mut OrtStatus;
pub type SessionGetNameFn = unsafe extern "C" fn(
    session: *const OrtSession,
    index: usize,
    allocator: *mut OrtAllocator,
    value: *mut *mut c_char,
) -> *mut OrtStatus;
pub type RunFn = unsafe extern "C" fn(
    session: *mut OrtSession,
    run_options: *const OrtRunOptions,
    input_names: *const *const c_char,
    inputs: *const *const OrtValue,
    input_len: usize,
    output_names: *const *const c_char,
    output_names_len: usize,
    outputs: *mut *mut OrtValue,
) -> *mut OrtStatus;

pub type CreateCpuMemoryInfoFn = unsafe extern "C" fn(
    allocator_type: OrtAllocatorType,
    mem_type: OrtMemType,
    out: *mut *mut OrtMemoryInfo,
) -> *mut OrtStatus;
pub type ReleaseMemoryInfoFn = unsafe extern "C" fn(info: *mut OrtMemoryInfo);
pub type CreateTensorWithDataAsOrtValueFn = unsafe extern "C" fn(
    memory_info: *const OrtMemoryInfo,
    data: *mut c_void,
    data_len: usize,
    shape: *const i64,
    shape_len: usize,
    element_type: ONNXTensorElementDataType,
    out: *mut *mut OrtValue,
) -> *mut OrtStatus;
pub type ReleaseValueFn = unsafe extern "C" fn(value: *mut OrtValue);
pub type IsTensorFn = unsafe extern "C" fn(value: *const OrtValue, out: *mut i32) -> *mut OrtStatus;
pub type GetTensorMutableDataFn =
    unsafe extern "C" fn(value: *mut OrtValue, out: *mut *mut c_void) -> *mut OrtStatus;
pub type GetTensorTypeAndShapeFn = unsafe extern "C" fn(
    value: *const OrtValue,
    out: *mut *mut OrtTensorTypeAndShapeInfo,
) -> *mut OrtStatus;
pub type ReleaseTensorTypeAndShapeInfoFn =
    unsafe extern "C" fn(info: *mut OrtTensorTypeAndShapeInfo);
pub type GetTensorElementTypeFn = unsafe extern "C" fn(
    info: *const OrtTensorTypeAndShapeInfo,
    out: *mut c_int,
) -> *mut OrtStatus;
pub type GetDimensionsCountFn =
    unsafe extern "C" fn(info: *const OrtTensorTypeAndShapeInfo, out: *mut usize) -> *mut OrtStatus;
pub type GetDimensionsFn = unsafe extern "C" fn(
    info: *const OrtTensorTypeAndShapeInfo,
    dim_values: *mut i64,
    dim_count: usize,
) -> *mut OrtStatus;
pub type GetTensorShapeElementCountFn =
    unsafe extern "C" fn(info: *const OrtTensorTypeAndShapeInfo, out: *mut usize) -> *mut OrtStatus;

pub const ORT_API_VERSION: u32 = 17;

// OrtApi vtable indices, from the declaration order in onnxruntime_c_api.h.
// The table only grows between releases, existing entries never move.
//
// Indices 0-2: raw function pointers (CreateStatus, GetErrorCode, GetErrorMessage)
// Indices 3+: ORT_API2_STATUS and ORT_CLASS_RELEASE entries
pub const IDX_GET_ERROR_CODE: usize = 1;
pub const IDX_GET_ERROR_MESSAGE: usize = 2;
pub const IDX_CREATE_ENV: usize = 3;
pub const IDX_CREATE_SESSION: usize = 7;
pub const IDX_RUN: usize = 9;
pub const IDX_CREATE_SESSION_OPTIONS: usize = 10;
pub const IDX_SET_SESSION_EXECUTION_MODE: usize = 13;
pub const IDX_DISABLE_MEM_PATTERN: usize = 17;
pub const IDX_SESSION_GET_INPUT_COUNT: usize = 30;
pub const IDX_SESSION_GET_OUTPUT_COUNT: usize = 31;
pub const IDX_SESSION_GET_INPUT_NAME: usize = 36;
pub const IDX_SESSION_GET_OUTPUT_NAME: usize = 37;
// Tensor creation and data access
pub const IDX_CREATE_TENSOR_WITH_DATA_AS_ORT_VALUE: usize = 49;
pub const IDX_IS_TENSOR: usize = 50;
pub const IDX_GET_TENSOR_MUTABLE_DATA: usize = 51;
// Tensor type/shape info
pub const IDX_GET_TENSOR_ELEMENT_TYPE: usize = 60;
pub const IDX_GET_DIMENSIONS_COUNT: usize = 61;
pub const IDX_GET_DIMENSIONS: usize = 62;
pub const IDX_GET_TENSOR_SHAPE_ELEMENT_COUNT: usize = 64;
pub const IDX_GET_TENSOR_TYPE_AND_SHAPE: usize = 65;
// Memory info and allocators
pub const IDX_CREATE_CPU_MEMORY_INFO: usize = 69;
pub const IDX_ALLOCATOR_FREE: usize = 76;
pub const IDX_GET_ALLOCATOR_WITH_DEFAULT_OPTIONS: usize = 78;
// Release functions
pub const IDX_RELEASE_ENV: usize = 92;
pub const IDX_RELEASE_STATUS: usize = 93;
pub const IDX_RELEASE_MEMORY_INFO: usize = 94;
pub const IDX_RELEASE_SESSION: usize = 95;
pub const IDX_RELEASE_VALUE: usize = 96;
pub const IDX_RELEASE_TENSOR_TYPE_AND_SHAPE_INFO: usize = 99;
pub const IDX_RELEASE_SESSION_OPTIONS: usize = 100;
// Provider-specific extension tables (DirectML)
pub const IDX_GET_EXECUTION_PROVIDER_API: usize = 195;

impl OrtApi {
    /// Read the function pointer stored at `index` in the API table.
    ///
    /// # Safety
    /// `index` must be a valid entry for the API version in use and `F` must be
    /// the exact function pointer type stored there.
    pub unsafe fn get_fn<F>(&self, index: usize) -> F {
        unsafe {
            let vtable = self as *const _ as *const *const ();
            let fn_ptr = *vtable.add(index);
            std::mem::transmute_copy(&fn_ptr)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_types_are_zero_sized() {
        assert_eq!(std::mem::size_of::<OrtEnv>(), 0);
        assert_eq!(std::mem::size_of::<OrtSession>(), 0);
        assert_eq!(std::mem::size_of::<OrtSessionOptions>(), 0);
        assert_eq!(std::mem::size_of::<OrtValue>(), 0);
        assert_eq!(std::mem::size_of::<OrtStatus>(), 0);
    }

    #[test]
    fn test_enum_discriminants() {
        assert_eq!(OrtLoggingLevel::Verbose as i32, 0);
        assert_eq!(OrtLoggingLevel::Warning as i32, 2);
        assert_eq!(OrtErrorCode::Fail as i32, 1);
        assert_eq!(OrtErrorCode::EpFail as i32, 11);
        assert_eq!(ONNXTensorElementDataType::Int64 as i32, 7);
        assert_eq!(ONNXTensorElementDataType::Float16 as i32, 10);
        assert_eq!(ExecutionMode::Sequential as i32, 0);
        assert_eq!(OrtMemType::CpuOutput as i32, -1);
    }

    #[test]
    fn test_raw_element_types() {
        assert_eq!(
            ONNXTensorElementDataType::try_from(10),
            Ok(ONNXTensorElementDataType::Float16)
        );
        assert_eq!(
            ONNXTensorElementDataType::try_from(16),
            Ok(ONNXTensorElementDataType::BFloat16)
        );
        // float8 and int4 types from newer runtimes
        assert_eq!(ONNXTensorElementDataType::try_from(17), Err(17));
        assert_eq!(ONNXTensorElementDataType::try_from(22), Err(22));
        assert_eq!(ONNXTensorElementDataType::try_from(-1), Err(-1));
    }

    #[test]
    fn test_raw_error_codes() {
        assert_eq!(OrtErrorCode::try_from(0), Ok(OrtErrorCode::Ok));
        assert_eq!(OrtErrorCode::try_from(11), Ok(OrtErrorCode::EpFail));
        assert_eq!(OrtErrorCode::try_from(12), Err(12));
        assert_eq!(OrtErrorCode::try_from(100), Err(100));
    }

    #[test]
    fn test_dml_table_is_one_pointer() {
        assert_eq!(
            std::mem::size_of::<OrtDmlApi>(),
            std::mem::size_of::<*const ()>()
        );
    }
}
