//! Runtime loading of the onnxruntime shared library.
//!
//! The runtime is opened with `dlopen`/`LoadLibraryA` instead of being linked,
//! so programs built against this crate start (and report a clean error) on
//! machines without onnxruntime installed.

use std::{
    env,
    ffi::{CStr, CString, c_char, c_void},
    path::{Path, PathBuf},
};

#[cfg(target_os = "windows")]
pub const LIBRARY_NAME: &str = "onnxruntime.dll";
#[cfg(target_os = "macos")]
pub const LIBRARY_NAME: &str = "libonnxruntime.dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const LIBRARY_NAME: &str = "libonnxruntime.so";

const SYSTEM_PATHS: [&str; 4] = [
    "/usr/local/lib",
    "/usr/lib",
    "/usr/lib/x86_64-linux-gnu",
    "/usr/lib/aarch64-linux-gnu",
];

/// Handle to a dynamically loaded shared library.
pub struct DynLib {
    handle: *mut c_void,
}

// The handle is process-global; symbols resolved from it carry their own
// thread-safety rules.
unsafe impl Send for DynLib {}
unsafe impl Sync for DynLib {}

impl DynLib {
    pub fn open(path: &Path) -> Result<Self, String> {
        let name = path
            .to_str()
            .ok_or_else(|| format!("library path is not UTF-8: {}", path.display()))?;
        let name = CString::new(name).map_err(|_| "null byte in library path".to_string())?;
        Self::open_cstr(&name)
    }

    fn open_cstr(name: &CStr) -> Result<Self, String> {
        #[cfg(unix)]
        {
            let handle = unsafe { dlopen(name.as_ptr(), RTLD_NOW | RTLD_LOCAL) };
            if handle.is_null() {
                return Err(last_dl_error().unwrap_or_else(|| "unknown dlopen error".to_string()));
            }
            Ok(Self { handle })
        }

        #[cfg(windows)]
        {
            let handle = unsafe { LoadLibraryA(name.as_ptr()) };
            if handle.is_null() {
                return Err(format!("LoadLibraryA failed for {:?}", name));
            }
            Ok(Self { handle })
        }

        #[cfg(not(any(unix, windows)))]
        {
            let _ = name;
            Err("dynamic library loading not supported on this platform".to_string())
        }
    }

    /// Look up `name`, returning `None` when the library does not export it.
    ///
    /// # Safety
    /// The caller must cast the pointer to the symbol's real signature.
    pub unsafe fn sym(&self, name: &CStr) -> Option<*mut c_void> {
        #[cfg(unix)]
        let ptr = unsafe { dlsym(self.handle, name.as_ptr()) };

        #[cfg(windows)]
        let ptr = unsafe { GetProcAddress(self.handle, name.as_ptr()) };

        #[cfg(not(any(unix, windows)))]
        let ptr: *mut c_void = {
            let _ = name;
            std::ptr::null_mut()
        };

        if ptr.is_null() { None } else { Some(ptr) }
    }
}

impl Drop for DynLib {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            #[cfg(unix)]
            unsafe {
                dlclose(self.handle);
            }

            #[cfg(windows)]
            unsafe {
                FreeLibrary(self.handle);
            }
        }
    }
}

/// Candidate locations for the runtime library, in search order:
/// `ONNXRUNTIME_DIR/lib`, `ONNXRUNTIME_LIB_DIR`, common system directories,
/// and finally the bare name for the platform loader's own search path.
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(dir) = env::var("ONNXRUNTIME_DIR") {
        candidates.push(PathBuf::from(dir).join("lib").join(LIBRARY_NAME));
    }
    if let Ok(dir) = env::var("ONNXRUNTIME_LIB_DIR") {
        candidates.push(PathBuf::from(dir).join(LIBRARY_NAME));
    }
    if cfg!(unix) {
        candidates.extend(
            SYSTEM_PATHS
                .iter()
                .map(|dir| Path::new(dir).join(LIBRARY_NAME))
                .filter(|path| path.exists()),
        );
    }
    candidates.push(PathBuf::from(LIBRARY_NAME));
    candidates
}

/// Open the first candidate that loads.
pub fn open_runtime() -> Result<DynLib, String> {
    let mut failures = Vec::new();
    for path in candidate_paths() {
        match DynLib::open(&path) {
            Ok(library) => return Ok(library),
            Err(error) => failures.push(format!("{}: {}", path.display(), error)),
        }
    }
    Err(format!(
        "could not load {} (set ONNXRUNTIME_DIR or ONNXRUNTIME_LIB_DIR): {}",
        LIBRARY_NAME,
        failures.join("; ")
    ))
}

#[cfg(unix)]
fn last_dl_error() -> Option<String> {
    let err = unsafe { dlerror() };
    if err.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(err) }.to_string_lossy().into_owned())
    }
}

#[cfg(unix)]
const RTLD_NOW: i32 = 2;
#[cfg(unix)]
const RTLD_LOCAL: i32 = 0;

#[cfg(unix)]
unsafe extern "C" {
    fn dlopen(filename: *const c_char, flags: i32) -> *mut c_void;
    fn dlsym(handle: *mut c_void, symbol: *const c_char) -> *mut c_void;
    fn dlclose(handle: *mut c_void) -> i32;
    fn dlerror() -> *const c_char;
}

#[cfg(windows)]
unsafe extern "system" {
    fn LoadLibraryA(name: *const c_char) -> *mut c_void;
    fn GetProcAddress(module: *mut c_void, name: *const c_char) -> *mut c_void;
    fn FreeLibrary(module: *mut c_void) -> i32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_end_with_bare_name() {
        let candidates = candidate_paths();
        assert_eq!(candidates.last(), Some(&PathBuf::from(LIBRARY_NAME)));
    }

    #[test]
    fn test_open_missing_library_fails() {
        let result = DynLib::open(Path::new("/nonexistent/libdoes-not-exist.so"));
        assert!(result.is_err());
    }
}
