mod common;

use {
    common::{Call, MockRuntime},
    inference::{InferError, Provider, Runtime},
};

#[test]
fn test_directml_configure_sets_both_flags() {
    let runtime = MockRuntime::default();
    let mut config = runtime.session_config().unwrap();
    Provider::directml(0).configure(&mut config).unwrap();
    assert_eq!(
        runtime.calls(),
        vec![Call::SessionConfig, Call::Sequential, Call::DisableMemPattern]
    );
}

#[test]
fn test_cuda_configure_is_a_no_op() {
    let runtime = MockRuntime::default();
    let mut config = runtime.session_config().unwrap();
    Provider::cuda(0).configure(&mut config).unwrap();
    assert_eq!(runtime.calls(), vec![Call::SessionConfig]);
}

#[test]
fn test_append_passes_device_id() {
    let runtime = MockRuntime::default();
    let mut config = runtime.session_config().unwrap();
    Provider::cuda(3).append(&mut config).unwrap();
    Provider::directml(1).append(&mut config).unwrap();
    assert!(runtime.called(&Call::AppendCuda(3)));
    assert!(runtime.called(&Call::AppendDirectMl(1)));
}

#[test]
fn test_append_failure_names_provider() {
    let runtime = MockRuntime {
        fail_append: true,
        ..MockRuntime::default()
    };
    let mut config = runtime.session_config().unwrap();
    let err = Provider::directml(0).append(&mut config).unwrap_err();
    assert!(matches!(
        err,
        InferError::Provider {
            provider: "DirectML",
            ..
        }
    ));
    assert!(err.to_string().contains("no DirectML device"));
}
