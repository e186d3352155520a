use std::process::{Command, Output};

const BIN: &str = env!("CARGO_BIN_EXE_cuda-inference");

fn run(args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .output()
        .expect("failed to launch binary")
}

fn assert_failed(output: &Output) {
    assert!(!output.status.success());
    #[cfg(unix)]
    assert_eq!(output.status.code(), Some(255));
    #[cfg(windows)]
    assert_eq!(output.status.code(), Some(-1));
}

#[test]
fn test_missing_model_exits_with_failure() {
    let output = run(&["/nonexistent/cuda-inference/model.onnx"]);
    assert_failed(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Logits output"));
    assert!(!stdout.contains("No logits output tensor found."));
}

#[test]
fn test_failure_is_logged_once() {
    let output = run(&["/nonexistent/cuda-inference/model.onnx"]);
    assert_failed(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches(":ERROR:").count(), 1, "stderr:\n{}", stderr);
}

#[test]
fn test_placeholder_model_path_fails() {
    let output = run(&[]);
    assert_failed(&output);
}
