use {base::*, inference::*};

const DEFAULT_MODEL: &str = "<YOUR MODEL>";
const DEVICE_ID: i32 = 0;

fn main() {
    base::init_stderr_logger(Level::Info);
    let model_path = model_path_from_args(std::env::args(), DEFAULT_MODEL);
    let provider = Provider::cuda(DEVICE_ID);
    let config = RunConfig::new(model_path, &provider);

    let result = run_with_onnx(provider, &config, &mut std::io::stdout());
    if let Err(error) = &result {
        log_error!("{}", error);
    }
    std::process::exit(exit_code(&result));
}
