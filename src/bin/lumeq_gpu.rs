use std::path::Path;
use std::time::Instant;
use std::{env, fs, process};

use flexi_logger::{Logger, LoggerHandle};
use lumeq::{
    program_path_for_exe, Error, GpuHistEqPipeline, HistEq, Image, OclContext, OutputFormat,
    Result,
};

fn main() {
    let _logger = setup_logging();

    let args: Vec<String> = env::args().collect();
    let Some(input_path) = args.get(1) else {
        eprintln!("Error: not enough arguments");
        eprintln!("Usage: {} <IMAGE_PATH>", args[0]);
        process::exit(1);
    };

    if let Err(e) = run(input_path) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(input_path: &str) -> Result<()> {
    let format = OutputFormat::from_path(input_path)?;
    let image = Image::read_file(input_path)?;
    log::info!("loaded {}: {}", input_path, image.desc());

    // The kernel source lives in a side file next to the executable.
    let program_path = program_path_for_exe()?;
    let source = fs::read_to_string(&program_path).map_err(|e| {
        Error::Gpu(format!(
            "reading kernel source {}: {}",
            program_path.display(),
            e
        ))
    })?;

    let ctx = OclContext::new()?;
    let pipeline = GpuHistEqPipeline::new(&ctx, &source)?;

    let started = Instant::now();
    let output = HistEq::new().apply_gpu(&ctx, &pipeline, &image)?;
    log::info!("equalized in {:.3} s", started.elapsed().as_secs_f64());

    let output_path = output_file_name(input_path)?;
    output.save_file(&output_path, format)?;
    log::info!("saved {}", output_path);

    Ok(())
}

/// Output lands in the current working directory under the input's base name.
fn output_file_name(input_path: &str) -> Result<String> {
    Path::new(input_path)
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid input path: {}", input_path),
            ))
        })
}

fn setup_logging() -> LoggerHandle {
    Logger::try_with_env_or_str("info")
        .unwrap_or_else(|e| panic!("Logger initialization failed with {}", e))
        .log_to_stderr()
        .start()
        .unwrap_or_else(|e| panic!("Logger initialization failed with {}", e))
}
