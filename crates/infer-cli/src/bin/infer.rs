use std::process::ExitCode;

fn main() -> ExitCode {
    // A missing .env file is not an error.
    dotenv::dotenv().ok();
    infer_cli::logging::init_logger().init();

    match infer_cli::cli::cli_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
