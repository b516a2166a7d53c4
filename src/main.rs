use chemverse::cli::cli_main::run;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}
