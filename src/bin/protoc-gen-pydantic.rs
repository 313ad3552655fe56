//! protoc-gen-pydantic
//!
//! protoc plugin entry point. protoc writes a `CodeGeneratorRequest` to
//! stdin and reads the `CodeGeneratorResponse` from stdout, so logs go to
//! stderr.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use protoc_gen_pydantic::run_plugin;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Options are passed by protoc as the request parameter
/// (`--pydantic_opt=filename=models,package_suffix=_pb`), not as flags.
#[derive(Parser)]
#[command(name = "protoc-gen-pydantic")]
#[command(about = "protoc plugin generating pydantic models from protobuf schemas")]
#[command(version)]
struct Cli {}

fn main() -> ExitCode {
    Cli::parse();

    // stdout carries the response
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run_plugin(io::stdin().lock(), io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
