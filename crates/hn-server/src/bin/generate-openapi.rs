//! `generate-openapi`: writes `openapi-auth.json`, `openapi.json` and `API.md`.
//!
//! Runs without arguments; `--config` and `--out-dir` override the defaults.
//! Exits non-zero when any step fails.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use hn_core::IntoErrorCode;
use hn_server::{ServerConfig, docs_service, init_tracing, run_export};

#[derive(Parser, Debug)]
#[command(
    name = "generate-openapi",
    about = "Generate the merged OpenAPI schema and markdown documentation"
)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(short = 'c', long = "config", env = "HN_CONFIG")]
    config: Option<PathBuf>,

    /// Output directory (overrides the config file).
    #[arg(short = 'o', long = "out-dir")]
    out_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing("warn");
    let cli = Cli::parse();

    let config = match ServerConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => return fail(&err),
    };
    let docs = match docs_service(&config) {
        Ok(docs) => docs,
        Err(err) => return fail(&err),
    };
    let out_dir = cli.out_dir.unwrap_or_else(|| config.docs.output_dir.clone());

    let mut stdout = std::io::stdout();
    match run_export(&docs, &out_dir, &mut stdout).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => fail(&err),
    }
}

fn fail<E: IntoErrorCode>(err: &E) -> ExitCode {
    eprintln!("Error generating OpenAPI documentation: {}", err.message());
    let code = err.error_code().exit_code();
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
