use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{exit, Command};

use clap::{Parser, Subcommand, ValueEnum};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const LAMBDA_PACKAGE: &str = "orders_api_lambda";
const LAMBDA_BINARIES: [&str; 3] = ["users_lambda", "orders_lambda", "api_runtime"];

#[derive(Parser)]
#[command(name = "xtask", about = "Task runner for the orders API workspace")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CI checks
    Ci {
        #[arg(value_enum, default_value_t = CiJob::All)]
        job: CiJob,
    },
    /// Build the Lambda binaries and zip each one as `bootstrap`
    ServerlessPackage {
        /// Compilation target triple for Lambda binaries
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        /// Package debug builds instead of release builds
        #[arg(long)]
        debug: bool,
        /// Directory the zip archives are written to
        #[arg(long, default_value = "dist")]
        out_dir: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting and clippy
    Lint,
    /// Unit and integration tests
    Test,
    All,
}

fn run_cargo(args: &[&str]) {
    eprintln!("+ cargo {}", args.join(" "));
    let status = Command::new("cargo")
        .args(args)
        .status()
        .unwrap_or_else(|error| panic!("failed to execute cargo: {error}"));
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn ci_lint() {
    run_cargo(&["fmt", "--all", "--", "--check"]);
    run_cargo(&["clippy", "--all-targets", "--", "-D", "warnings"]);
}

fn ci_test() {
    run_cargo(&["test", "-p", "orders_api_core"]);
    run_cargo(&["test", "-p", LAMBDA_PACKAGE]);
}

fn package_lambdas(target: &str, debug: bool, out_dir: &Path) -> Result<(), Box<dyn Error>> {
    let mut args = vec!["build", "-p", LAMBDA_PACKAGE, "--target", target];
    for binary in LAMBDA_BINARIES {
        args.extend(["--bin", binary]);
    }
    if !debug {
        args.push("--release");
    }
    run_cargo(&args);

    let build_dir = Path::new("target")
        .join(target)
        .join(if debug { "debug" } else { "release" });
    fs::create_dir_all(out_dir)?;

    for binary in LAMBDA_BINARIES {
        let archive = out_dir.join(format!("{binary}.zip"));
        write_bootstrap_zip(&build_dir.join(binary), &archive)
            .map_err(|error| format!("packaging {binary}: {error}"))?;
        eprintln!("packaged {}", archive.display());
    }
    Ok(())
}

/// The provided Lambda runtimes execute the archive entry named `bootstrap`.
fn write_bootstrap_zip(binary: &Path, archive: &Path) -> Result<(), Box<dyn Error>> {
    let executable = fs::read(binary)
        .map_err(|error| format!("reading {}: {error}", binary.display()))?;
    let mut zip = ZipWriter::new(fs::File::create(archive)?);
    zip.start_file(
        "bootstrap",
        FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o755),
    )?;
    zip.write_all(&executable)?;
    zip.finish()?;
    Ok(())
}

fn main() {
    match Cli::parse().command {
        Commands::Ci { job } => {
            if matches!(job, CiJob::Lint | CiJob::All) {
                ci_lint();
            }
            if matches!(job, CiJob::Test | CiJob::All) {
                ci_test();
            }
        }
        Commands::ServerlessPackage {
            target,
            debug,
            out_dir,
        } => {
            if let Err(error) = package_lambdas(&target, debug, &out_dir) {
                eprintln!("serverless-package failed: {error}");
                exit(1);
            }
        }
    }
}
