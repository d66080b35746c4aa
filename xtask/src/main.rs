use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{exit, Command};

use clap::{Parser, Subcommand};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const CORE_PACKAGE: &str = "mail_pipeline_core";
const LAMBDA_PACKAGE: &str = "mail_pipeline_lambda";
const LAMBDA_BIN: &str = "inbound_mail_lambda";

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the inbound mail pipeline workspace"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy and the test suites
    Ci,
    /// Build the Lambda binary and zip it as `bootstrap`
    LambdaPackage {
        /// Target triple the Lambda runs on
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        /// Package an unoptimized build
        #[arg(long)]
        debug: bool,
        /// Where the zip is written
        #[arg(long, default_value = "dist", env = "LAMBDA_DIST_DIR")]
        dist_dir: PathBuf,
    },
}

/// Runs `cargo` with `args`, exiting with cargo's status when it fails.
fn cargo(label: &str, args: &[&str]) {
    eprintln!("\n=== {label} ===\n+ cargo {}", args.join(" "));
    let status = match Command::new("cargo").args(args).status() {
        Ok(status) => status,
        Err(error) => fail(format!("could not start cargo: {error}")),
    };
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn fail(message: String) -> ! {
    eprintln!("error: {message}");
    exit(1);
}

fn lambda_package(target: &str, debug: bool, dist_dir: &Path) -> io::Result<PathBuf> {
    require_target(target);

    let mut args = vec!["build", "-p", LAMBDA_PACKAGE, "--bin", LAMBDA_BIN, "--target", target];
    if !debug {
        args.push("--release");
    }
    cargo("Build inbound mail lambda", &args);

    let profile_dir = if debug { "debug" } else { "release" };
    let binary = Path::new("target").join(target).join(profile_dir).join(LAMBDA_BIN);
    fs::create_dir_all(dist_dir)?;
    let archive = dist_dir.join(format!("{LAMBDA_BIN}.zip"));
    write_bootstrap_zip(&binary, &archive)?;
    Ok(archive)
}

/// Fails early when rustup reports that `target` is missing. Without rustup
/// the build is attempted anyway.
fn require_target(target: &str) {
    let Ok(output) = Command::new("rustup")
        .args(["target", "list", "--installed"])
        .output()
    else {
        eprintln!("warning: rustup unavailable, skipping the check for `{target}`");
        return;
    };
    let installed = String::from_utf8_lossy(&output.stdout);
    if output.status.success() && !installed.lines().any(|line| line.trim() == target) {
        fail(format!("rust target `{target}` is missing; run `rustup target add {target}`"));
    }
}

/// The provided.al2 runtime executes an entry named `bootstrap`.
fn write_bootstrap_zip(binary: &Path, archive: &Path) -> io::Result<()> {
    let bytes = fs::read(binary).map_err(|error| {
        io::Error::new(error.kind(), format!("reading {}: {error}", binary.display()))
    })?;
    let mut zip = ZipWriter::new(File::create(archive)?);
    zip.start_file(
        "bootstrap",
        FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o755),
    )?;
    zip.write_all(&bytes)?;
    zip.finish()?;
    Ok(())
}

fn ci() {
    cargo("Check formatting", &["fmt", "--all", "--", "--check"]);
    cargo(
        "Clippy",
        &["clippy", "--all-targets", "--all-features", "--", "-D", "warnings"],
    );
    for package in [CORE_PACKAGE, LAMBDA_PACKAGE] {
        cargo(&format!("Test {package}"), &["test", "-p", package]);
    }
}

fn main() {
    match Cli::parse().command {
        Commands::Ci => {
            ci();
            eprintln!("\nCI passed.");
        }
        Commands::LambdaPackage {
            target,
            debug,
            dist_dir,
        } => match lambda_package(&target, debug, &dist_dir) {
            Ok(archive) => eprintln!("\nPackaged {}", archive.display()),
            Err(error) => fail(format!("packaging failed: {error}")),
        },
    }
}
