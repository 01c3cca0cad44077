mod demo;

use std::path::Path;
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the school transit map workspace",
    long_about = "A unified CLI for rendering maps, running benchmarks,\n\
                  and CI checks in the school transit map workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a map with the CLI; arguments after `--` are passed through
    Render {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Render the bundled demo town offline (no geocoding)
    Demo {
        /// Directory for demo inputs and the rendered map
        #[arg(long, default_value = "target/demo")]
        dir: String,
    },
    /// Run Criterion benchmarks
    Bench,
    /// Compare benchmarks: stash changes, create baseline, restore, compare
    BenchCompare,
    /// Run CI checks (fmt, clippy, tests, demo, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Render the demo map
    Demo,
    /// Run benchmarks
    Bench,
    /// Run check + demo + bench
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn git(args: &[&str]) -> ExitStatus {
    eprintln!("+ git {}", args.join(" "));
    Command::new("git")
        .args(args)
        .status()
        .expect("failed to execute git")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_git(args: &[&str]) {
    let status = git(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_cli(extra: &[&str]) {
    let mut args = vec!["run", "-p", "map_cli", "--release", "--"];
    args.extend_from_slice(extra);
    run_cargo(&args);
}

fn render_demo(dir: &str) {
    let root = Path::new(dir);
    step("Write demo inputs");
    if let Err(error) = demo::write_demo_inputs(root) {
        eprintln!("failed to write demo inputs under '{}': {error}", root.display());
        exit(1);
    }

    step("Render demo map");
    let schools = root.join("schools.csv");
    let zones = root.join("zones.geojson");
    let gtfs = root.join("gtfs");
    let out = root.join("out");
    run_cli(&[
        "Demo Town",
        "--bbox",
        demo::DEMO_BBOX,
        "--schools",
        &schools.to_string_lossy(),
        "--zones",
        &zones.to_string_lossy(),
        "--transit",
        &gtfs.to_string_lossy(),
        "--out-dir",
        &out.to_string_lossy(),
    ]);
}

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);
    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);
    step("Test map_core");
    run_cargo(&["test", "-p", "map_core"]);
    step("Test map_cli");
    run_cargo(&["test", "-p", "map_cli"]);
}

fn ci_bench() {
    step("Run benchmarks");
    run_cargo(&["bench", "--package", "map_core", "--bench", "render"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render { args } => {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            run_cli(&args);
        }
        Commands::Demo { dir } => render_demo(&dir),
        Commands::Bench => ci_bench(),
        Commands::BenchCompare => {
            let baseline_dir = Path::new("target/criterion");
            if baseline_dir.exists() {
                step("Removing existing benchmark data");
                std::fs::remove_dir_all(baseline_dir).expect("failed to remove target/criterion");
            }

            step("Stashing current changes");
            run_git(&["stash", "push", "-m", "Temporary stash for benchmark comparison"]);

            step("Running benchmark to create baseline");
            run_cargo(&[
                "bench", "--package", "map_core", "--bench", "render", "--", "--save-baseline",
                "main",
            ]);

            step("Reapplying changes");
            run_git(&["stash", "pop"]);

            step("Running benchmark comparing against baseline");
            run_cargo(&[
                "bench", "--package", "map_core", "--bench", "render", "--", "--baseline", "main",
            ]);

            eprintln!("\nDone! Check the output above to see performance comparison.");
        }
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Demo => render_demo("target/demo"),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    render_demo("target/demo");
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
    }
}
