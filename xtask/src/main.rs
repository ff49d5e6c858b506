use std::path::Path;
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the carpool matching workspace",
    long_about = "A unified CLI for running the match demo, benchmarks, load tests\n\
                  and CI checks in the carpool matching workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one match search over sample campus trips
    Demo {
        /// Engine config file (TOML); defaults apply when omitted
        #[arg(long, env = "CARPOOL_CONFIG")]
        config: Option<String>,
        /// Log filter passed through RUST_LOG
        #[arg(long, default_value = "carpool_core=debug")]
        log: String,
    },
    /// Run Criterion benchmarks
    Bench,
    /// Compare benchmarks: stash changes, create baseline, restore, compare
    BenchCompare,
    /// Run CI checks (fmt, clippy, tests, examples, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Run load tests (ignored tests in carpool_core)
    LoadTest,
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests (default and all features)
    Check,
    /// Build and run the demo example
    Examples,
    /// Run benchmarks
    Bench,
    /// Run check + examples + bench
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn command_status(program: &str, args: &[&str], env: &[(&str, &str)]) -> ExitStatus {
    eprintln!("+ {program} {}", args.join(" "));
    match Command::new(program)
        .args(args)
        .envs(env.iter().copied())
        .status()
    {
        Ok(status) => status,
        Err(error) => {
            eprintln!("failed to execute {program}: {error}");
            exit(1);
        }
    }
}

fn run_checked(program: &str, args: &[&str], env: &[(&str, &str)]) {
    let status = command_status(program, args, env);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_cargo(args: &[&str]) {
    run_checked("cargo", args, &[]);
}

fn run_git(args: &[&str]) {
    run_checked("git", args, &[]);
}

fn run_demo(config: Option<&str>, log: &str) {
    let mut args = vec!["run", "-p", "carpool_core", "--example", "match_demo"];
    if let Some(path) = config {
        args.push("--");
        args.push(path);
    }
    run_checked("cargo", &args, &[("RUST_LOG", log)]);
}

fn bench(extra: &[&str]) {
    let mut args = vec!["bench", "--package", "carpool_core", "--bench", "performance"];
    if !extra.is_empty() {
        args.push("--");
        args.extend_from_slice(extra);
    }
    run_cargo(&args);
}

// ── CI jobs ────────────────────────────────────────────────────────

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

    step("Test carpool_core");
    run_cargo(&["test", "-p", "carpool_core"]);

    step("Test carpool_core (osrm + precomputed providers)");
    run_cargo(&["test", "-p", "carpool_core", "--all-features"]);
}

fn ci_examples() {
    step("Run match_demo");
    run_demo(None, "carpool_core=info");
}

fn ci_bench() {
    step("Run benchmarks");
    bench(&[]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { config, log } => run_demo(config.as_deref(), &log),
        Commands::Bench => bench(&[]),
        Commands::BenchCompare => {
            let baseline_dir = Path::new("target/criterion");
            if baseline_dir.exists() {
                step("Removing existing benchmark data");
                if let Err(error) = std::fs::remove_dir_all(baseline_dir) {
                    eprintln!("failed to remove target/criterion: {error}");
                    exit(1);
                }
            }

            step("Stashing current changes");
            run_git(&[
                "stash",
                "push",
                "-m",
                "Temporary stash for benchmark comparison",
            ]);

            step("Running benchmark to create baseline");
            bench(&["--save-baseline", "main"]);

            step("Reapplying changes");
            run_git(&["stash", "pop"]);

            step("Running benchmark comparing against baseline");
            bench(&["--baseline", "main"]);

            eprintln!("\nDone! Check the output above to see performance comparison.");
        }
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Examples => ci_examples(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_examples();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::LoadTest => {
            run_cargo(&[
                "test",
                "-p",
                "carpool_core",
                "--test",
                "load_tests",
                "--",
                "--ignored",
            ]);
        }
    }
}
