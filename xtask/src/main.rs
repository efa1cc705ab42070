use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::process::{Command, Stdio};
use std::time::Instant;

/// Library modules that can be tested on their own
const TEST_MODULES: [&str; 7] = [
    "format",
    "pixel",
    "dimension",
    "native",
    "png_loader",
    "factory",
    "config",
];

#[derive(Parser)]
#[command(name = "x")]
#[command(about = "Development automation for native-texture")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all CI checks (fmt, clippy, build, test)
    Ci {
        #[arg(long)]
        verbose: bool,
    },
    /// Quick checks before commit (fmt, clippy)
    Check {
        #[arg(long)]
        verbose: bool,
    },
    /// Format code
    Fmt {
        #[arg(long)]
        check: bool,
    },
    /// Run clippy
    Clippy {
        #[arg(long)]
        fix: bool,
    },
    /// Build the project
    Build {
        #[arg(long)]
        release: bool,
    },
    /// Run tests
    Test {
        #[arg(long)]
        doc: bool,
        /// Run only integration tests under tests/
        #[arg(long)]
        integration: bool,
        /// Run only the unit tests of these modules (format, pixel, dimension,
        /// native, png_loader, factory, config)
        #[arg(long = "module", value_name = "MODULE")]
        modules: Vec<String>,
    },
    /// Run benchmarks
    Bench,
    /// Load a PNG with the CLI and print its texture layout
    Inspect {
        /// Path to PNG file
        image_path: String,
        /// Texture format (5650, 5551, 4444, 8888)
        #[arg(short, long)]
        format: Option<String>,
        /// Build in release mode
        #[arg(long)]
        release: bool,
    },
    /// Pre-commit hook (fmt, clippy, test)
    PreCommit,
    /// Install git hooks
    InstallHooks,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { verbose } => run_ci(verbose),
        Commands::Check { verbose } => run_check(verbose),
        Commands::Fmt { check } => run_fmt(check),
        Commands::Clippy { fix } => run_clippy(fix),
        Commands::Build { release } => run_build(release),
        Commands::Test {
            doc,
            integration,
            modules,
        } => run_test(doc, integration, &modules),
        Commands::Bench => run_bench(),
        Commands::Inspect {
            image_path,
            format,
            release,
        } => run_inspect(&image_path, format.as_deref(), release),
        Commands::PreCommit => run_pre_commit(),
        Commands::InstallHooks => install_hooks(),
    }
}

fn run_ci(verbose: bool) -> Result<()> {
    println!("{}", "=== Running CI Pipeline ===".bold().blue());

    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), verbose)?;
    run_task("Clippy", || run_clippy(false), verbose)?;
    run_task("Build", || run_build(false), verbose)?;
    run_task("Test", || run_test(false, false, &[]), verbose)?;
    run_task("Doc Test", || run_test(true, false, &[]), verbose)?;

    let elapsed = start.elapsed();
    println!(
        "\n{} {}",
        "✓ CI passed in".green().bold(),
        format!("{:.2}s", elapsed.as_secs_f64()).bold()
    );

    Ok(())
}

fn run_check(verbose: bool) -> Result<()> {
    println!("{}", "=== Running Quick Checks ===".bold().blue());

    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), verbose)?;
    run_task("Clippy", || run_clippy(false), verbose)?;

    let elapsed = start.elapsed();
    println!(
        "\n{} {}",
        "✓ Checks passed in".green().bold(),
        format!("{:.2}s", elapsed.as_secs_f64()).bold()
    );

    Ok(())
}

fn run_fmt(check: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("fmt").arg("--all");

    if check {
        cmd.arg("--").arg("--check");
    }

    execute_command(&mut cmd)
}

fn run_clippy(fix: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("clippy").arg("--all-targets");

    if fix {
        cmd.arg("--fix");
    } else {
        cmd.arg("--").arg("-D").arg("warnings");
    }

    execute_command(&mut cmd)
}

fn run_build(release: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("build");

    if release {
        cmd.arg("--release");
    }

    execute_command(&mut cmd)
}

fn run_test(doc: bool, integration: bool, modules: &[String]) -> Result<()> {
    if doc {
        let mut cmd = Command::new("cargo");
        cmd.arg("test").arg("--doc");
        return execute_command(&mut cmd);
    }

    if integration {
        let mut cmd = Command::new("cargo");
        cmd.arg("test").arg("--test").arg("*");
        return execute_command(&mut cmd);
    }

    if modules.is_empty() {
        let mut cmd = Command::new("cargo");
        cmd.arg("test");
        return execute_command(&mut cmd);
    }

    if let Some(unknown) = modules
        .iter()
        .find(|m| !TEST_MODULES.contains(&m.as_str()))
    {
        anyhow::bail!(
            "Unknown module '{}' (expected one of: {})",
            unknown,
            TEST_MODULES.join(", ")
        );
    }

    // Run each module's tests sequentially
    let mut all_success = true;

    for module in modules {
        println!("{} Running {} tests...", "→".blue(), module.bold());

        let mut cmd = Command::new("cargo");
        cmd.arg("test").arg("--lib").arg(format!("{}::", module));

        match execute_command(&mut cmd) {
            Ok(_) => {
                println!("{} {} tests passed\n", "✓".green(), module);
            }
            Err(e) => {
                println!("{} {} tests failed\n", "✗".red(), module);
                all_success = false;
                if modules.len() == 1 {
                    // If only one module was requested, return the error immediately
                    return Err(e);
                }
            }
        }
    }

    if all_success {
        Ok(())
    } else {
        anyhow::bail!("Some module tests failed")
    }
}

fn run_bench() -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("bench");

    execute_command(&mut cmd)
}

fn run_inspect(image_path: &str, format: Option<&str>, release: bool) -> Result<()> {
    use std::path::Path;

    println!("{}", "=== Texture Inspect ===".bold().blue());

    if !Path::new(image_path).exists() {
        println!(
            "{} Image file not found: {}",
            "✗".red().bold(),
            image_path.yellow()
        );
        anyhow::bail!("Image file not found");
    }

    if !image_path.to_lowercase().ends_with(".png") {
        println!("{} File does not have .png extension", "⚠".yellow().bold());
    }

    println!("{} Image: {}", "✓".green(), image_path.cyan());
    println!(
        "{} Format: {}",
        "→".blue(),
        format.unwrap_or("from config").bold()
    );
    println!();

    let mut cmd = Command::new("cargo");
    cmd.arg("run").arg("--bin").arg("native-texture");

    if release {
        cmd.arg("--release");
    }

    cmd.arg("--").arg(image_path);
    if let Some(format) = format {
        cmd.arg(format);
    }

    execute_command(&mut cmd)
}

fn run_pre_commit() -> Result<()> {
    println!("{}", "=== Pre-commit Checks ===".bold().blue());

    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), false)?;
    run_task("Clippy", || run_clippy(false), false)?;
    run_task("Test", || run_test(false, false, &[]), false)?;

    let elapsed = start.elapsed();
    println!(
        "\n{} {}",
        "✓ Pre-commit checks passed in".green().bold(),
        format!("{:.2}s", elapsed.as_secs_f64()).bold()
    );

    Ok(())
}

fn install_hooks() -> Result<()> {
    use std::fs;

    println!("{}", "Installing git hooks...".bold());

    let hook_content = r#"#!/bin/sh
# Auto-generated by cargo x install-hooks
set -e

echo "Running pre-commit checks..."
cargo x pre-commit
"#;

    let hook_path = ".git/hooks/pre-commit";
    fs::write(hook_path, hook_content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = fs::metadata(hook_path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(hook_path, perms)?;
    }

    println!("{}", "✓ Git hooks installed".green());
    println!("  Pre-commit hook will run: fmt, clippy, test");

    Ok(())
}

fn run_task<F>(name: &str, task: F, verbose: bool) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    print!("{} {} ... ", "→".blue(), name);

    let start = Instant::now();

    match task() {
        Ok(_) => {
            let elapsed = start.elapsed();
            println!(
                "{} {}",
                "✓".green().bold(),
                if verbose {
                    format!("({:.2}s)", elapsed.as_secs_f64())
                } else {
                    String::new()
                }
            );
            Ok(())
        }
        Err(e) => {
            println!("{}", "✗".red().bold());
            Err(e)
        }
    }
}

fn execute_command(cmd: &mut Command) -> Result<()> {
    let status = cmd
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        anyhow::bail!("Command failed with exit code: {}", status);
    }

    Ok(())
}
