/// Second-main-term spectral audit — driver.
///
/// Usage:
///   goldbach-spectral [--mode=validate|sweep] [--seed=N]
///
/// Modes:
///   validate — (default) single-scale run: simulate 50k biased samples,
///              mod-30 spectral analysis, Dirichlet character regression
///   sweep    — multi-scale run 10^4 .. 10^16: spectral spread per decade,
///              decay trend and persistence verdict
///
/// `--seed=N` overrides the mode's default seed for a different draw.

use goldbach_spectral::sweep::{print_sweep_summary, run_sweep, SweepConfig};
use goldbach_spectral::validate::{run_validation, ValidationConfig};
use goldbach_spectral::AnalysisError;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mode = args
        .iter()
        .find_map(|a| a.strip_prefix("--mode="))
        .unwrap_or("validate");
    let seed = match parse_seed(&args) {
        Ok(seed) => seed,
        Err(bad) => {
            eprintln!("Invalid --seed value: {bad}. Use --seed=N with N a non-negative integer");
            std::process::exit(1);
        }
    };

    let outcome = match mode {
        "validate" => run_validate_mode(seed),
        "sweep" => run_sweep_mode(seed),
        other => {
            eprintln!("Unknown mode: {other}. Use --mode=validate|sweep");
            std::process::exit(1);
        }
    };

    if let Err(e) = outcome {
        eprintln!("Analysis aborted: {e}");
        std::process::exit(1);
    }
}

/// Optional `--seed=N` override; `Err` carries the unparseable value.
fn parse_seed(args: &[String]) -> Result<Option<u64>, String> {
    match args.iter().find_map(|a| a.strip_prefix("--seed=")) {
        Some(raw) => raw.parse::<u64>().map(Some).map_err(|_| raw.to_string()),
        None => Ok(None),
    }
}

fn run_validate_mode(seed: Option<u64>) -> Result<(), AnalysisError> {
    println!("{}", "=".repeat(60));
    println!("The Second Main Term in Hardy-Littlewood Formula");
    println!("Validation Run");
    println!("{}", "=".repeat(60));
    println!();

    let mut config = ValidationConfig::default();
    if let Some(seed) = seed {
        config.seed = seed;
    }
    println!(
        "Simulating {} even N in [{}, {}), seed {}",
        config.n_samples,
        2 * config.half_lo,
        2 * config.half_hi,
        config.seed
    );
    println!();

    run_validation(&config)?;

    println!();
    println!("{}", "=".repeat(60));
    println!("Validation Complete");
    println!("{}", "=".repeat(60));
    Ok(())
}

fn run_sweep_mode(seed: Option<u64>) -> Result<(), AnalysisError> {
    let mut config = SweepConfig::default();
    if let Some(seed) = seed {
        config.seed = seed;
    }
    println!("{}", "=".repeat(60));
    println!(
        "Multi-Scale Analysis: 10^{} to 10^{}",
        config.exponents.first().copied().unwrap_or(0),
        config.exponents.last().copied().unwrap_or(0)
    );
    println!("{}", "=".repeat(60));
    println!();
    println!(
        "{} samples per scale, seed {:#x}, alpha {}",
        config.samples_per_scale, config.seed, config.alpha
    );
    println!();

    let result = run_sweep(&config)?;
    println!();
    print_sweep_summary(&result);
    Ok(())
}
