//! Reads an AIGER circuit, rewrites it and reports its statistics before and after.
//!
//! Exit status:
//!   0 - success.
//!   1 - bad arguments, unreadable circuit, or failed verification.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;

use aigopt::{Aig, MAX_EXHAUSTIVE_INPUTS, RewriteOptions};

/// Seed of the random samples used by `--verify` on circuits too wide to enumerate.
const VERIFY_SEED: u64 = 0x5eed;
const VERIFY_WORDS: usize = 64;

/// Structural hashing and local rewriting of an And-Inverter Graph.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Circuit to optimize (`.aag` or `.aig`)
    path: PathBuf,
    /// Extract common factors even when it does not reduce the gate count
    #[arg(long)]
    ungated: bool,
    /// Also re-associate gates when it shares an existing gate
    #[arg(long)]
    reassociate: bool,
    /// Check the rewritten circuit against the original one by simulation
    #[arg(long)]
    verify: bool,
}

fn signatures(aig: &Aig) -> anyhow::Result<Vec<Vec<u64>>> {
    let res = if aig.get_inputs().len() <= MAX_EXHAUSTIVE_INPUTS {
        aig.truth_tables()
    } else {
        aig.random_signatures(VERIFY_SEED, VERIFY_WORDS)
    };
    res.context("failed to simulate circuit")
}

fn verify(original: &Aig, rewritten: &Aig) -> anyhow::Result<()> {
    rewritten
        .check_integrity()
        .context("rewritten circuit is malformed")?;
    if original.get_inputs().len() != rewritten.get_inputs().len() {
        bail!("rewriting changed the number of inputs");
    }
    if signatures(original)? != signatures(rewritten)? {
        bail!("rewritten circuit is not equivalent to the original one");
    }
    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut aig = Aig::from_file(&cli.path)
        .with_context(|| format!("failed to read circuit {}", cli.path.display()))?;
    println!("{}", aig.stats());
    println!("\noptimize\n");

    let original = cli.verify.then(|| aig.clone());
    let options = RewriteOptions {
        gated: !cli.ungated,
        reassociate: cli.reassociate,
    };
    aig.rewrite_with(&options)
        .context("failed to rewrite circuit")?;
    println!("{}", aig.stats());

    if let Some(original) = original {
        verify(&original, &aig)?;
        log::info!("verification passed");
    }
    Ok(())
}

fn main() -> ExitCode {
    let _ = env_logger::builder().try_init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not failures
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
