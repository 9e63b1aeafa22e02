use clap::Parser;
use sorare_limited::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
