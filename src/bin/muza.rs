//! `muza` command-line binary.
//!
//! ```bash
//! muza demo --seed 42 --export kira.json
//! muza chat
//! RUST_LOG=muza=debug muza agent
//! ```

use std::io;

use muza::cli::{parse_args, scenarios, usage};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}\n{}", e, usage());
            std::process::exit(2);
        }
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    scenarios::run(&options, stdin.lock(), &mut stdout)?;
    Ok(())
}
