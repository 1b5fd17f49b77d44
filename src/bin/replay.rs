//! Replay a swap script, or let the hint search play and print its script.
//!
//! ```text
//! cascade-replay <script>            run a script, print the transcript
//! cascade-replay --auto <N>          play up to N hinted swaps
//! cascade-replay ... --seed <S>      override the session seed
//! ```
//!
//! Other session parameters come from the `CASCADE_*` environment variables.

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use tile_cascade::adapter::session_config_from_env;
use tile_cascade::core::NullSink;
use tile_cascade::engine::{autoplay, Replay};

enum Mode {
    Script(String),
    Auto(usize),
}

struct Args {
    mode: Mode,
    seed: Option<u32>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut mode = None;
    let mut seed = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--auto" => {
                let n = args.next().context("--auto needs a move count")?;
                mode = Some(Mode::Auto(n.parse().context("--auto needs a number")?));
            }
            "--seed" => {
                let s = args.next().context("--seed needs a value")?;
                seed = Some(s.parse().context("--seed needs a number")?);
            }
            other if other.starts_with("--") => bail!("unknown option {}", other),
            path => mode = Some(Mode::Script(path.to_string())),
        }
    }

    let Some(mode) = mode else {
        bail!("usage: cascade-replay <script> | --auto <N> [--seed <S>]");
    };
    Ok(Args { mode, seed })
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_env("CASCADE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    let mut config = session_config_from_env();
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    match args.mode {
        Mode::Script(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read script {}", path))?;
            let mut replay = Replay::parse(&text)?;
            if args.seed.is_some() {
                // The command line wins over the script's own seed
                replay.seed = None;
            }
            let transcript = replay.run(config, NullSink)?;
            print!("{}", transcript.render());
        }
        Mode::Auto(n) => {
            let (replay, transcript) = autoplay(config, n)?;
            print!("{}", replay.to_script());
            eprint!("{}", transcript.render());
        }
    }
    Ok(())
}
