use anyhow::Result;
use clap::Parser;

use engine::prelude::*;

mod map_view;
mod run;

#[derive(Parser, Debug)]
struct Args {
    /// Game world seed.
    #[arg(long)]
    seed: Option<u64>,

    /// How many player turns to simulate before stopping.
    #[arg(long, default_value_t = 200)]
    turns: usize,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let seed = args
        .seed
        .unwrap_or_else(|| rand::random());
    log::info!("seed: {seed}");

    let mut runtime = Runtime::new(seed)?;
    let status = run::simulate(&mut runtime, args.turns);

    print!("{}", map_view::show(&runtime));
    for msg in runtime.msg.tail(10) {
        println!("{msg}");
    }
    match status {
        ScenarioStatus::Ongoing => {
            println!("[{} turns elapsed]", args.turns)
        }
        ScenarioStatus::Lost => println!("[game over]"),
    }
    Ok(())
}
