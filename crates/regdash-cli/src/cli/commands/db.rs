use super::open_store;
use crate::cli::args::{ResetArgs, SeedDemoArgs, SeedWeekArgs};
use crate::exit_codes::EXIT_SUCCESS;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use regdash_core::seed;
use regdash_core::WindowResolver;

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

pub fn cmd_reset(args: ResetArgs) -> anyhow::Result<i32> {
    let store = open_store(&args.common)?;
    store.reset()?;
    println!("Database reset.");
    Ok(EXIT_SUCCESS)
}

pub fn cmd_seed_demo(args: SeedDemoArgs) -> anyhow::Result<i32> {
    let store = open_store(&args.common)?;
    let cfg = args.common.config();
    let mut rng = rng_for(args.seed);
    let added = seed::seed_demo(
        &store,
        &WindowResolver::lab(),
        Utc::now(),
        &cfg.monitored_clouds,
        args.count,
        &mut rng,
    )?;
    println!("Seeded {added} demo runs.");
    Ok(EXIT_SUCCESS)
}

pub fn cmd_seed_week(args: SeedWeekArgs) -> anyhow::Result<i32> {
    let store = open_store(&args.common)?;
    let cfg = args.common.config();
    let mut rng = rng_for(args.seed);
    let inserted = seed::seed_week(
        &store,
        &WindowResolver::lab(),
        Utc::now(),
        &cfg.monitored_clouds,
        &mut rng,
    )?;
    println!("Seeded {inserted} runs across the last 7 windows.");
    Ok(EXIT_SUCCESS)
}
