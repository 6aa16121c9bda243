use anyhow::Result;
use clap::Parser;
use shoal_lib::model::config::SimConfig;
use shoal_lib::model::environment::FlatLakeBed;
use shoal_lib::model::metrics;
use shoal_lib::model::state::Lure;
use shoal_lib::model::world::World;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path (TOML)
    #[arg(short, long)]
    config: Option<String>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 3600)]
    ticks: u64,

    /// Seed override for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Leave the lure out of the water
    #[arg(long)]
    nature: bool,

    #[arg(long, default_value_t = 400.0)]
    lure_x: f64,

    #[arg(long, default_value_t = 240.0)]
    lure_y: f64,

    /// Simulated milliseconds per tick
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,

    /// Print the final population snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    metrics::init_logging("shoal=info,shoal_core=info");

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimConfig::from_toml(&std::fs::read_to_string(path)?)?,
        None => SimConfig::default(),
    };
    if args.seed.is_some() {
        config.world.seed = args.seed;
    }

    let mut world = World::new(config)?;
    world.populate_lake()?;
    let bed = FlatLakeBed::from_config(&world.config.world);
    let lure = (!args.nature).then(|| Lure::at(args.lure_x, args.lure_y));

    for t in 0..args.ticks {
        let report = world.update(t * args.tick_ms, lure.as_ref(), &bed)?;
        for id in &report.hooked {
            tracing::info!(tick = world.tick, organism = %id, "Fish on");
        }
        if world.population_count() == 0 {
            tracing::info!(tick = world.tick, "Lake is empty");
            break;
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&world.snapshot())?);
    } else {
        println!("Ticks:        {}", world.tick);
        println!("Population:   {}", world.population_count());
        println!("Schools:      {}", world.school_count());
        println!("Hooked:       {}", world.metrics.counter(metrics::FISH_HOOKED));
        println!("Eaten:        {}", world.metrics.counter(metrics::PREY_CONSUMED));
        println!("Frenzies:     {}", world.metrics.counter(metrics::FRENZY_ENTERED));
        println!("Elapsed:      {:?}", world.metrics.elapsed());
    }
    Ok(())
}
