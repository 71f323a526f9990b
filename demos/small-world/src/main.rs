//! small-world — runs the epidemic model over a small-world contact network.
//!
//! Without arguments it runs the embedded eight-location scenario below.
//! Pass `--config run.json` and `--roster roster.csv` to run your own.

mod logging;

use std::io::Cursor;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use epi_core::Tick;
use epi_location::{EpidemicEvent, EventTag, Location};
use epi_population::{InfectionState, load_roster_csv, load_roster_reader};
use epi_sim::{SimBuilder, SimObserver, TallyObserver, load_config_json, load_config_reader};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "small-world", about = "Epidemic diffusion over a small-world network of locations")]
struct Args {
    /// JSON run configuration (embedded scenario if omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Roster CSV: location,pid,susceptibility,vaccinated,infection_state.
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Override the configured seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the configured end time (ticks).
    #[arg(long)]
    end_time: Option<u64>,

    /// Ticks between two progress reports.
    #[arg(long, default_value_t = 50)]
    report_interval: u64,

    /// off, error, warn, info, debug, or trace.
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

// ── Embedded scenario ─────────────────────────────────────────────────────────

const DEFAULT_CONFIG: &str = r#"{
  "seed": 42,
  "end_time": 400,
  "refresh_interval": 5,
  "network": { "k": 4, "beta": 0.1, "rewire": "redirect" },
  "disease": {
    "transmissibility": 0.3,
    "infectious": { "dwell_time": 20, "infectivity": 1.0 }
  },
  "locations": [
    { "name": "Harbor",    "travel_time_to_hub": 6,  "diffusion_interval": 12 },
    { "name": "Market",    "travel_time_to_hub": 3,  "diffusion_interval": 8 },
    { "name": "Mill",      "travel_time_to_hub": 9,  "diffusion_interval": 15 },
    { "name": "Chapel",    "travel_time_to_hub": 4,  "diffusion_interval": 20 },
    { "name": "Orchard",   "travel_time_to_hub": 11, "diffusion_interval": 18 },
    { "name": "Garrison",  "travel_time_to_hub": 7,  "diffusion_interval": 10 },
    { "name": "Quarry",    "travel_time_to_hub": 13, "diffusion_interval": 25 },
    { "name": "Crossroad", "travel_time_to_hub": 2,  "diffusion_interval": 6 }
  ]
}"#;

// Three residents per location; one infectious resident at the Market.
const DEFAULT_ROSTER: &str = "\
location,pid,susceptibility,vaccinated,infection_state\n\
Harbor,1,0.9,0,uninfected\n\
Harbor,2,0.7,1,uninfected\n\
Harbor,3,0.8,0,uninfected\n\
Market,4,0.9,0,infectious\n\
Market,5,0.6,0,uninfected\n\
Market,6,0.9,1,uninfected\n\
Mill,7,0.5,0,uninfected\n\
Mill,8,0.8,0,uninfected\n\
Mill,9,0.9,0,uninfected\n\
Chapel,10,0.7,1,uninfected\n\
Chapel,11,0.9,0,uninfected\n\
Chapel,12,0.6,0,uninfected\n\
Orchard,13,0.8,0,uninfected\n\
Orchard,14,0.9,1,uninfected\n\
Orchard,15,0.7,0,uninfected\n\
Garrison,16,0.9,0,uninfected\n\
Garrison,17,0.9,0,uninfected\n\
Garrison,18,0.5,1,uninfected\n\
Quarry,19,0.8,0,uninfected\n\
Quarry,20,0.6,0,uninfected\n\
Quarry,21,0.9,0,uninfected\n\
Crossroad,22,0.9,0,uninfected\n\
Crossroad,23,0.7,1,uninfected\n\
Crossroad,24,0.8,0,uninfected\n\
";

// ── Observer ──────────────────────────────────────────────────────────────────

/// Logs the aggregate tally every report interval and counts migrations.
struct ProgressReporter {
    tallies:    TallyObserver,
    migrations: usize,
}

impl SimObserver for ProgressReporter {
    fn on_event(&mut self, event: &EpidemicEvent) {
        if event.tag() == EventTag::Arrival {
            self.migrations += 1;
        }
    }

    fn on_wave_end(&mut self, tick: Tick, processed: usize, locations: &[Location]) {
        let before = self.tallies.records().len();
        self.tallies.on_wave_end(tick, processed, locations);
        if self.tallies.records().len() > before {
            if let Some((t, tally)) = self.tallies.last() {
                info!("{t}: {tally}");
            }
        }
    }

    fn on_sim_end(&mut self, final_tick: Tick, locations: &[Location]) {
        self.tallies.on_sim_end(final_tick, locations);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_level)?;

    // 1. Configuration.
    let mut config = match &args.config {
        Some(path) => load_config_json(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => load_config_reader(DEFAULT_CONFIG.as_bytes())?,
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(end_time) = args.end_time {
        config.end_time = end_time;
    }

    // 2. Roster.
    let roster = match &args.roster {
        Some(path) => load_roster_csv(path)
            .with_context(|| format!("loading roster {}", path.display()))?,
        None => load_roster_reader(Cursor::new(DEFAULT_ROSTER))?,
    };
    info!(
        "{} locations, {} persons, seed {}, end time {}",
        config.locations.len(),
        roster.len(),
        config.seed,
        config.end_time,
    );

    // 3. Bootstrap and run.
    let mut sim = SimBuilder::new(config).roster(roster).build()?;
    let mut reporter = ProgressReporter {
        tallies:    TallyObserver::new(args.report_interval),
        migrations: 0,
    };

    let t0 = Instant::now();
    sim.run(&mut reporter)?;
    let elapsed = t0.elapsed();

    // 4. Summary.
    println!();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  events delivered : {}", sim.delivered());
    println!("  migrations       : {}", reporter.migrations);
    let in_flight = sim.queue().iter().filter(|(_, e)| e.tag() == EventTag::Arrival).count();
    println!("  in flight at end : {in_flight}");
    println!("  final tally      : {}", sim.tally());
    println!();

    println!(
        "{:<12} {:>9} {:>8} {:>9} {:>10} {:>8}",
        "Location", "Residents", "Infected", "Recovered", "Neighbors", "Rejected",
    );
    println!("{}", "-".repeat(61));
    for location in sim.locations() {
        let tally = location.tally();
        println!(
            "{:<12} {:>9} {:>8} {:>9} {:>10} {:>8}",
            location.name(),
            tally.total(),
            tally.infected(),
            tally.get(InfectionState::Recovered),
            location.diffusion().neighbors().len(),
            location.rejected_arrivals(),
        );
    }

    Ok(())
}
