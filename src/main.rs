//! Command-line driver: loads a parameter file, runs the optimizer and
//! writes a CSV log plus SVG snapshots into an output directory.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use lamp_optics::config::{ConfigError, Experiment, Parameters};
use lamp_optics::ga::EvolutionRunner;
use lamp_optics::report::{svg, StatsLog};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON parameter file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the seed from the parameter file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory for the statistics log and snapshots
    #[arg(short, long, default_value = "out")]
    out_dir: PathBuf,

    /// Snapshot the generation's best candidate every N generations (0 disables)
    #[arg(long, default_value = "10")]
    svg_every: usize,
}

fn load(args: &Args) -> Result<Experiment> {
    let mut params = match &args.config {
        Some(path) => Parameters::load(path)
            .with_context(|| format!("loading parameters from {}", path.display()))?,
        None => Parameters::default(),
    };
    if args.seed.is_some() {
        params.seed = args.seed;
    }
    Ok(params.build()?)
}

fn run(args: &Args, experiment: &Experiment) -> Result<()> {
    let Experiment {
        environment: env,
        design,
        evolution,
    } = experiment;

    let img_dir = args.out_dir.join("img");
    fs::create_dir_all(&img_dir)
        .with_context(|| format!("creating {}", img_dir.display()))?;
    let stats_path = args.out_dir.join("stats.csv");
    let mut log = StatsLog::create(&stats_path)
        .with_context(|| format!("creating {}", stats_path.display()))?;

    info!(
        "criterion {}, encoding {:?}, population {}, generations {}",
        env.criterion.name(),
        env.encoding,
        evolution.population_size,
        evolution.max_generations
    );

    let last = evolution.max_generations;
    let mut failure: Option<io::Error> = None;
    let result = EvolutionRunner::run_with_observer(env, design, evolution, |stats, population| {
        if failure.is_some() {
            return;
        }
        let mut write = || -> io::Result<()> {
            log.append(stats)?;
            let due = args.svg_every > 0 && (stats.generation % args.svg_every == 0 || stats.generation == last);
            if due {
                let best = &population[stats.best_index];
                fs::write(img_dir.join(format!("img-{:03}.svg", stats.generation)), svg::render(best, env))?;
            }
            Ok(())
        };
        failure = write().err();
    });
    if let Some(err) = failure {
        return Err(err).context("writing run artifacts");
    }
    log.flush().context("flushing statistics")?;

    let members = result.archive.members();
    info!("archive holds {} candidate(s)", members.len());
    for (i, candidate) in members.iter().enumerate() {
        let c = candidate.components();
        info!(
            "#{i}: efficiency {:.4}, uniformity {:.4}, obtrusive {:.4}, pollution {}, glare {:.4}, {}",
            c.efficiency,
            c.uniformity,
            c.obtrusive_light,
            c.light_pollution,
            c.glare_reduction,
            candidate.summary()
        );
        fs::write(img_dir.join(format!("final-{i:02}.svg")), svg::render(candidate, env))?;
    }
    if let Some(best) = result.archive.best(env) {
        info!("best: {}", best.summary());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let experiment = match load(&args) {
        Ok(experiment) => experiment,
        Err(err) => {
            match err.downcast_ref::<ConfigError>() {
                Some(ConfigError::InvalidFields(fields)) => {
                    for field in fields {
                        error!("invalid parameter: {field}");
                    }
                }
                _ => error!("{err:#}"),
            }
            return ExitCode::from(2);
        }
    };

    match run(&args, &experiment) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
