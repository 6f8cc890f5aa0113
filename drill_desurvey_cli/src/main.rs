use clap::{Args, Parser, Subcommand};
use drill_desurvey::{
    desurvey_all, locate, project_all,
    io::{
        read_collars_csv, read_intervals_csv, read_surveys_csv, suffixed_path,
        write_intervals_csv, write_trace_summary_csv, write_traces_csv,
    },
    Collar, DesurveyConfig, DesurveyRun, SkipReport, Survey,
};

#[derive(Parser)]
#[command(name = "drill_desurvey_cli", version)]
struct Cli {
    #[command(flatten)]
    options: RunOptions,
    #[command(subcommand)]
    command: Commands,
}

/// Settings shared by every command. Flags override the config file.
#[derive(Args)]
struct RunOptions {
    /// JSON file with desurvey settings
    #[arg(long, global = true)]
    config: Option<String>,
    /// Desurvey sampling step along the hole
    #[arg(long, global = true)]
    step: Option<f64>,
    /// Down-hole dips are positive numbers
    #[arg(long, global = true)]
    down_dip_positive: bool,
    /// Do not use collar azimuth/dip for holes without surveys
    #[arg(long, global = true)]
    ignore_collar_orientation: bool,
    /// Sample single-survey holes at every step
    #[arg(long, global = true)]
    densify_straight: bool,
    /// Suffix for projected interval file names
    #[arg(long, global = true)]
    suffix: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Desurvey holes from collar and survey CSV files and write their traces.
    Desurvey {
        collars: String,
        #[arg(long)]
        surveys: Option<String>,
        #[arg(long)]
        output: String,
        /// Also write one row per hole with its segment length
        #[arg(long)]
        summary: Option<String>,
    },
    /// Desurvey holes and place from-to intervals onto their traces.
    Trace {
        collars: String,
        intervals: String,
        #[arg(long)]
        surveys: Option<String>,
        #[arg(long)]
        output: Option<String>,
    },
    /// Print the interpolated position at a depth down one hole.
    Locate {
        collars: String,
        hole: String,
        depth: f64,
        #[arg(long)]
        surveys: Option<String>,
    },
    /// Write the effective settings as JSON.
    WriteConfig { output: String },
}

fn build_config(opts: &RunOptions) -> std::io::Result<DesurveyConfig> {
    let mut cfg = match &opts.config {
        Some(path) => DesurveyConfig::load(path)?,
        None => DesurveyConfig::default(),
    };
    if let Some(step) = opts.step {
        cfg.desurvey_length = step;
    }
    if opts.down_dip_positive {
        cfg.down_dip_negative = false;
    }
    if opts.ignore_collar_orientation {
        cfg.use_collar_orientation = false;
    }
    if opts.densify_straight {
        cfg.densify_straight_holes = true;
    }
    if let Some(suffix) = &opts.suffix {
        cfg.data_suffix = suffix.clone();
    }
    cfg.validate()?;
    Ok(cfg)
}

fn read_holes(
    collars: &str,
    surveys: Option<&str>,
    cfg: &DesurveyConfig,
    skipped: &mut SkipReport,
) -> std::io::Result<(Vec<Collar>, Vec<Survey>)> {
    let (c, c_skip) = read_collars_csv(collars, cfg)?;
    skipped.extend(c_skip);
    let s = match surveys {
        Some(path) => {
            let (s, s_skip) = read_surveys_csv(path)?;
            skipped.extend(s_skip);
            s
        }
        None => Vec::new(),
    };
    Ok((c, s))
}

fn desurvey(
    collars: &str,
    surveys: Option<&str>,
    cfg: &DesurveyConfig,
    skipped: &mut SkipReport,
) -> std::io::Result<DesurveyRun> {
    let (c, s) = read_holes(collars, surveys, cfg, skipped)?;
    let run = desurvey_all(&c, &s, cfg)?;
    println!(
        "Desurveyed {} holes ({} skipped)",
        run.trajectories.len(),
        run.skipped.holes()
    );
    Ok(run)
}

fn print_skipped(skipped: &SkipReport) {
    if !skipped.is_empty() {
        println!(
            "Skipped {} records: {} malformed, {} out of range, {} invalid holes",
            skipped.len(),
            skipped.malformed(),
            skipped.out_of_range(),
            skipped.holes()
        );
    }
}

fn run(cli: Cli) -> std::io::Result<()> {
    let cfg = build_config(&cli.options)?;
    log::debug!("settings: {:?}", cfg);
    let mut skipped = SkipReport::new();
    match cli.command {
        Commands::Desurvey {
            collars,
            surveys,
            output,
            summary,
        } => {
            let run = desurvey(&collars, surveys.as_deref(), &cfg, &mut skipped)?;
            write_traces_csv(&output, &run.trajectories)?;
            println!("Wrote {}", output);
            if let Some(summary) = summary {
                write_trace_summary_csv(&summary, &run.trajectories)?;
                println!("Wrote {}", summary);
            }
            skipped.extend(run.skipped);
        }
        Commands::Trace {
            collars,
            intervals,
            surveys,
            output,
        } => {
            let run = desurvey(&collars, surveys.as_deref(), &cfg, &mut skipped)?;
            let (table, table_skip) = read_intervals_csv(&intervals)?;
            skipped.extend(table_skip);
            let (projected, proj_skip) = project_all(&table.intervals, &run.index());
            println!(
                "Projected {} of {} intervals",
                projected.len(),
                table.intervals.len()
            );
            let output = output.unwrap_or_else(|| suffixed_path(&intervals, &cfg.data_suffix));
            write_intervals_csv(&output, &table.attribute_names, &projected)?;
            println!("Wrote {}", output);
            skipped.extend(run.skipped);
            skipped.extend(proj_skip);
        }
        Commands::Locate {
            collars,
            hole,
            depth,
            surveys,
        } => {
            let run = desurvey(&collars, surveys.as_deref(), &cfg, &mut skipped)?;
            let index = run.index();
            skipped.extend(run.skipped);
            match index.get(&hole).and_then(|t| locate(depth, t)) {
                Some(loc) => println!(
                    "{} @ {}: {:.3},{:.3},{:.3}",
                    hole.trim(),
                    depth,
                    loc.point.x,
                    loc.point.y,
                    loc.point.z
                ),
                None => {
                    print_skipped(&skipped);
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("No position for hole {} at depth {}", hole.trim(), depth),
                    ));
                }
            }
        }
        Commands::WriteConfig { output } => {
            cfg.save(&output)?;
            println!("Wrote {}", output);
        }
    }
    print_skipped(&skipped);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
