//! lrutrace - replay cache operation traces

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use lrutrace::replay::write_history_csv;
use lrutrace::{demo, load_trace, Bounds, Limits, Replayer};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Trace file (JSON)
    #[arg(required_unless_present = "demo")]
    trace: Option<PathBuf>,

    /// Run the built-in demonstration instead of a trace file
    #[arg(long, conflicts_with = "trace")]
    demo: bool,

    /// Accepted key range
    #[arg(long, value_name = "LO:HI", conflicts_with = "demo")]
    key_range: Option<Bounds>,

    /// Accepted value range
    #[arg(long, value_name = "LO:HI", conflicts_with = "demo")]
    value_range: Option<Bounds>,

    /// Largest capacity a trace may request
    #[arg(long, conflicts_with = "demo")]
    max_capacity: Option<usize>,

    /// Keys and values in 0:100, capacity at most 50
    #[arg(long, conflicts_with = "demo")]
    demo_limits: bool,

    /// Write the miss-rate history as CSV
    #[arg(long, value_name = "FILE")]
    history: Option<PathBuf>,

    /// Log the cache contents after every operation
    #[arg(long)]
    show_state: bool,

    /// Print the report as JSON
    #[arg(long, conflicts_with = "demo")]
    json: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn limits(&self) -> Limits {
        let base = if self.demo_limits {
            Limits::demo()
        } else {
            Limits::unrestricted()
        };

        Limits {
            keys: self.key_range.or(base.keys),
            values: self.value_range.or(base.values),
            max_capacity: self.max_capacity.or(base.max_capacity),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(level.into()),
        )
        .init();

    let history = if args.demo {
        let summary = demo::run(args.show_state)?;
        println!("Output: {}", summary.trace_outputs);
        for phase in &summary.phases {
            println!("{:<14} miss rate {:.2}%", phase.name, phase.miss_rate);
        }
        summary.history
    } else {
        let Some(path) = &args.trace else {
            bail!("no trace file given");
        };

        let limits = args.limits();
        info!("Replaying {} with limits {:?}", path.display(), limits);

        let ops = load_trace(path)?;
        let report = Replayer::new(limits)
            .show_state(args.show_state)
            .run(&ops)?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("Output: {}", report.outputs_line());
            println!("Miss rate: {:.2}%", report.miss_rate);
        }
        report.history
    };

    if let Some(path) = &args.history {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        write_history_csv(BufWriter::new(file), &history)?;
        info!("Wrote {} miss-rate samples to {}", history.len(), path.display());
    }

    Ok(())
}
