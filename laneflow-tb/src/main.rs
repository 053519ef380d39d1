use clap::Parser;
use laneflow::OneRwQueue;
use laneflow_tb::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Randomized traffic testbench for the one-port lane-positioned queue.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Random traffic cycles per configuration.
    #[arg(long, default_value_t = 10_000)]
    cycles: usize,
    /// Traffic seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Probability that the producer offers nothing in a cycle.
    #[arg(long, default_value_t = 0.25)]
    enq_idle: f64,
    /// Probability that the consumer accepts nothing in a cycle.
    #[arg(long, default_value_t = 0.25)]
    deq_idle: f64,
    /// Enables quiet runs of up to this many cycles on both sides.
    #[arg(long)]
    burst: Option<usize>,
}

impl From<Cli> for TbConfig {
    fn from(cli: Cli) -> Self {
        Self { cycles: cli.cycles, seed: cli.seed, enq_idle: cli.enq_idle, deq_idle: cli.deq_idle, burst: cli.burst }
    }
}

fn sweep_one<const LANES: usize, const ROWS: usize>(config: &TbConfig) -> Result<(), TbError> {
    let mut queue = OneRwQueue::<u64, LANES, ROWS>::new()?;
    let summary = run::<_, LANES>(&mut queue, config)?;
    let port = queue.port_stats();
    info!(
        lanes = LANES,
        rows = ROWS,
        enqueued = summary.enqueued,
        peak_used = summary.peak_used,
        reads = port.reads,
        writes = port.writes,
        deferred_writes = port.deferred_writes,
        port_busy = format!("{:.1}%", 100.0 * (port.reads + port.writes) as f64 / port.cycles().max(1) as f64),
        "passed"
    );
    Ok(())
}

macro_rules! sweep {
    ($config:expr; $(($lanes:literal, $rows:literal)),* $(,)?) => {
        $(sweep_one::<$lanes, $rows>($config)?;)*
    };
}

fn main() -> Result<(), TbError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = TbConfig::from(Cli::parse());
    config.validate()?;

    sweep!(&config;
        (1, 8), (1, 10), (1, 16),
        (3, 8), (3, 10), (3, 16),
        (4, 8), (4, 10), (4, 16),
        (5, 8), (5, 10), (5, 16),
        (8, 8), (8, 10), (8, 16),
    );
    Ok(())
}
