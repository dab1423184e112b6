use memsim::*;
use memsim::algo::simulate;

/// A contiguous memory allocation and compaction simulator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a CSV of `size,time` rows (first line is a header)
    #[arg(short, long, value_parser = clap::value_parser!(PathBuf))]
    #[arg(required_unless_present = "random", conflicts_with = "random")]
    input:              Option<PathBuf>,

    /// Generate this many random processes instead of reading a file
    #[arg(short, long)]
    #[arg(value_parser = clap::value_parser!(usize))]
    random:             Option<usize>,

    /// Seed for random workloads
    #[arg(long, default_value_t = 0)]
    #[arg(value_parser = clap::value_parser!(u64))]
    seed:               u64,

    /// Largest size of a random process
    #[arg(long, default_value_t = 8)]
    #[arg(value_parser = clap::value_parser!(Steps))]
    max_size:           Steps,

    /// Longest time of a random process
    #[arg(long, default_value_t = 5)]
    #[arg(value_parser = clap::value_parser!(Steps))]
    max_time:           Steps,

    /// Total memory, in cells
    #[arg(short, long)]
    #[arg(value_parser = clap::value_parser!(Steps))]
    memory:             Steps,

    /// Delay before each coalescing attempt (ms)
    #[arg(short, long, default_value_t = 0)]
    #[arg(value_parser = clap::value_parser!(u64))]
    compaction_time:    u64,

    /// Extra coalescing time, shown in totals only (ms)
    #[arg(short = 'k', long, default_value_t = 0)]
    #[arg(value_parser = clap::value_parser!(u64))]
    coalescing_time:    u64,

    /// Wall time of one time unit (ms)
    #[arg(short, long, default_value_t = 1000)]
    #[arg(value_parser = clap::value_parser!(u64))]
    tick_ms:            u64,

    /// Actually sleep between ticks instead of fast-forwarding
    #[arg(long, default_value_t = false)]
    realtime:           bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Args::parse();
    let processes = match (cli.input, cli.random) {
        (Some(path), _)     => {
            anyhow::ensure!(path.is_file(), "Invalid input path: {}", path.display());
            read_from_path::<CSVProcParser, &str>(path)?
        },
        (None, Some(n))     => {
            random_workload(n, cli.max_size, cli.max_time, cli.seed)?
        },
        (None, None)        => { anyhow::bail!("Either --input or --random is needed"); }
    };
    let config = SimConfig::new(cli.memory)
        .with_compaction_time(cli.compaction_time)
        .with_coalescing_hole_time(cli.coalescing_time)
        .with_tick(Duration::from_millis(cli.tick_ms));

    let mut console = ConsoleReporter::stdout();
    let outcome = if cli.realtime {
        simulate(config, processes, &mut WallClock::new(), &mut console)?
    } else {
        simulate(config, processes, &mut VirtualClock::new(), &mut console)?
    };

    println!(
        "Total simulated time: {} ms\nLeft in memory:\t{} cells\nFragmentation:\t {:.2}%",
        outcome.elapsed.as_millis(),
        outcome.memory.occupied(),
        analyze::external_fragmentation(&outcome.memory) * 100.0
    );

    Ok(())
}
