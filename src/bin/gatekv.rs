//! GateKV Binary
//!
//! Executes a command file, one thread per command.

use clap::{Parser, ValueEnum};
use gatekv::sync::WakeOrder;
use gatekv::Config;
use tracing_subscriber::{fmt, EnvFilter};

/// GateKV batch runner
#[derive(Parser, Debug)]
#[command(name = "gatekv")]
#[command(about = "Run a batch of key-value commands concurrently")]
#[command(version)]
struct Args {
    /// Command file
    #[arg(short, long, default_value = "commands.txt")]
    input: String,

    /// Output file for events (omit with --stdout)
    #[arg(short, long, default_value = "output.txt")]
    output: String,

    /// Write events to stdout instead of the output file
    #[arg(long)]
    stdout: bool,

    /// Admission order among waiting writers of the same kind
    #[arg(short, long, value_enum, default_value_t = Order::Fifo)]
    wake_order: Order,

    /// Skip the lock counters and final table after the batch
    #[arg(long)]
    no_summary: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Order {
    Fifo,
    Unordered,
}

impl From<Order> for WakeOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Fifo => WakeOrder::Fifo,
            Order::Unordered => WakeOrder::Unordered,
        }
    }
}

fn main() {
    // Logs go to stderr so --stdout output stays clean
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gatekv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("GateKV v{}", gatekv::VERSION);
    tracing::info!("Input file: {}", args.input);

    let mut builder = Config::builder()
        .input_path(&args.input)
        .wake_order(args.wake_order.into())
        .write_summary(!args.no_summary);
    builder = if args.stdout {
        builder.stdout()
    } else {
        tracing::info!("Output file: {}", args.output);
        builder.output_path(&args.output)
    };
    let config = builder.build();

    match gatekv::run(&config) {
        Ok(report) => {
            tracing::info!(
                "Executed {} commands, final table has {} records",
                report.outcomes.len(),
                report.final_table.len()
            );
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            std::process::exit(1);
        }
    }
}
