use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use corvid::pipeline::{self, RunOptions, RunOutcome};
use corvid::report;
use std::io::Write;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "corvid")]
#[command(about = "Clean social post streams and build hashtag co-occurrence graphs")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a post stream into a corpus file, building the graph alongside
    Process(ProcessArgs),
    /// Build only the graph and print the per-hashtag degree report
    Degrees(DegreesArgs),
}

#[derive(Args)]
struct ProcessArgs {
    /// Path to the input post stream (one JSON record per line)
    #[arg(short, long)]
    input: String,

    /// Path for the cleaned corpus output
    #[arg(short, long)]
    output: String,

    /// Directory to export the graph as vertices.csv/edges.csv
    #[arg(long)]
    graph_dir: Option<String>,

    /// Limit number of records to process (for testing)
    #[arg(long)]
    limit: Option<u64>,

    /// Only process records with this language code
    #[arg(long)]
    lang: Option<String>,

    /// Dry run - don't write output files
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct DegreesArgs {
    /// Path to the input post stream (one JSON record per line)
    #[arg(short, long)]
    input: String,

    /// Limit number of records to process (for testing)
    #[arg(long)]
    limit: Option<u64>,

    /// Only process records with this language code
    #[arg(long)]
    lang: Option<String>,
}

fn print_summary(outcome: &RunOutcome, elapsed_secs: f64) {
    let stats = &outcome.stats;

    println!();
    println!("=== Summary ===");
    println!("Processing time:    {:.2}s", elapsed_secs);
    println!();
    println!("Records read:       {}", stats.records_read);
    println!("Malformed records:  {}", stats.malformed_records);
    println!("Language filtered:  {}", stats.lang_filtered);
    println!("Non-latin skipped:  {}", stats.non_latin_skipped);
    println!("Posts written:      {}", stats.posts_written);
    println!("Posts filtered:     {}", stats.posts_filtered);
    println!("Posts with unicode: {}", stats.posts_with_escapes);
    println!();
    println!("Hashtag vertices:   {}", outcome.graph.vertex_count());
    println!("Graph edges:        {}", outcome.graph.edge_count());
    match outcome.graph.average_degree() {
        Some(avg) => println!("Average degree:     {:.2}", avg),
        None => println!("Average degree:     n/a"),
    }
}

fn run_process(args: ProcessArgs) -> Result<()> {
    let options = RunOptions {
        input: args.input,
        output: Some(args.output),
        graph_dir: args.graph_dir,
        limit: args.limit,
        lang: args.lang,
        dry_run: args.dry_run,
    };

    let start = Instant::now();
    let outcome = pipeline::run(&options)?;
    print_summary(&outcome, start.elapsed().as_secs_f64());

    Ok(())
}

fn run_degrees(args: DegreesArgs) -> Result<()> {
    let options = RunOptions {
        input: args.input,
        output: None,
        graph_dir: None,
        limit: args.limit,
        lang: args.lang,
        dry_run: false,
    };

    let outcome = pipeline::run(&options)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report::write_degree_report(&outcome.graph, &mut out)?;
    out.flush()?;

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let result = match cli.command {
        Commands::Process(args) => run_process(args),
        Commands::Degrees(args) => run_degrees(args),
    };

    match result {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
