use clap::Parser;
use spatial_prefixspan::decode::{DatabaseSource, NeighborSource};
use spatial_prefixspan::item::Interner;
use spatial_prefixspan::options::{parse_bound, MinSupSpec, MinerOptions};
use spatial_prefixspan::Engine;
use std::path::PathBuf;
use std::process::ExitCode;
use typed_arena::Arena;

/// Mine frequent sequential patterns constrained by a spatial neighborhood relation.
#[derive(Parser, Debug)]
#[command(name = "spatial-prefixspan", version, about)]
struct Args {
    /// Path to the sequence database file.
    database: PathBuf,

    /// Path to the neighborhood map file.
    neighborhood: PathBuf,

    /// Minimum support: an integer absolute count, or a fractional value
    /// (containing a decimal point) relative to the database size.
    #[arg(long, default_value = "1")]
    min_sup: String,

    /// Field separator used within neighborhood lines.
    #[arg(long, default_value = "\t")]
    separator: String,

    /// Maximum number of itemsets per pattern; unbounded if omitted.
    #[arg(long)]
    max_length: Option<String>,

    /// Maximum number of itemset boundaries skipped between matches; unbounded if omitted.
    #[arg(long)]
    max_gap: Option<String>,

    /// Where to write `pattern:support` output lines.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    simple_logger::SimpleLogger::new().env().init().expect("failed to initialize logger");
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("spatial-prefixspan: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> spatial_prefixspan::error::Result<()> {
    let min_sup = MinSupSpec::parse(&args.min_sup)?;
    let max_length = parse_bound(args.max_length.as_deref())?;
    let max_gap = parse_bound(args.max_gap.as_deref())?;

    let options = MinerOptions { min_sup, separator: args.separator, max_length, max_gap };

    let arena = Arena::new();
    let interner = Interner::new(&arena);
    let mut engine = Engine::new(interner, options);

    let database_source = DatabaseSource::File(args.database);
    let neighbor_source = NeighborSource::File(args.neighborhood);
    engine.mine(&database_source, &neighbor_source)?;

    let report = engine.decode_report();
    if report.has_skips() {
        log::warn!(
            "skipped {} malformed database line(s) and {} malformed neighborhood line(s)",
            report.skipped_sequences,
            report.skipped_neighbor_entries
        );
    }

    let patterns = engine.patterns();
    log::info!(
        "found {} pattern(s) in {:.3}s",
        patterns.len(),
        engine.runtime_seconds().unwrap_or(0.0)
    );
    if let (Some(rss), Some(uss)) = (engine.memory_rss(), engine.memory_uss()) {
        log::debug!("memory rss={rss}B uss(approx)={uss}B");
    }

    if let Some(output) = &args.output {
        engine.save(output).map_err(|source| spatial_prefixspan::error::MinerError::SourceUnavailable {
            path: output.clone(),
            source,
        })?;
    } else {
        for (pattern, support) in &patterns {
            println!("{pattern}:{support} ");
        }
    }

    Ok(())
}
