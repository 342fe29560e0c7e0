//! A PrefixSpan-style miner for frequent sequential patterns whose items
//! are constrained to be mutual neighbors under a user-supplied adjacency
//! relation.
//!
//! The public entry point is [`Engine`]: construct one with a database
//! source, a neighborhood source, and a [`MinerOptions`], call
//! [`Engine::mine`], then read back [`Engine::patterns`].

pub mod decode;
pub mod engine;
pub mod error;
pub mod filter;
pub mod item;
pub mod neighborhood;
pub mod options;
pub mod pattern;
pub mod project;

use decode::{decode_database, decode_neighborhood, DatabaseSource, DecodeReport, NeighborSource};
use error::Result;
use fnv::FnvHashSet;
use item::{ItemId, Interner};
use neighborhood::Neighborhood;
use options::{resolve_min_sup, MinerOptions};
use pattern::{render, Pattern};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};
use sysinfo::{MemoryRefreshKind, Pid, ProcessRefreshKind, RefreshKind, System};

/// The public mining facade.
///
/// Owns the options and the parsed database/neighborhood once decoded, and
/// caches the results of each pass the way the teacher's `Database` caches
/// lazily-computed results: nothing is decoded or mined until [`Engine::mine`]
/// is called.
pub struct Engine<'a> {
    interner: Interner<'a>,
    options: MinerOptions,
    decode_report: DecodeReport,
    patterns: Option<pattern::PatternStore>,
    runtime: Option<Duration>,
    memory_rss: Option<u64>,
    memory_uss: Option<u64>,
}

impl<'a> Engine<'a> {
    pub fn new(interner: Interner<'a>, options: MinerOptions) -> Self {
        Engine {
            interner,
            options,
            decode_report: DecodeReport::default(),
            patterns: None,
            runtime: None,
            memory_rss: None,
            memory_uss: None,
        }
    }

    /// Runs the full pipeline: decode both sources, apply the global
    /// support filter, then mine. Records elapsed time and a memory
    /// snapshot once mining completes.
    pub fn mine(&mut self, database_source: &DatabaseSource, neighbor_source: &NeighborSource) -> Result<()> {
        let start = Instant::now();

        let (database, db_report) = time("decode database", || {
            decode_database(database_source, &mut self.interner)
        })?;
        let (neighborhood, nb_report) = time("decode neighborhood", || {
            decode_neighborhood(neighbor_source, &mut self.interner, &self.options.separator)
        })?;
        self.decode_report = DecodeReport {
            skipped_sequences: db_report.skipped_sequences,
            skipped_neighbor_entries: nb_report.skipped_neighbor_entries,
        };

        let min_sup = resolve_min_sup(&self.options.min_sup, database.len())?;
        log::info!("mining {} sequences with minSup={}", database.len(), min_sup);

        let globally_filtered = time("global filter", || filter::filter(&database, min_sup, &FnvHashSet::default()));

        let mut ctx = engine::MiningContext::new(
            &neighborhood,
            min_sup,
            self.options.max_length,
            self.options.max_gap,
        );
        time("mine", || ctx.mine(&globally_filtered));

        self.patterns = Some(ctx.patterns);
        self.runtime = Some(start.elapsed());
        self.record_memory();
        Ok(())
    }

    fn record_memory(&mut self) {
        let mut system = System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::nothing().with_ram()),
        );
        system.refresh_processes_specifics(
            sysinfo::ProcessesToUpdate::Some(&[Pid::from_u32(std::process::id())]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        if let Some(process) = system.process(Pid::from_u32(std::process::id())) {
            self.memory_rss = Some(process.memory());
            // sysinfo exposes RSS directly; USS (unique set size) would
            // require /proc/self/smaps accounting this crate does not do,
            // so it is approximated by RSS.
            self.memory_uss = Some(process.memory());
        }
    }

    /// Canonical pattern -> support mapping, in first-discovery order.
    pub fn patterns(&self) -> Vec<(String, usize)> {
        let Some(store) = &self.patterns else { return Vec::new() };
        store
            .iter()
            .map(|(pattern, support)| (self.render_pattern(pattern), support))
            .collect()
    }

    /// A two-column `(Patterns, Support)` view of [`Engine::patterns`].
    pub fn patterns_as_table(&self) -> (Vec<String>, Vec<usize>) {
        self.patterns().into_iter().unzip()
    }

    fn render_pattern(&self, pattern: &Pattern) -> String {
        render(pattern, |id| self.interner.resolve(id))
    }

    /// Writes each `pattern:support` pair on its own line.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let mut file = std::fs::File::create(path)?;
        for (pattern, support) in self.patterns() {
            writeln!(file, "{pattern}:{support} ")?;
        }
        Ok(())
    }

    pub fn runtime_seconds(&self) -> Option<f64> {
        self.runtime.map(|d| d.as_secs_f64())
    }

    pub fn memory_rss(&self) -> Option<u64> {
        self.memory_rss
    }

    pub fn memory_uss(&self) -> Option<u64> {
        self.memory_uss
    }

    pub fn decode_report(&self) -> DecodeReport {
        self.decode_report
    }
}

fn time<T>(label: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let result = f();
    log::debug!("{label} took {:?}", start.elapsed());
    result
}
