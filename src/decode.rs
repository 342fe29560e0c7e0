//! Input decoding: turns a sequence-database source and a neighborhood
//! source into the in-memory structures the engine consumes, tolerating
//! and counting malformed lines rather than failing the whole run.

use crate::error::{MinerError, Result};
use crate::item::{ItemId, Interner};
use crate::neighborhood::Neighborhood;
use annotate_snippets::display_list::{DisplayList, FormatOptions};
use annotate_snippets::snippet::{Annotation, AnnotationType, Slice, Snippet, SourceAnnotation};
use std::path::{Path, PathBuf};

/// Where a sequence database comes from.
pub enum DatabaseSource<'s> {
    /// A path to a text file, one sequence per line, `-1`-delimited.
    File(PathBuf),
    /// Pre-tokenized rows, mirroring a `Transactions`-shaped dataframe
    /// column: each row becomes one itemset with no boundaries within it.
    Table(Vec<Vec<&'s str>>),
}

/// Where a neighborhood map comes from.
pub enum NeighborSource<'s> {
    /// A path to a text file, one item per line, separator-delimited.
    File(PathBuf),
    /// Pre-tokenized `(item, neighbors)` rows, mirroring an `items` /
    /// `Neighbours`-shaped dataframe.
    Table(Vec<(&'s str, Vec<&'s str>)>),
}

/// Counts of lines skipped during decoding because they could not be
/// parsed; never fatal on its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct DecodeReport {
    pub skipped_sequences: usize,
    pub skipped_neighbor_entries: usize,
}

impl DecodeReport {
    pub fn has_skips(&self) -> bool {
        self.skipped_sequences > 0 || self.skipped_neighbor_entries > 0
    }
}

fn warn_skipped_line(origin: &str, line_number: usize, line: &str, label: &str) {
    let snippet = Snippet {
        title: Some(Annotation { id: None, label: Some(label), annotation_type: AnnotationType::Warning }),
        footer: Vec::new(),
        slices: vec![Slice {
            source: line,
            line_start: line_number,
            origin: Some(origin),
            fold: false,
            annotations: vec![SourceAnnotation {
                range: (0, line.len()),
                label: "could not be parsed",
                annotation_type: AnnotationType::Warning,
            }],
        }],
        opt: FormatOptions { color: false, ..Default::default() },
    };
    log::warn!("{}", DisplayList::from(snippet));
}

/// Decodes a sequence database, interning every item it sees.
pub fn decode_database(source: &DatabaseSource, interner: &mut Interner) -> Result<(Vec<Vec<ItemId>>, DecodeReport)> {
    let mut report = DecodeReport::default();
    let database = match source {
        DatabaseSource::File(path) => {
            let text = read_to_string(path)?;
            let mut sequences = Vec::new();
            for (line_number, line) in text.lines().enumerate() {
                if line.trim().is_empty() {
                    report.skipped_sequences += 1;
                    warn_skipped_line(&path.display().to_string(), line_number + 1, line, "blank database line");
                    continue;
                }
                sequences.push(decode_sequence_line(line, interner));
            }
            sequences
        }
        DatabaseSource::Table(rows) => rows
            .iter()
            .map(|row| {
                let mut tokens: Vec<&str> = row.to_vec();
                tokens.sort();
                tokens.dedup();
                let mut items: Vec<ItemId> = tokens.iter().map(|tok| interner.intern(tok)).collect();
                if items.is_empty() {
                    items
                } else {
                    items.push(ItemId::SENTINEL);
                    items
                }
            })
            .collect(),
    };
    Ok((database, report))
}

fn decode_sequence_line(line: &str, interner: &mut Interner) -> Vec<ItemId> {
    let mut sequence = Vec::new();
    for chunk in line.split("-1") {
        let mut tokens: Vec<&str> = chunk.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        tokens.sort();
        let items: Vec<ItemId> = tokens.iter().map(|tok| interner.intern(tok)).collect();
        sequence.extend(items);
        sequence.push(ItemId::SENTINEL);
    }
    sequence
}

/// Decodes a neighborhood map, interning every item it sees.
pub fn decode_neighborhood(
    source: &NeighborSource,
    interner: &mut Interner,
    separator: &str,
) -> Result<(Neighborhood, DecodeReport)> {
    let mut report = DecodeReport::default();
    let mut neighborhood = Neighborhood::new();
    match source {
        NeighborSource::File(path) => {
            let text = read_to_string(path)?;
            for (line_number, line) in text.lines().enumerate() {
                if line.trim().is_empty() {
                    report.skipped_neighbor_entries += 1;
                    warn_skipped_line(&path.display().to_string(), line_number + 1, line, "blank neighborhood line");
                    continue;
                }
                let mut fields = line.split(separator).filter(|f| !f.is_empty());
                let Some(key) = fields.next() else {
                    report.skipped_neighbor_entries += 1;
                    warn_skipped_line(&path.display().to_string(), line_number + 1, line, "missing key item");
                    continue;
                };
                let key_id = interner.intern(key);
                for neighbor in fields {
                    let neighbor_id = interner.intern(neighbor);
                    neighborhood.add(key_id, neighbor_id);
                }
            }
        }
        NeighborSource::Table(rows) => {
            for (key, neighbors) in rows {
                let key_id = interner.intern(key);
                for neighbor in neighbors {
                    let neighbor_id = interner.intern(neighbor);
                    neighborhood.add(key_id, neighbor_id);
                }
            }
        }
    }
    Ok((neighborhood, report))
}

fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|source| MinerError::SourceUnavailable { path: path.to_owned(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use typed_arena::Arena;

    #[test]
    fn decodes_itemset_sequences() {
        let arena = Arena::new();
        let mut interner = Interner::new(&arena);
        let source = DatabaseSource::Table(vec![]);
        let (_db, _report) = decode_database(&source, &mut interner).unwrap();

        let line = "b a -1 c -1";
        let sequence = decode_sequence_line(line, &mut interner);
        let a = interner.get("a").unwrap();
        let b = interner.get("b").unwrap();
        let c = interner.get("c").unwrap();
        assert_eq!(sequence, vec![a, b, ItemId::SENTINEL, c, ItemId::SENTINEL]);
    }

    #[test]
    fn table_rows_become_single_itemsets() {
        let arena = Arena::new();
        let mut interner = Interner::new(&arena);
        let source = DatabaseSource::Table(vec![vec!["b", "a", "a"]]);
        let (db, _report) = decode_database(&source, &mut interner).unwrap();
        let a = interner.get("a").unwrap();
        let b = interner.get("b").unwrap();
        assert_eq!(db, vec![vec![a, b, ItemId::SENTINEL]]);
    }

    #[test]
    fn neighborhood_table_builds_adjacency() {
        let arena = Arena::new();
        let mut interner = Interner::new(&arena);
        let source = NeighborSource::Table(vec![("a", vec!["b", "c"])]);
        let (neighborhood, report) = decode_neighborhood(&source, &mut interner, "\t").unwrap();
        assert!(!report.has_skips());
        let a = interner.get("a").unwrap();
        let b = interner.get("b").unwrap();
        assert!(neighborhood.is_neighbor(a, b));
    }

    #[test]
    fn missing_source_file_is_fatal() {
        let arena = Arena::new();
        let mut interner = Interner::new(&arena);
        let source = DatabaseSource::File(PathBuf::from("/nonexistent/path/does-not-exist.txt"));
        let result = decode_database(&source, &mut interner);
        assert!(matches!(result, Err(MinerError::SourceUnavailable { .. })));
    }
}
