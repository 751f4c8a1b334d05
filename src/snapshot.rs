use crate::engine::{EntityRecord, FieldRecord, ReplayEngine};
use anyhow::Context;
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    io::Read,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    GzipJson,
}

/// Schema errors surfaced by the loader. IO/decompression problems are
/// reported through `anyhow` at the call site instead.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot contains no ticks")]
    NoTicks,
    #[error("duplicate tick {0} in snapshot")]
    DuplicateTick(u32),
    #[error(
        "tick {tick}, entity {entity}: field path has {path_len} segments but namedPath has {named_len}"
    )]
    PathMismatch {
        tick: u32,
        entity: u32,
        path_len: usize,
        named_len: usize,
    },
}

/// One entity with its fields, as dumped by the decoding engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub index: u32,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldRecord>,
}

/// Everything recorded for a single playback tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub tick: u32,
    #[serde(default)]
    pub entities: Vec<EntitySnapshot>,
    #[serde(default)]
    pub baseline: Vec<EntitySnapshot>,
}

/// On-disk schema of a snapshot dump.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotFile {
    #[serde(default)]
    pub source: Option<String>,
    pub ticks: Vec<TickSnapshot>,
}

/// Per-tick lookup tables so the `ReplayEngine` accessors stay O(1).
#[derive(Debug, Clone, Default)]
struct TickIndex {
    live_records: Vec<EntityRecord>,
    live_by_index: HashMap<u32, usize>,
    baseline_records: Vec<EntityRecord>,
    baseline_by_index: HashMap<u32, usize>,
}

/// A snapshot dump loaded from disk, serving as the inspector's decoding
/// engine. Built once per load; read-only afterwards.
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    pub source_path: Option<PathBuf>,
    pub format: SnapshotFormat,
    file: SnapshotFile,
    ticks: Vec<u32>,
    tick_lookup: HashMap<u32, usize>,
    tick_index: Vec<TickIndex>,
}

impl LoadedSnapshot {
    pub fn load_path(path: &Path) -> anyhow::Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading {path:?}"))?;
        let format = detect_format(path, &bytes);
        let text_bytes = match format {
            SnapshotFormat::Json => bytes,
            SnapshotFormat::GzipJson => {
                let mut decoder = GzDecoder::new(&bytes[..]);
                let mut out = Vec::new();
                decoder.read_to_end(&mut out).context("gzip decompress")?;
                out
            }
        };

        let file: SnapshotFile =
            serde_json::from_slice(&text_bytes).context("parsing snapshot JSON")?;

        let mut snapshot = Self::from_file(file)?;
        snapshot.source_path = Some(path.to_path_buf());
        snapshot.format = format;
        Ok(snapshot)
    }

    /// Build a snapshot engine from an already-parsed file. Validates the
    /// schema invariants the inspector relies on.
    pub fn from_file(file: SnapshotFile) -> Result<Self, SnapshotError> {
        if file.ticks.is_empty() {
            return Err(SnapshotError::NoTicks);
        }

        let mut ticks = Vec::with_capacity(file.ticks.len());
        let mut tick_lookup = HashMap::with_capacity(file.ticks.len());
        let mut tick_index = Vec::with_capacity(file.ticks.len());

        for (pos, snap) in file.ticks.iter().enumerate() {
            if tick_lookup.insert(snap.tick, pos).is_some() {
                return Err(SnapshotError::DuplicateTick(snap.tick));
            }
            ticks.push(snap.tick);

            for entity in snap.entities.iter().chain(snap.baseline.iter()) {
                for field in &entity.fields {
                    if field.path.len() != field.named_path.len() {
                        return Err(SnapshotError::PathMismatch {
                            tick: snap.tick,
                            entity: entity.index,
                            path_len: field.path.len(),
                            named_len: field.named_path.len(),
                        });
                    }
                }
            }

            tick_index.push(build_tick_index(snap));
        }

        Ok(Self {
            source_path: None,
            format: SnapshotFormat::Json,
            file,
            ticks,
            tick_lookup,
            tick_index,
        })
    }

    pub fn source_label(&self) -> Option<&str> {
        self.file.source.as_deref()
    }

    fn tick_pos(&self, tick: u32) -> Option<usize> {
        self.tick_lookup.get(&tick).copied()
    }
}

impl ReplayEngine for LoadedSnapshot {
    fn ticks(&self) -> &[u32] {
        &self.ticks
    }

    fn entities(&self, tick: u32) -> Option<&[EntityRecord]> {
        let pos = self.tick_pos(tick)?;
        Some(&self.tick_index[pos].live_records)
    }

    fn baseline_entities(&self, tick: u32) -> Option<&[EntityRecord]> {
        let pos = self.tick_pos(tick)?;
        Some(&self.tick_index[pos].baseline_records)
    }

    fn entity_fields(&self, tick: u32, entity: u32) -> Option<&[FieldRecord]> {
        let pos = self.tick_pos(tick)?;
        let slot = *self.tick_index[pos].live_by_index.get(&entity)?;
        Some(&self.file.ticks[pos].entities[slot].fields)
    }

    fn baseline_entity_fields(&self, tick: u32, entity: u32) -> Option<&[FieldRecord]> {
        let pos = self.tick_pos(tick)?;
        let slot = *self.tick_index[pos].baseline_by_index.get(&entity)?;
        Some(&self.file.ticks[pos].baseline[slot].fields)
    }
}

fn build_tick_index(snap: &TickSnapshot) -> TickIndex {
    let mut index = TickIndex::default();

    for (slot, entity) in snap.entities.iter().enumerate() {
        index.live_records.push(EntityRecord {
            index: entity.index,
            name: entity.name.clone(),
        });
        index.live_by_index.insert(entity.index, slot);
    }
    for (slot, entity) in snap.baseline.iter().enumerate() {
        index.baseline_records.push(EntityRecord {
            index: entity.index,
            name: entity.name.clone(),
        });
        index.baseline_by_index.insert(entity.index, slot);
    }

    index
}

fn detect_format(path: &Path, bytes: &[u8]) -> SnapshotFormat {
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        return SnapshotFormat::GzipJson;
    }
    // Gzip magic: 1F 8B
    if bytes.len() >= 2 && bytes[0] == 0x1F && bytes[1] == 0x8B {
        return SnapshotFormat::GzipJson;
    }
    SnapshotFormat::Json
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EntityView;
    use std::path::Path;

    fn field(path: &[u32], names: &[&str], value: &str) -> FieldRecord {
        FieldRecord {
            path: path.to_vec(),
            named_path: names.iter().map(|s| s.to_string()).collect(),
            encoded_as: "int32".to_string(),
            decoded_as: "int".to_string(),
            value: value.to_string(),
        }
    }

    fn sample() -> SnapshotFile {
        SnapshotFile {
            source: Some("match.dem".to_string()),
            ticks: vec![TickSnapshot {
                tick: 120,
                entities: vec![
                    EntitySnapshot {
                        index: 0,
                        name: "CWorld".to_string(),
                        fields: vec![field(&[0], &["flags"], "1")],
                    },
                    EntitySnapshot {
                        index: 7,
                        name: "CDotaPlayer".to_string(),
                        fields: vec![],
                    },
                ],
                baseline: vec![EntitySnapshot {
                    index: 0,
                    name: "CWorld".to_string(),
                    fields: vec![],
                }],
            }],
        }
    }

    #[test]
    fn detect_format_uses_extension_and_magic() {
        let gz_magic = [0x1F_u8, 0x8B_u8, 0x08_u8, 0x00_u8];
        let plain = b"{ \"ticks\": [] }";

        assert_eq!(
            detect_format(Path::new("dump.json.gz"), plain),
            SnapshotFormat::GzipJson
        );
        assert_eq!(
            detect_format(Path::new("dump.json"), &gz_magic),
            SnapshotFormat::GzipJson
        );
        assert_eq!(
            detect_format(Path::new("dump.json"), plain),
            SnapshotFormat::Json
        );
    }

    #[test]
    fn from_file_indexes_both_views() {
        let snapshot = LoadedSnapshot::from_file(sample()).unwrap();
        assert_eq!(snapshot.ticks(), &[120]);

        let ents = snapshot.entities(120).unwrap();
        assert_eq!(ents.len(), 2);
        assert_eq!(ents[0].name, "CWorld");

        let fields = snapshot.entity_fields(120, 0).unwrap();
        assert_eq!(fields.len(), 1);
        assert!(snapshot.entity_fields(120, 99).is_none());

        let baseline = snapshot.baseline_entities(120).unwrap();
        assert_eq!(baseline.len(), 1);
        assert_eq!(snapshot.baseline_entity_fields(120, 0).unwrap().len(), 0);
    }

    #[test]
    fn unknown_tick_is_absent_not_error() {
        let snapshot = LoadedSnapshot::from_file(sample()).unwrap();
        assert!(snapshot.entities(999).is_none());
        assert!(snapshot.entity_fields(999, 0).is_none());
    }

    #[test]
    fn schema_violations_are_rejected() {
        assert!(matches!(
            LoadedSnapshot::from_file(SnapshotFile {
                source: None,
                ticks: vec![]
            }),
            Err(SnapshotError::NoTicks)
        ));

        let mut dup = sample();
        dup.ticks.push(dup.ticks[0].clone());
        assert!(matches!(
            LoadedSnapshot::from_file(dup),
            Err(SnapshotError::DuplicateTick(120))
        ));

        let mut mismatch = sample();
        mismatch.ticks[0].entities[0].fields[0].named_path.clear();
        assert!(matches!(
            LoadedSnapshot::from_file(mismatch),
            Err(SnapshotError::PathMismatch { tick: 120, .. })
        ));
    }

    #[test]
    fn handle_validity_checks_target_presence() {
        let snapshot = LoadedSnapshot::from_file(sample()).unwrap();

        // Handle word with serial bits set, index 7 -> present in live view.
        let handle = (3 << 14) | 7;
        assert_eq!(snapshot.handle_target(handle), 7);
        assert!(snapshot.handle_valid(120, EntityView::Entities, handle));
        // Index 7 is absent from the baseline view.
        assert!(!snapshot.handle_valid(120, EntityView::BaselineEntities, handle));
        // The "no entity" word is never valid.
        assert!(!snapshot.handle_valid(120, EntityView::Entities, crate::statics::EH_INVALID));
    }
}
