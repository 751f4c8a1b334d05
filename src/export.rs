use crate::engine::{EntityView, ReplayEngine};
use crate::fields::{DisplayField, build_display_fields};
use crate::statics;
use serde::Serialize;
use std::fmt::Write as _;

/// One field in an entity-list export.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportedField {
    /// Dotted display name.
    pub path: String,
    pub path_segments: Vec<u32>,
    pub encoded_as: String,
    pub decoded_as: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExportedEntity {
    pub index: u32,
    pub name: String,
    pub fields: Vec<ExportedField>,
}

/// Materialized entity-list export: every entity the source stage returns at
/// the tick, regardless of the active text filter or field selection.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EntityListExport {
    pub tick: u32,
    pub view: &'static str,
    pub entities: Vec<ExportedEntity>,
}

/// One field in a field-list export (no segments; the dotted path is the key).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldListEntry {
    pub path: String,
    pub encoded_as: String,
    pub decoded_as: String,
    pub value: String,
}

impl FieldListEntry {
    fn from_display(field: &DisplayField) -> Self {
        Self {
            path: field.display_name.clone(),
            encoded_as: field.inner.encoded_as.clone(),
            decoded_as: field.inner.decoded_as.clone(),
            value: field.inner.value.clone(),
        }
    }
}

/// Fetch every entity of `view` at `tick` with its full, freshly sorted field
/// list. `None` when the engine has no data for the tick.
pub fn collect_entity_list(
    engine: &dyn ReplayEngine,
    tick: u32,
    view: EntityView,
) -> Option<EntityListExport> {
    let entities = engine.view_entities(tick, view)?;

    let mut out = Vec::with_capacity(entities.len());
    for entity in entities {
        let records = engine
            .view_entity_fields(tick, view, entity.index)
            .map(<[_]>::to_vec)
            .unwrap_or_default();
        let fields = build_display_fields(records)
            .iter()
            .map(|f| ExportedField {
                path: f.display_name.clone(),
                path_segments: f.inner.path.clone(),
                encoded_as: f.inner.encoded_as.clone(),
                decoded_as: f.inner.decoded_as.clone(),
                value: f.inner.value.clone(),
            })
            .collect();
        out.push(ExportedEntity {
            index: entity.index,
            name: entity.name.clone(),
            fields,
        });
    }

    Some(EntityListExport {
        tick,
        view: view.tag(),
        entities: out,
    })
}

pub fn entity_list_to_text(export: &EntityListExport) -> String {
    let mut out = String::new();
    writeln!(out, "view: {}", export.view).ok();
    writeln!(out, "tick: {}", export.tick).ok();
    out.push('\n');

    for entity in &export.entities {
        writeln!(out, "entity {}: {}", entity.index, entity.name).ok();
        if entity.fields.is_empty() {
            writeln!(out, "  {}", statics::EN_MARK_NO_FIELDS).ok();
        } else {
            for field in &entity.fields {
                writeln!(out, "  {}: {}", field.path, field.value).ok();
            }
        }
        out.push('\n');
    }

    out
}

pub fn entity_list_to_json(export: &EntityListExport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(export)
}

/// One `<dotted-path>: <value>` line per field, in the order given.
pub fn field_list_to_text<'a>(fields: impl IntoIterator<Item = &'a DisplayField>) -> String {
    let mut out = String::new();
    for field in fields {
        writeln!(out, "{}: {}", field.display_name, field.inner.value).ok();
    }
    out
}

pub fn field_list_to_json<'a>(
    fields: impl IntoIterator<Item = &'a DisplayField>,
) -> serde_json::Result<String> {
    let entries: Vec<FieldListEntry> = fields
        .into_iter()
        .map(FieldListEntry::from_display)
        .collect();
    serde_json::to_string_pretty(&entries)
}

/// Replace every run of characters outside `[a-zA-Z0-9-_]` with one `_`,
/// collapse repeated underscores, trim leading/trailing underscores.
pub fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' {
            out.push(ch);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

pub fn entity_list_file_name(view: EntityView, ext: &str) -> String {
    format!("{}.{ext}", view.tag())
}

pub fn field_list_file_name(view: EntityView, index: u32, name: &str, ext: &str) -> String {
    let clean = sanitize_name(name);
    if clean.is_empty() {
        format!("{}-entity-{index}-fields.{ext}", view.tag())
    } else {
        format!("{}-entity-{index}-{clean}-fields.{ext}", view.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EntityRecord, FieldRecord};
    use crate::fields::DisplayField;

    struct TwoEntityEngine {
        ticks: Vec<u32>,
        entities: Vec<EntityRecord>,
        fields_of_1: Vec<FieldRecord>,
    }

    impl ReplayEngine for TwoEntityEngine {
        fn ticks(&self) -> &[u32] {
            &self.ticks
        }
        fn entities(&self, tick: u32) -> Option<&[EntityRecord]> {
            (tick == 42).then_some(&self.entities)
        }
        fn baseline_entities(&self, _tick: u32) -> Option<&[EntityRecord]> {
            None
        }
        fn entity_fields(&self, tick: u32, entity: u32) -> Option<&[FieldRecord]> {
            (tick == 42 && entity == 1).then_some(&self.fields_of_1)
        }
        fn baseline_entity_fields(&self, _tick: u32, _entity: u32) -> Option<&[FieldRecord]> {
            None
        }
    }

    fn engine() -> TwoEntityEngine {
        TwoEntityEngine {
            ticks: vec![42],
            entities: vec![
                EntityRecord {
                    index: 0,
                    name: "A".to_string(),
                },
                EntityRecord {
                    index: 1,
                    name: "B".to_string(),
                },
            ],
            fields_of_1: vec![FieldRecord {
                path: vec![0],
                named_path: vec!["x".to_string()],
                encoded_as: "int32".to_string(),
                decoded_as: "int".to_string(),
                value: "5".to_string(),
            }],
        }
    }

    #[test]
    fn entity_list_text_has_header_and_per_entity_blocks() {
        let export = collect_entity_list(&engine(), 42, EntityView::Entities).unwrap();
        let text = entity_list_to_text(&export);
        assert_eq!(
            text,
            "view: entities\n\
             tick: 42\n\
             \n\
             entity 0: A\n  (no fields)\n\n\
             entity 1: B\n  x: 5\n\n"
        );
    }

    #[test]
    fn entity_list_json_covers_all_entities() {
        let export = collect_entity_list(&engine(), 42, EntityView::Entities).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&entity_list_to_json(&export).unwrap()).unwrap();

        assert_eq!(json["tick"], 42);
        assert_eq!(json["view"], "entities");
        assert_eq!(json["entities"].as_array().unwrap().len(), 2);
        assert_eq!(
            json["entities"][1]["fields"][0],
            serde_json::json!({
                "path": "x",
                "pathSegments": [0],
                "encodedAs": "int32",
                "decodedAs": "int",
                "value": "5"
            })
        );
    }

    #[test]
    fn field_list_json_matches_wire_shape() {
        let fields = vec![DisplayField::new(FieldRecord {
            path: vec![0],
            named_path: vec!["x".to_string()],
            encoded_as: "int32".to_string(),
            decoded_as: "int".to_string(),
            value: "5".to_string(),
        })];
        let json: serde_json::Value =
            serde_json::from_str(&field_list_to_json(&fields).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "path": "x", "encodedAs": "int32", "decodedAs": "int", "value": "5" }
            ])
        );
    }

    #[test]
    fn field_list_text_is_one_line_per_field() {
        let fields = vec![
            DisplayField::new(FieldRecord {
                path: vec![0],
                named_path: vec!["a".to_string(), "b".to_string()],
                encoded_as: "int32".to_string(),
                decoded_as: "int".to_string(),
                value: "1".to_string(),
            }),
            DisplayField::new(FieldRecord {
                path: vec![1],
                named_path: vec!["c".to_string()],
                encoded_as: "float32".to_string(),
                decoded_as: "float".to_string(),
                value: "2.5".to_string(),
            }),
        ];
        assert_eq!(field_list_to_text(&fields), "a.b: 1\nc: 2.5\n");
    }

    #[test]
    fn absent_tick_yields_no_export() {
        assert!(collect_entity_list(&engine(), 7, EntityView::Entities).is_none());
    }

    #[test]
    fn sanitize_collapses_runs_and_trims() {
        assert_eq!(sanitize_name("npc_dota_hero"), "npc_dota_hero");
        assert_eq!(sanitize_name("CWorld ( #1 )"), "CWorld_1");
        assert_eq!(sanitize_name("++weird++name++"), "weird_name");
        assert_eq!(sanitize_name("___"), "");
        assert_eq!(sanitize_name("a--b"), "a--b");
    }

    #[test]
    fn file_names_are_deterministic() {
        assert_eq!(
            entity_list_file_name(EntityView::Entities, statics::EXT_JSON),
            "entities.json"
        );
        assert_eq!(
            entity_list_file_name(EntityView::BaselineEntities, statics::EXT_TEXT),
            "baseline-entities.txt"
        );
        assert_eq!(
            field_list_file_name(EntityView::Entities, 7, "Hero (Axe)", statics::EXT_TEXT),
            "entities-entity-7-Hero_Axe-fields.txt"
        );
        assert_eq!(
            field_list_file_name(EntityView::Entities, 7, "???", statics::EXT_JSON),
            "entities-entity-7-fields.json"
        );
    }
}
