use crate::statics;
use serde::{Deserialize, Serialize};

/// Which entity snapshot a pipeline reads: the live per-tick state or the
/// baseline (reference/default) state recorded alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntityView {
    #[default]
    Entities,
    BaselineEntities,
}

impl EntityView {
    pub fn label(self) -> &'static str {
        match self {
            EntityView::Entities => statics::EN_VIEW_ENTITIES,
            EntityView::BaselineEntities => statics::EN_VIEW_BASELINES,
        }
    }

    /// Stable machine-readable tag, used in export headers and file names.
    pub fn tag(self) -> &'static str {
        match self {
            EntityView::Entities => "entities",
            EntityView::BaselineEntities => "baseline-entities",
        }
    }
}

/// One entity as reported by the decoding engine for a tick.
/// Read-only snapshot; engine-provided order is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub index: u32,
    pub name: String,
}

/// One typed field of an entity at a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRecord {
    /// Schema positions from root to leaf.
    pub path: Vec<u32>,
    /// Human labels, same length as `path`.
    pub named_path: Vec<String>,
    /// Wire representation tag, e.g. "int32" or "CHandle< CBaseEntity >".
    pub encoded_as: String,
    /// Logical type tag.
    pub decoded_as: String,
    /// Rendered value.
    pub value: String,
}

impl FieldRecord {
    /// Whether the wire tag denotes an entity handle. Unknown tags are plain
    /// fields, never an error.
    pub fn is_handle(&self) -> bool {
        self.encoded_as.starts_with(statics::EH_ENCODED_PREFIX)
    }

    /// The raw handle word, when the rendered value parses as one.
    pub fn handle_value(&self) -> Option<u32> {
        self.value.trim().parse().ok()
    }
}

/// Read-only access to the decoded replay, keyed by tick. The inspector
/// never parses or validates entity data itself; it only organizes, filters,
/// selects, and re-exports what this interface hands it.
pub trait ReplayEngine {
    /// Available tick values, in file order.
    fn ticks(&self) -> &[u32];

    /// Entities present at `tick`, or `None` when the tick is unknown.
    fn entities(&self, tick: u32) -> Option<&[EntityRecord]>;

    fn baseline_entities(&self, tick: u32) -> Option<&[EntityRecord]>;

    /// Fields of one entity at `tick`. `None` when the tick is unknown or the
    /// entity is not present at that tick.
    fn entity_fields(&self, tick: u32, entity: u32) -> Option<&[FieldRecord]>;

    fn baseline_entity_fields(&self, tick: u32, entity: u32) -> Option<&[FieldRecord]>;

    fn view_entities(&self, tick: u32, view: EntityView) -> Option<&[EntityRecord]> {
        match view {
            EntityView::Entities => self.entities(tick),
            EntityView::BaselineEntities => self.baseline_entities(tick),
        }
    }

    fn view_entity_fields(&self, tick: u32, view: EntityView, entity: u32) -> Option<&[FieldRecord]> {
        match view {
            EntityView::Entities => self.entity_fields(tick, entity),
            EntityView::BaselineEntities => self.baseline_entity_fields(tick, entity),
        }
    }

    /// Entity index a handle word points at.
    fn handle_target(&self, handle: u32) -> u32 {
        handle & statics::EH_INDEX_MASK
    }

    /// A handle is valid when it is not the "no entity" word and its target
    /// index exists in the given view at `tick`.
    fn handle_valid(&self, tick: u32, view: EntityView, handle: u32) -> bool {
        if handle == statics::EH_INVALID {
            return false;
        }
        let target = self.handle_target(handle);
        self.view_entities(tick, view)
            .is_some_and(|ents| ents.iter().any(|e| e.index == target))
    }
}
