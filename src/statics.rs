// Central place for UI strings and other non-localized constants.
// Keep these out of gui.rs to reduce duplication and make tweaks safer.

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "REI: Replay Entity Inspector";

pub const EN_BTN_OPEN: &str = "Open...";
pub const EN_BTN_ABOUT: &str = "About";
pub const EN_BTN_TOGGLE_THEME: &str = "Theme";
pub const EN_BTN_CLEAR: &str = "x";

pub const EN_WINDOW_ABOUT: &str = "About";
pub const EN_ABOUT_HEADING: &str = "REI: Replay Entity Inspector";
pub const EN_ABOUT_VERSION: &str = "Version:";
pub const EN_ABOUT_BODY: &str =
    "Inspects per-entity field snapshots dumped from a replay/demo file.";
pub const EN_ABOUT_HINT_MODIFIERS: &str =
    "- Ctrl/Cmd+click toggles a field, Shift+click selects a range";
pub const EN_ABOUT_HINT_HANDLES: &str =
    "- Clicking a valid handle field jumps to the referenced entity";

pub const EN_HOME_HEADING: &str = "REI: Replay Entity Inspector";
pub const EN_HOME_INSTRUCTIONS: &str = "Open a snapshot dump (.json/.json.gz) to begin.";

pub const EN_HEADING_ENTITIES: &str = "Entities";
pub const EN_HEADING_FIELDS: &str = "Fields";

pub const EN_VIEW_ENTITIES: &str = "Entities";
pub const EN_VIEW_BASELINES: &str = "Baselines";
pub const EN_LABEL_TICK: &str = "Tick:";
pub const EN_NO_TICKS: &str = "Snapshot contains no ticks.";

pub const EN_HINT_SEARCH_ENTITIES: &str = "filter by name";
pub const EN_HINT_SEARCH_FIELDS: &str = "filter by path";
pub const EN_NO_MATCHES: &str = "No matches.";

pub const EN_SELECT_ENTITY: &str = "Select an entity.";
pub const EN_ENTITY_NOT_PRESENT: &str = "Entity not present at this tick.";

pub const EN_BTN_EXPORT_TEXT: &str = "Text";
pub const EN_BTN_EXPORT_JSON: &str = "JSON";
pub const EN_TOOLTIP_EXPORT_ENTITIES: &str =
    "Exports every entity at this tick with its full field list (ignores the filter)";
pub const EN_TOOLTIP_EXPORT_FIELDS: &str =
    "Exports the selected fields, or every field passing the filter";

pub const EN_CHECK_SHOW_INDEX: &str = "#";
pub const EN_CHECK_SHOW_PATH: &str = "path";
pub const EN_CHECK_SHOW_TYPES: &str = "types";

pub const EN_BADGE_INVALID_HANDLE: &str = "invalid";
pub const EN_MARK_NO_FIELDS: &str = "(no fields)";

pub const EN_STATUS_NO_FILE: &str = "<no snapshot>";
pub const EN_LABEL_TICKS_COUNT: &str = "ticks:";
pub const EN_LABEL_SELECTED_COUNT: &str = "selected:";

pub const EN_ERR_PREFIX_OPEN: &str = "Open failed:";
pub const EN_ERR_PREFIX_EXPORT: &str = "Export failed:";
pub const EN_STATUS_EXPORTED: &str = "Exported";

// Entity handle encoding (Source-style CHandle wire tag).
pub const EH_ENCODED_PREFIX: &str = "CHandle";
// Serial+index word meaning "no entity".
pub const EH_INVALID: u32 = 0xFF_FFFF;
// Low bits of a handle word select the entity index.
pub const EH_INDEX_MASK: u32 = (1 << 14) - 1;

// Zero-padding width for one path element of a field sort key.
pub const SORT_KEY_PAD: usize = 4;

// Filter debounce (seconds). The field list is smaller-grained and reacts faster.
pub const ENTITY_FILTER_DEBOUNCE: f64 = 0.25;
pub const FIELD_FILTER_DEBOUNCE: f64 = 0.10;
// Rows scanned per frame by a pending filter recomputation.
pub const FILTER_STEP_BUDGET: usize = 8_192;

// Export file extensions.
pub const EXT_TEXT: &str = "txt";
pub const EXT_JSON: &str = "json";
