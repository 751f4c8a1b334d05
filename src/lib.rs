//! Core library for the Replay Entity Inspector (REI).
//! Provides the list-interaction engine (normalization/sorting, deferred
//! filtering, multi-mode selection, handle navigation, virtual windowing,
//! export materialization) plus the snapshot-dump loader and the egui shell.

pub mod engine;
pub mod export;
pub mod fields;
pub mod filter;
mod gui;
pub mod select;
pub mod snapshot;
pub mod statics;
pub mod store;
pub mod window;

pub use engine::{EntityRecord, EntityView, FieldRecord, ReplayEngine};
pub use fields::DisplayField;
pub use gui::run_gui;
pub use snapshot::{LoadedSnapshot, SnapshotError, SnapshotFile, SnapshotFormat};
