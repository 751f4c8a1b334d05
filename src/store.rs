use crate::engine::EntityView;

/// Shared cross-pipeline state: current tick, view mode, and selected entity.
/// All mutation goes through the transition methods below; each bumps
/// `revision`, which derived pipelines use as a memoization key instead of
/// implicit dependency tracking. Single writer, single UI thread.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectorStore {
    tick: Option<u32>,
    view: EntityView,
    selected_entity: Option<u32>,
    revision: u64,
}

impl InspectorStore {
    pub fn tick(&self) -> Option<u32> {
        self.tick
    }

    pub fn view(&self) -> EntityView {
        self.view
    }

    pub fn selected_entity(&self) -> Option<u32> {
        self.selected_entity
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_tick(&mut self, tick: Option<u32>) {
        if self.tick != tick {
            self.tick = tick;
            self.revision += 1;
        }
    }

    pub fn set_view(&mut self, view: EntityView) {
        if self.view != view {
            self.view = view;
            self.revision += 1;
        }
    }

    /// Entity selection toggles: picking the already-selected entity clears
    /// it, anything else becomes the sole selection.
    pub fn toggle_entity(&mut self, entity: u32) {
        self.selected_entity = if self.selected_entity == Some(entity) {
            None
        } else {
            Some(entity)
        };
        self.revision += 1;
    }

    pub fn clear_entity(&mut self) {
        if self.selected_entity.is_some() {
            self.selected_entity = None;
            self.revision += 1;
        }
    }
}
