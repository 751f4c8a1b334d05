use crate::engine::{EntityRecord, EntityView, ReplayEngine};
use crate::export;
use crate::fields::{DisplayField, build_display_fields};
use crate::filter::{DeferredFilter, NamePredicate, StepOutcome};
use crate::select::{ClickMode, FieldSelection};
use crate::snapshot::LoadedSnapshot;
use crate::statics;
use crate::store::InspectorStore;
use crate::window;
use eframe::egui;
use std::{path::PathBuf, rc::Rc, time::Duration};

pub fn run_gui() -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 900.0]),
        ..Default::default()
    };
    let title = format!("{} {}", statics::EN_APP_TITLE, env!("CARGO_PKG_VERSION"));
    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| {
            Ok(Box::new(ReiApp {
                theme_dark: true,
                ..Default::default()
            }))
        }),
    )
}

/// Case-insensitive substring match over a display name; `None` when the
/// query is blank (search cleared).
fn name_predicate(query: &str) -> Option<NamePredicate> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    Some(Rc::new(move |name: &str| {
        name.to_lowercase().contains(&needle)
    }))
}

/// A search box whose predicate is handed to the filter stage only after the
/// input has been quiet for `debounce` seconds.
struct SearchBox {
    text: String,
    committed: String,
    edited_at: Option<f64>,
    debounce: f64,
}

impl SearchBox {
    fn new(debounce: f64) -> Self {
        Self {
            text: String::new(),
            committed: String::new(),
            edited_at: None,
            debounce,
        }
    }

    fn ui(&mut self, ui: &mut egui::Ui, hint: &str) {
        let now = ui.input(|i| i.time);
        ui.horizontal(|ui| {
            let resp = ui.add(
                egui::TextEdit::singleline(&mut self.text)
                    .hint_text(hint)
                    .desired_width(ui.available_width() - 28.0),
            );
            if resp.changed() {
                self.edited_at = Some(now);
            }
            if ui.small_button(statics::EN_BTN_CLEAR).clicked() {
                self.text.clear();
                // Clearing should take effect immediately, not after debounce.
                self.edited_at = Some(f64::NEG_INFINITY);
            }
        });
    }

    /// The predicate to submit, once the debounce window has elapsed.
    fn poll(&mut self, now: f64) -> Option<Option<NamePredicate>> {
        let edited = self.edited_at?;
        if now - edited < self.debounce {
            return None;
        }
        self.edited_at = None;
        if self.text == self.committed {
            return None;
        }
        self.committed = self.text.clone();
        Some(name_predicate(&self.text))
    }

    fn is_waiting(&self) -> bool {
        self.edited_at.is_some()
    }

    /// Whether a non-blank query is currently committed.
    fn has_active_query(&self) -> bool {
        !self.committed.trim().is_empty()
    }

    fn reset(&mut self) {
        self.text.clear();
        self.committed.clear();
        self.edited_at = None;
    }
}

/// The main application state and GUI logic. Owns the loaded snapshot, the
/// shared inspector store, and both filter pipelines.
struct ReiApp {
    snapshot: Option<LoadedSnapshot>,
    dialog_dir: Option<PathBuf>,

    store: InspectorStore,
    tick_slot: usize,

    entity_filter: DeferredFilter<EntityRecord>,
    field_filter: DeferredFilter<DisplayField>,
    entity_search: SearchBox,
    field_search: SearchBox,
    selection: FieldSelection,

    // Memoization keys for the source+normalize stages.
    entities_key: Option<(u32, EntityView)>,
    fields_key: Option<(u32, EntityView, u32)>,
    // Context whose change resets the field selection (entity or view).
    selection_context: Option<(EntityView, u32)>,
    // Selected entity has no field list at the current tick.
    fields_absent: bool,

    show_index: bool,
    show_path: bool,
    show_types: bool,

    status: String,
    last_error: Option<String>,
    about_open: bool,
    theme_dark: bool,
}

impl Default for ReiApp {
    fn default() -> Self {
        Self {
            snapshot: None,
            dialog_dir: None,
            store: InspectorStore::default(),
            tick_slot: 0,
            entity_filter: DeferredFilter::new(|e: &EntityRecord| e.name.as_str()),
            field_filter: DeferredFilter::new(|f: &DisplayField| f.display_name.as_str()),
            entity_search: SearchBox::new(statics::ENTITY_FILTER_DEBOUNCE),
            field_search: SearchBox::new(statics::FIELD_FILTER_DEBOUNCE),
            selection: FieldSelection::default(),
            entities_key: None,
            fields_key: None,
            selection_context: None,
            fields_absent: false,
            show_index: false,
            show_path: false,
            show_types: true,
            status: String::new(),
            last_error: None,
            about_open: false,
            theme_dark: true,
        }
    }
}

impl ReiApp {
    fn file_dialog(&self) -> rfd::FileDialog {
        let mut dialog = rfd::FileDialog::new();
        if let Some(dir) = &self.dialog_dir {
            dialog = dialog.set_directory(dir);
        }
        dialog
    }

    fn open_file(&mut self) {
        let Some(path) = self
            .file_dialog()
            .add_filter("Snapshot dump", &["json", "gz"])
            .pick_file()
        else {
            return;
        };
        self.dialog_dir = path.parent().map(PathBuf::from);

        match LoadedSnapshot::load_path(&path) {
            Ok(snapshot) => {
                let first_tick = snapshot.ticks().first().copied();
                self.snapshot = Some(snapshot);
                self.store = InspectorStore::default();
                self.store.set_tick(first_tick);
                self.tick_slot = 0;
                self.entity_filter = DeferredFilter::new(|e: &EntityRecord| e.name.as_str());
                self.field_filter = DeferredFilter::new(|f: &DisplayField| f.display_name.as_str());
                self.entity_search.reset();
                self.field_search.reset();
                self.selection.reset();
                self.entities_key = None;
                self.fields_key = None;
                self.selection_context = None;
                self.fields_absent = false;
                self.status = format!("Loaded {}", path.display());
                self.last_error = None;
            }
            Err(err) => {
                self.last_error = Some(format!("{} {err:#}", statics::EN_ERR_PREFIX_OPEN));
            }
        }
    }

    /// Re-pull the source stages when the store's (tick, view, entity) tuple
    /// moved past the memoized keys. Pure data work; no rendering.
    fn refresh_pipelines(&mut self) {
        let Some(snapshot) = &self.snapshot else {
            return;
        };
        let Some(tick) = self.store.tick() else {
            return;
        };
        let view = self.store.view();

        let entities_key = (tick, view);
        if self.entities_key != Some(entities_key) {
            let entities = snapshot
                .view_entities(tick, view)
                .map(<[_]>::to_vec)
                .unwrap_or_default();
            self.entity_filter.set_items(entities);
            self.entities_key = Some(entities_key);
        }

        match self.store.selected_entity() {
            None => {
                if self.selection_context.is_some() {
                    self.selection.reset();
                    self.selection_context = None;
                }
                if self.fields_key.is_some() {
                    self.field_filter.set_items(Vec::new());
                    self.fields_key = None;
                    self.fields_absent = false;
                }
            }
            Some(entity) => {
                let context = (view, entity);
                if self.selection_context != Some(context) {
                    self.selection.reset();
                    self.selection_context = Some(context);
                }

                let fields_key = (tick, view, entity);
                if self.fields_key != Some(fields_key) {
                    match snapshot.view_entity_fields(tick, view, entity) {
                        Some(records) => {
                            self.field_filter
                                .set_items(build_display_fields(records.to_vec()));
                            self.fields_absent = false;
                        }
                        None => {
                            self.field_filter.set_items(Vec::new());
                            self.fields_absent = true;
                        }
                    }
                    self.fields_key = Some(fields_key);
                    self.prune_selection();
                }
            }
        }
    }

    /// Drop selection members absent from the current filtered field list.
    fn prune_selection(&mut self) {
        let filter = &self.field_filter;
        let row_count = filter.filtered().len();
        self.selection.prune(row_count, |name| {
            filter
                .filtered()
                .iter()
                .any(|&i| filter.items()[i].display_name == name)
        });
    }

    /// Low-priority work: debounce expiry and chunked filter scans. Returns
    /// whether another frame should be scheduled.
    fn pump_filters(&mut self, now: f64) -> bool {
        if let Some(predicate) = self.entity_search.poll(now) {
            self.entity_filter.submit(predicate);
        }
        if let Some(predicate) = self.field_search.poll(now) {
            if self.field_filter.submit(predicate) {
                self.prune_selection();
            }
        }

        self.entity_filter.step(statics::FILTER_STEP_BUDGET);
        if self.field_filter.step(statics::FILTER_STEP_BUDGET) == StepOutcome::Committed {
            self.prune_selection();
        }

        self.entity_filter.is_pending() || self.field_filter.is_pending()
    }

    fn selected_entity_name(&self) -> String {
        let Some(index) = self.store.selected_entity() else {
            return String::new();
        };
        self.entity_filter
            .items()
            .iter()
            .find(|e| e.index == index)
            .map(|e| e.name.clone())
            .unwrap_or_default()
    }

    fn save_export(&mut self, suggested: &str, contents: &str) {
        let Some(path) = self.file_dialog().set_file_name(suggested).save_file() else {
            return;
        };
        self.dialog_dir = path.parent().map(PathBuf::from);
        match std::fs::write(&path, contents.as_bytes()) {
            Ok(()) => {
                self.status = format!("{} {}", statics::EN_STATUS_EXPORTED, path.display());
                self.last_error = None;
            }
            Err(err) => {
                self.last_error = Some(format!("{} {err}", statics::EN_ERR_PREFIX_EXPORT));
            }
        }
    }

    fn export_entity_list(&mut self, as_json: bool) {
        let Some(snapshot) = &self.snapshot else {
            return;
        };
        let Some(tick) = self.store.tick() else {
            return;
        };
        let view = self.store.view();
        let Some(export) = export::collect_entity_list(snapshot, tick, view) else {
            return;
        };

        let (contents, ext) = if as_json {
            match export::entity_list_to_json(&export) {
                Ok(json) => (json, statics::EXT_JSON),
                Err(err) => {
                    self.last_error = Some(format!("{} {err}", statics::EN_ERR_PREFIX_EXPORT));
                    return;
                }
            }
        } else {
            (export::entity_list_to_text(&export), statics::EXT_TEXT)
        };

        let name = export::entity_list_file_name(view, ext);
        self.save_export(&name, &contents);
    }

    /// The selected fields in click order, else every row passing the filter
    /// in display order.
    fn exportable_fields(&self) -> Vec<&DisplayField> {
        if self.selection.is_empty() {
            return self
                .field_filter
                .filtered()
                .iter()
                .map(|&i| &self.field_filter.items()[i])
                .collect();
        }
        self.selection
            .names()
            .filter_map(|name| {
                self.field_filter
                    .items()
                    .iter()
                    .find(|f| f.display_name == name)
            })
            .collect()
    }

    fn export_field_list(&mut self, as_json: bool) {
        let fields = self.exportable_fields();
        if fields.is_empty() {
            return;
        }

        let (contents, ext) = if as_json {
            match export::field_list_to_json(fields.iter().copied()) {
                Ok(json) => (json, statics::EXT_JSON),
                Err(err) => {
                    self.last_error = Some(format!("{} {err}", statics::EN_ERR_PREFIX_EXPORT));
                    return;
                }
            }
        } else {
            (
                export::field_list_to_text(fields.iter().copied()),
                statics::EXT_TEXT,
            )
        };

        let view = self.store.view();
        let index = self.store.selected_entity().unwrap_or_default();
        let entity_name = self.selected_entity_name();
        let name = export::field_list_file_name(view, index, &entity_name, ext);
        self.save_export(&name, &contents);
    }

    fn render_tick_controls(&mut self, ui: &mut egui::Ui) {
        let Some(snapshot) = &self.snapshot else {
            return;
        };
        let ticks = snapshot.ticks().to_vec();
        if ticks.is_empty() {
            ui.label(statics::EN_NO_TICKS);
            return;
        }

        ui.horizontal(|ui| {
            let mut view = self.store.view();
            ui.selectable_value(&mut view, EntityView::Entities, statics::EN_VIEW_ENTITIES);
            ui.selectable_value(
                &mut view,
                EntityView::BaselineEntities,
                statics::EN_VIEW_BASELINES,
            );
            self.store.set_view(view);

            ui.separator();
            ui.label(statics::EN_LABEL_TICK);
            self.tick_slot = self.tick_slot.min(ticks.len() - 1);
            let slider = egui::Slider::new(&mut self.tick_slot, 0..=ticks.len() - 1).show_value(false);
            ui.add(slider);
            ui.monospace(ticks[self.tick_slot].to_string());
            self.store.set_tick(Some(ticks[self.tick_slot]));
        });
    }

    fn render_entities_panel(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(statics::EN_HEADING_ENTITIES);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let eligible = !self.entity_filter.items().is_empty();
                let json = ui
                    .add_enabled(eligible, egui::Button::new(statics::EN_BTN_EXPORT_JSON))
                    .on_hover_text(statics::EN_TOOLTIP_EXPORT_ENTITIES);
                let text = ui
                    .add_enabled(eligible, egui::Button::new(statics::EN_BTN_EXPORT_TEXT))
                    .on_hover_text(statics::EN_TOOLTIP_EXPORT_ENTITIES);
                if json.clicked() {
                    self.export_entity_list(true);
                }
                if text.clicked() {
                    self.export_entity_list(false);
                }
            });
        });
        self.entity_search.ui(ui, statics::EN_HINT_SEARCH_ENTITIES);
        ui.separator();

        let count = self.entity_filter.filtered().len();
        if count == 0 {
            if self.entity_search.has_active_query() {
                ui.label(statics::EN_NO_MATCHES);
            }
            return;
        }

        let row_h = ui.text_style_height(&egui::TextStyle::Body) + 4.0;
        let mut clicked_entity: Option<u32> = None;

        ui.push_id("entities_scroll", |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show_viewport(ui, |ui, viewport| {
                    let win = window::row_window(viewport.min.y, viewport.height(), count, row_h);
                    ui.set_height(win.total_height);
                    let left = ui.min_rect().left();
                    let top = ui.min_rect().top();
                    let width = ui.available_width();

                    for row in win.rows() {
                        let Some(entity) = self.entity_filter.get(row) else {
                            continue;
                        };
                        let rect = egui::Rect::from_min_size(
                            egui::pos2(left, top + win.offset_of(row)),
                            egui::vec2(width, row_h),
                        );
                        let selected = self.store.selected_entity() == Some(entity.index);
                        let label = format!("{}: {}", entity.index, entity.name);
                        let resp = ui.put(rect, egui::SelectableLabel::new(selected, label));
                        if resp.clicked() {
                            clicked_entity = Some(entity.index);
                        }
                    }
                });
        });

        if let Some(index) = clicked_entity {
            // Toggle: clicking the selected entity clears the selection.
            self.store.toggle_entity(index);
        }
    }

    fn field_row_text(&self, row: usize, field: &DisplayField) -> String {
        use std::fmt::Write as _;
        let mut text = String::new();
        if self.show_index {
            write!(text, "{row:>5}  ").ok();
        }
        if self.show_path {
            write!(text, "{:<14}", field.path_label()).ok();
        }
        write!(text, "{}: {}", field.display_name, field.inner.value).ok();
        if self.show_types {
            write!(
                text,
                "  [{} -> {}]",
                field.inner.encoded_as, field.inner.decoded_as
            )
            .ok();
        }
        text
    }

    fn render_fields_panel(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(statics::EN_HEADING_FIELDS);
            ui.checkbox(&mut self.show_index, statics::EN_CHECK_SHOW_INDEX);
            ui.checkbox(&mut self.show_path, statics::EN_CHECK_SHOW_PATH);
            ui.checkbox(&mut self.show_types, statics::EN_CHECK_SHOW_TYPES);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let eligible =
                    !self.selection.is_empty() || !self.field_filter.filtered().is_empty();
                let json = ui
                    .add_enabled(eligible, egui::Button::new(statics::EN_BTN_EXPORT_JSON))
                    .on_hover_text(statics::EN_TOOLTIP_EXPORT_FIELDS);
                let text = ui
                    .add_enabled(eligible, egui::Button::new(statics::EN_BTN_EXPORT_TEXT))
                    .on_hover_text(statics::EN_TOOLTIP_EXPORT_FIELDS);
                if json.clicked() {
                    self.export_field_list(true);
                }
                if text.clicked() {
                    self.export_field_list(false);
                }
            });
        });
        self.field_search.ui(ui, statics::EN_HINT_SEARCH_FIELDS);
        ui.separator();

        // Distinct guidance states; absence of engine data is never an error.
        if self.store.selected_entity().is_none() {
            ui.label(statics::EN_SELECT_ENTITY);
            return;
        }
        if self.fields_absent {
            ui.label(statics::EN_ENTITY_NOT_PRESENT);
            return;
        }

        let count = self.field_filter.filtered().len();
        if count == 0 {
            if self.field_search.has_active_query() {
                ui.label(statics::EN_NO_MATCHES);
            }
            return;
        }

        let tick = self.store.tick();
        let view = self.store.view();
        let row_h = ui.text_style_height(&egui::TextStyle::Body) + 4.0;
        let mut clicked_field: Option<(usize, ClickMode)> = None;

        ui.push_id("fields_scroll", |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show_viewport(ui, |ui, viewport| {
                    let win = window::row_window(viewport.min.y, viewport.height(), count, row_h);
                    ui.set_height(win.total_height);
                    let left = ui.min_rect().left();
                    let top = ui.min_rect().top();
                    let width = ui.available_width();
                    let mods = ui.input(|i| i.modifiers);

                    for row in win.rows() {
                        let Some(field) = self.field_filter.get(row) else {
                            continue;
                        };
                        let rect = egui::Rect::from_min_size(
                            egui::pos2(left, top + win.offset_of(row)),
                            egui::vec2(width, row_h),
                        );

                        let mut row_text = self.field_row_text(row, field);
                        let mut handle_valid = false;
                        if field.inner.is_handle() {
                            handle_valid = match (&self.snapshot, tick, field.inner.handle_value())
                            {
                                (Some(snapshot), Some(tick), Some(handle)) => {
                                    snapshot.handle_valid(tick, view, handle)
                                }
                                _ => false,
                            };
                            if !handle_valid {
                                row_text.push_str("  (");
                                row_text.push_str(statics::EN_BADGE_INVALID_HANDLE);
                                row_text.push(')');
                            }
                        }
                        let mut text = egui::RichText::new(row_text).monospace();
                        if field.inner.is_handle() {
                            if handle_valid {
                                text = text.color(ui.visuals().hyperlink_color);
                            } else {
                                text = text.weak();
                            }
                        }

                        let selected = self.selection.contains(&field.display_name);
                        let resp = ui.put(rect, egui::SelectableLabel::new(selected, text));
                        if resp.clicked() {
                            let mode = if mods.shift {
                                ClickMode::Range
                            } else if mods.command {
                                ClickMode::Toggle
                            } else {
                                ClickMode::Plain
                            };
                            clicked_field = Some((row, mode));
                        }
                    }
                });
        });

        if let Some((row, mode)) = clicked_field {
            self.apply_field_click(row, mode);
        }
    }

    fn apply_field_click(&mut self, row: usize, mode: ClickMode) {
        {
            let filter = &self.field_filter;
            self.selection.click(row, mode, |r| {
                filter
                    .get(r)
                    .map(|f| f.display_name.clone())
                    .unwrap_or_default()
            });
        }

        // Handle navigation: a plain click on a valid handle toggles the
        // shared selected entity, even when the row selection was unchanged.
        if mode != ClickMode::Plain {
            return;
        }
        let target = {
            let (Some(snapshot), Some(tick)) = (&self.snapshot, self.store.tick()) else {
                return;
            };
            let Some(field) = self.field_filter.get(row) else {
                return;
            };
            if !field.inner.is_handle() {
                return;
            }
            let Some(handle) = field.inner.handle_value() else {
                return;
            };
            let view = self.store.view();
            if !snapshot.handle_valid(tick, view, handle) {
                return;
            }
            snapshot.handle_target(handle)
        };
        self.store.toggle_entity(target);
    }

    fn render_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let file_label = self
                .snapshot
                .as_ref()
                .and_then(|s| s.source_path.as_ref())
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| statics::EN_STATUS_NO_FILE.to_string());
            ui.label(file_label);
            if let Some(source) = self.snapshot.as_ref().and_then(|s| s.source_label()) {
                ui.separator();
                ui.label(source);
            }
            ui.separator();
            let tick_count = self.snapshot.as_ref().map(|s| s.ticks().len()).unwrap_or(0);
            ui.label(format!("{} {}", statics::EN_LABEL_TICKS_COUNT, tick_count));
            ui.separator();
            ui.label(format!(
                "{}: {}/{}",
                self.store.view().label(),
                self.entity_filter.filtered().len(),
                self.entity_filter.items().len()
            ));
            if !self.selection.is_empty() {
                ui.separator();
                ui.label(format!(
                    "{} {}",
                    statics::EN_LABEL_SELECTED_COUNT,
                    self.selection.len()
                ));
            }
            if !self.status.is_empty() {
                ui.separator();
                ui.label(&self.status);
            }
        });
    }
}

impl eframe::App for ReiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                if ui.button(statics::EN_BTN_OPEN).clicked() {
                    self.open_file();
                }
                if ui.button(statics::EN_BTN_ABOUT).clicked() {
                    self.about_open = true;
                }
                if ui.button(statics::EN_BTN_TOGGLE_THEME).clicked() {
                    self.theme_dark = !self.theme_dark;
                    if self.theme_dark {
                        ctx.set_visuals(egui::Visuals::dark());
                    } else {
                        ctx.set_visuals(egui::Visuals::light());
                    }
                }
                ui.separator();
                self.render_tick_controls(ui);
            });
        });

        if self.about_open {
            let mut open = self.about_open;
            egui::Window::new(statics::EN_WINDOW_ABOUT)
                .collapsible(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.heading(statics::EN_ABOUT_HEADING);
                    ui.label(format!(
                        "{} {}",
                        statics::EN_ABOUT_VERSION,
                        env!("CARGO_PKG_VERSION")
                    ));
                    ui.separator();
                    ui.label(statics::EN_ABOUT_BODY);
                    ui.label(statics::EN_ABOUT_HINT_MODIFIERS);
                    ui.label(statics::EN_ABOUT_HINT_HANDLES);
                });
            self.about_open = open;
        }

        if let Some(err) = self.last_error.clone() {
            egui::TopBottomPanel::top("error_bar").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::RED, err);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button(statics::EN_BTN_CLEAR).clicked() {
                            self.last_error = None;
                        }
                    });
                });
            });
        }

        if self.snapshot.is_none() {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading(statics::EN_HOME_HEADING);
                ui.label(statics::EN_HOME_INSTRUCTIONS);
            });
            return;
        }

        // High-priority click handling happens inside the panels below within
        // this same frame; filter recomputation is chunked and deferrable.
        self.refresh_pipelines();
        let work_pending = self.pump_filters(now);

        egui::TopBottomPanel::bottom("bottom_status").show(ctx, |ui| {
            self.render_status_bar(ui);
        });

        egui::SidePanel::left("entities_panel")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| {
                self.render_entities_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_fields_panel(ui);
        });

        // Click-driven store transitions must be visible next frame; pending
        // scans and waiting debounces keep the loop ticking.
        if work_pending {
            ctx.request_repaint();
        } else if self.entity_search.is_waiting() || self.field_search.is_waiting() {
            ctx.request_repaint_after(Duration::from_millis(25));
        }
    }
}
