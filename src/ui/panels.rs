use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::columns;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter controls
// ---------------------------------------------------------------------------

/// What the user did to a multi-select this frame.
enum FilterAction {
    None,
    Toggle(String),
    Clear,
}

/// Render the left filter panel: department and gender multi-selects plus
/// the experience-years range.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.add_space(4.0);
    ui.heading("Dashboard Controls");
    ui.separator();

    // Clone the option sets so we can mutate state below.
    let (departments, genders) = match &state.dataset {
        Some(ds) => (
            ds.unique_categories(columns::DEPARTMENT),
            ds.unique_categories(columns::GENDER),
        ),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            match category_filter(ui, "Department", &departments, &state.selection.departments) {
                FilterAction::Toggle(value) => state.toggle_department(&value),
                FilterAction::Clear => state.clear_departments(),
                FilterAction::None => {}
            }
            ui.separator();
            match category_filter(ui, "Gender", &genders, &state.selection.genders) {
                FilterAction::Toggle(value) => state.toggle_gender(&value),
                FilterAction::Clear => state.clear_genders(),
                FilterAction::None => {}
            }
            ui.separator();
            experience_controls(ui, state);
        });
}

/// One multi-select filter. An empty selection means "no restriction", so
/// the header shows the full count when nothing is ticked.
fn category_filter(
    ui: &mut Ui,
    title: &str,
    values: &BTreeSet<String>,
    selected: &BTreeSet<String>,
) -> FilterAction {
    let n_selected = if selected.is_empty() {
        values.len()
    } else {
        selected.len()
    };
    let header_text = format!("{title}  ({n_selected}/{})", values.len());
    let mut action = FilterAction::None;

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("Clear").clicked() {
                    action = FilterAction::Clear;
                }
                ui.label(RichText::new("empty = all").small().weak());
            });
            for value in values {
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, value).changed() {
                    action = FilterAction::Toggle(value.clone());
                }
            }
        });

    action
}

fn experience_controls(ui: &mut Ui, state: &mut AppState) {
    let (min_exp, max_exp) = state.experience_bounds;
    let (mut lo, mut hi) = state.selection.experience;

    ui.strong("Years of Experience");
    let changed_lo = ui
        .add(egui::Slider::new(&mut lo, min_exp..=max_exp).text("from"))
        .changed();
    let changed_hi = ui
        .add(egui::Slider::new(&mut hi, min_exp..=max_exp).text("to"))
        .changed();
    if changed_lo || changed_hi {
        state.set_experience(lo, hi);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(view)) = (&state.dataset, state.view()) {
            ui.label(format!(
                "{} employees loaded, {} match the filters",
                ds.len(),
                view.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open corporate stress dataset")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_path(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} employee records from {}",
                    dataset.len(),
                    path.display()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                // Keep the previous dataset; only surface the message.
                log::error!("Failed to load file: {e}");
                state.status_message = Some(format!("Error: {e}"));
                state.loading = false;
            }
        }
    }
}
