use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::{legend_color, KNOWN_LABELS};
use crate::data::timecode::to_text;
use crate::state::{AppState, IntervalForm};

// ---------------------------------------------------------------------------
// Left side panel – load / channel / markup widgets
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            files_section(ui, state);
            ui.separator();
            channel_section(ui, state);
            ui.separator();
            add_section(ui, state);
            ui.separator();
            edit_section(ui, state);
            ui.separator();
            save_section(ui, state);
        });
}

fn files_section(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Files");

    let rec = path_label(state.recording_path.as_deref());
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Recording…").clicked() {
            pick_recording(state);
        }
        ui.label(rec);
    });

    let ann = path_label(state.annotations_path.as_deref());
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Annotations…").clicked() {
            pick_annotations(state);
        }
        ui.label(ann);
    });

    if ui.button("Load").clicked() {
        state.load();
    }
}

fn channel_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Signal");

    let labels = match &state.recording {
        Some(rec) => rec.labels(),
        None => {
            ui.label("No recording loaded.");
            return;
        }
    };

    let current = state.channel.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt("channel")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for label in labels {
                if ui.selectable_label(current == label, &label).clicked() {
                    state.select_channel(label);
                }
            }
        });
}

fn add_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Add markup");
    interval_form(ui, "add", &mut state.add_form);
    if ui.button("Add Markup").clicked() {
        state.add();
    }
}

fn edit_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Edit / delete markup");

    let choices = state.store.choices();
    let selected_text = state
        .selected
        .and_then(|id| choices.iter().find(|c| c.id == id))
        .map(|c| c.text.clone())
        .unwrap_or_default();

    egui::ComboBox::from_id_salt("interval")
        .selected_text(selected_text)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for choice in &choices {
                let is_selected = state.selected == Some(choice.id);
                if ui.selectable_label(is_selected, &choice.text).clicked() {
                    state.select_interval(choice.id);
                }
            }
        });

    interval_form(ui, "edit", &mut state.edit_form);

    ui.horizontal(|ui: &mut Ui| {
        let has_selection = state.selected.is_some();
        if ui
            .add_enabled(has_selection, egui::Button::new("Edit Markup"))
            .clicked()
        {
            state.edit_selected();
        }
        if ui
            .add_enabled(has_selection, egui::Button::new("Delete Markup"))
            .clicked()
        {
            state.delete_selected();
        }
    });
}

fn save_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Save markup");

    egui::Grid::new("save_grid").num_columns(2).show(ui, |ui: &mut Ui| {
        ui.label("JSON");
        ui.text_edit_singleline(&mut state.json_path);
        ui.end_row();
        ui.label("TXT");
        ui.text_edit_singleline(&mut state.txt_path);
        ui.end_row();
    });

    if ui.button("Save Markup").clicked() {
        state.save();
    }
    if let Some(msg) = &state.status_message {
        ui.label(msg);
    }
}

/// Start / end seconds plus a label picker with free-text fallback.
fn interval_form(ui: &mut Ui, id: &str, form: &mut IntervalForm) {
    egui::Grid::new(format!("{id}_form"))
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("Start (s)");
            ui.add(egui::DragValue::new(&mut form.start).speed(1.0));
            ui.end_row();

            ui.label("End (s)");
            ui.add(egui::DragValue::new(&mut form.end).speed(1.0));
            ui.end_row();

            ui.label("Label");
            ui.horizontal(|ui: &mut Ui| {
                egui::ComboBox::from_id_salt(format!("{id}_label"))
                    .selected_text(RichText::new(&form.label).color(legend_color(&form.label)))
                    .width(60.0)
                    .show_ui(ui, |ui: &mut Ui| {
                        for (label, _) in KNOWN_LABELS {
                            let text = RichText::new(label).color(legend_color(label));
                            if ui.selectable_label(form.label == label, text).clicked() {
                                form.label = label.to_string();
                            }
                        }
                    });
                ui.add(egui::TextEdit::singleline(&mut form.label).desired_width(60.0));
            });
            ui.end_row();
        });
}

fn path_label(path: Option<&std::path::Path>) -> String {
    path.and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(none)".to_string())
}

// ---------------------------------------------------------------------------
// Bottom panel – interval table
// ---------------------------------------------------------------------------

/// Render every interval of the session; clicking a row selects it.
pub fn interval_table(ui: &mut Ui, state: &mut AppState) {
    let mut clicked = None;

    TableBuilder::new(ui)
        .striped(true)
        .sense(egui::Sense::click())
        .column(Column::auto().at_least(30.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in ["#", "Start", "End", "Description", "Origin"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for (i, entry) in state.store.entries().iter().enumerate() {
                let iv = &entry.interval;
                body.row(18.0, |mut row| {
                    row.set_selected(state.selected == Some(entry.id));
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{}", i + 1));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(to_text(iv.start));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(to_text(iv.end));
                    });
                    row.col(|ui: &mut Ui| {
                        let color = legend_color(&iv.description);
                        ui.label(RichText::new(&iv.description).color(color));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(entry.origin.to_string());
                    });
                    if row.response().clicked() {
                        clicked = Some(entry.id);
                    }
                });
            }
        });

    if let Some(id) = clicked {
        state.select_interval(id);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open recording…").clicked() {
                pick_recording(state);
                ui.close_menu();
            }
            if ui.button("Open annotations…").clicked() {
                pick_annotations(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Load").clicked() {
                state.load();
                ui.close_menu();
            }
            if ui.button("Save").clicked() {
                state.save();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(rec) = &state.recording {
            ui.label(format!(
                "{} channels, {} intervals",
                rec.len(),
                state.store.len()
            ));
        }

        if let Some(msg) = &state.error_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn pick_recording(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open EDF recording")
        .add_filter("EDF", &["edf", "EDF"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Recording chosen: {}", path.display());
        state.recording_path = Some(path);
    }
}

pub fn pick_annotations(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open annotations")
        .add_filter("Text", &["txt"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Annotations chosen: {}", path.display());
        state.annotations_path = Some(path);
    }
}
