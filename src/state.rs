use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::data::loader::load_session;
use crate::data::model::{IntervalId, Recording};
use crate::data::persist;
use crate::data::store::IntervalStore;
use crate::ui::plot::{render, Chart};

pub const DEFAULT_JSON_PATH: &str = "markup.json";
pub const DEFAULT_TXT_PATH: &str = "markup.txt";
pub const DEFAULT_LABEL: &str = "swd";

// ---------------------------------------------------------------------------
// Form inputs
// ---------------------------------------------------------------------------

/// Start / end / label inputs of the add and edit forms.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalForm {
    pub start: u64,
    pub end: u64,
    pub label: String,
}

impl Default for IntervalForm {
    fn default() -> Self {
        Self {
            start: 0,
            end: 0,
            label: DEFAULT_LABEL.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub recording_path: Option<PathBuf>,
    pub annotations_path: Option<PathBuf>,

    /// Decoded channels (None until a load succeeds).
    pub recording: Option<Recording>,

    /// All intervals of the session.
    pub store: IntervalStore,

    /// Channel currently plotted.
    pub channel: Option<String>,

    /// Interval picked for edit / delete.
    pub selected: Option<IntervalId>,

    pub add_form: IntervalForm,
    pub edit_form: IntervalForm,

    pub json_path: String,
    pub txt_path: String,

    /// Chart of the current channel (rebuilt after every change).
    pub chart: Option<Chart>,

    /// Error shown in the UI.
    pub error_message: Option<String>,

    /// Last save result.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            recording_path: None,
            annotations_path: None,
            recording: None,
            store: IntervalStore::new(),
            channel: None,
            selected: None,
            add_form: IntervalForm::default(),
            edit_form: IntervalForm::default(),
            json_path: DEFAULT_JSON_PATH.to_string(),
            txt_path: DEFAULT_TXT_PATH.to_string(),
            chart: None,
            error_message: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Load the chosen recording and annotation files.
    ///
    /// On failure every output is reset and a single error is shown.
    pub fn load(&mut self) {
        let result = match (&self.recording_path, &self.annotations_path) {
            (Some(rec), Some(ann)) => load_session(rec, ann),
            _ => Err(anyhow::anyhow!(
                "Choose both a recording (.edf) and an annotation file (.txt)"
            )),
        };

        match result {
            Ok((recording, intervals)) => {
                log::info!(
                    "Loaded {} channels and {} intervals",
                    recording.len(),
                    intervals.len()
                );
                self.channel = recording.channels.first().map(|c| c.label.clone());
                self.recording = Some(recording);
                self.store.replace_loaded(intervals);
                self.selected = None;
                self.error_message = None;
                self.refresh_chart();
            }
            Err(e) => {
                log::error!("Error loading EDF or annotations: {e:#}");
                self.reset_outputs();
                self.error_message = Some(format!("{e:#}"));
            }
        }
    }

    fn reset_outputs(&mut self) {
        self.recording = None;
        self.store.clear();
        self.channel = None;
        self.selected = None;
        self.edit_form = IntervalForm::default();
        self.chart = None;
        self.status_message = None;
    }

    pub fn select_channel(&mut self, label: String) {
        self.channel = Some(label);
        self.refresh_chart();
    }

    /// Rebuild the chart for the current channel and intervals.
    pub fn refresh_chart(&mut self) {
        self.chart = match (&self.recording, &self.channel) {
            (Some(rec), Some(label)) => rec.channel(label).map(|ch| {
                render(
                    &ch.samples,
                    ch.sample_rate,
                    &self.store.intervals(),
                    &ch.label,
                )
            }),
            _ => None,
        };
    }

    pub fn add(&mut self) {
        let form = self.add_form.clone();
        match self.store.add(form.start, form.end, form.label.trim()) {
            Ok(_) => {
                self.error_message = None;
                self.refresh_chart();
            }
            Err(e) => self.report(e.into()),
        }
    }

    /// Copy the chosen interval into the edit form.
    pub fn select_interval(&mut self, id: IntervalId) {
        if let Some(interval) = self.store.get(id) {
            self.edit_form = IntervalForm {
                start: interval.start,
                end: interval.end,
                label: interval.description.clone(),
            };
            self.selected = Some(id);
        }
    }

    pub fn edit_selected(&mut self) {
        let form = self.edit_form.clone();
        let result = self.require_selection().and_then(|id| {
            self.store
                .edit(id, form.start, form.end, form.label.trim())
                .map_err(Into::into)
        });
        match result {
            Ok(()) => {
                self.error_message = None;
                self.refresh_chart();
            }
            Err(e) => self.report(e),
        }
    }

    pub fn delete_selected(&mut self) {
        let result = self
            .require_selection()
            .and_then(|id| self.store.delete(id).map_err(Into::into));
        match result {
            Ok(_) => {
                self.selected = None;
                self.error_message = None;
                self.refresh_chart();
            }
            Err(e) => self.report(e),
        }
    }

    /// Write all intervals to the JSON and TXT outputs.
    pub fn save(&mut self) {
        let intervals = self.store.intervals();
        let result = persist::save(
            &intervals,
            Path::new(self.json_path.trim()),
            Path::new(self.txt_path.trim()),
        )
        .context("saving markup");

        match result {
            Ok(status) => {
                self.status_message = Some(status);
                self.error_message = None;
            }
            Err(e) => self.report(e),
        }
    }

    fn require_selection(&self) -> Result<IntervalId> {
        self.selected.context("Select an interval first")
    }

    fn report(&mut self, e: anyhow::Error) {
        log::error!("{e:#}");
        self.error_message = Some(format!("{e:#}"));
    }
}
