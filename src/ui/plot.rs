use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Line, Plot, PlotPoints, Polygon};

use crate::color::band_color;
use crate::data::model::Interval;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Chart model
// ---------------------------------------------------------------------------

/// One shaded interval over the trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub start: f64,
    pub end: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub color: Color32,
    pub label: String,
}

/// Everything needed to draw one channel with its intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub channel: String,
    /// `[time_seconds, amplitude]` per sample.
    pub trace: Vec<[f64; 2]>,
    pub bands: Vec<Band>,
}

/// Build a chart of `samples` with one band per interval.
///
/// Bands span the full amplitude range of the samples. With no samples there
/// is no range and no bands are produced.
pub fn render(samples: &[f64], sample_rate: f64, intervals: &[Interval], channel: &str) -> Chart {
    let fs = if sample_rate.is_finite() && sample_rate > 0.0 {
        sample_rate
    } else {
        1.0
    };

    let trace: Vec<[f64; 2]> = samples
        .iter()
        .enumerate()
        .map(|(i, &y)| [i as f64 / fs, y])
        .collect();

    let bands = amplitude_range(samples)
        .map(|(y_min, y_max)| {
            intervals
                .iter()
                .map(|iv| Band {
                    start: iv.start as f64,
                    end: iv.end as f64,
                    y_min,
                    y_max,
                    color: band_color(&iv.description),
                    label: iv.description.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    Chart {
        title: format!("Signal: {channel}"),
        channel: channel.to_string(),
        trace,
        bands,
    }
}

fn amplitude_range(samples: &[f64]) -> Option<(f64, f64)> {
    if samples.is_empty() {
        return None;
    }
    let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

// ---------------------------------------------------------------------------
// Signal plot (central panel)
// ---------------------------------------------------------------------------

/// Render the cached chart in the central panel.
pub fn signal_plot(ui: &mut Ui, state: &AppState) {
    let chart = match &state.chart {
        Some(chart) => chart,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Load a recording and annotations to view signals  (File → Load)");
            });
            return;
        }
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(&chart.title);
    });

    Plot::new("signal_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label("Time (s)")
        .y_axis_label("Amplitude")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for band in &chart.bands {
                let corners: PlotPoints = vec![
                    [band.start, band.y_min],
                    [band.end, band.y_min],
                    [band.end, band.y_max],
                    [band.start, band.y_max],
                ]
                .into();

                plot_ui.polygon(
                    Polygon::new(corners)
                        .name(&band.label)
                        .fill_color(band.color)
                        .stroke(Stroke::NONE),
                );
            }

            let points: PlotPoints = chart.trace.iter().copied().collect();
            plot_ui.line(
                Line::new(points)
                    .name(&chart.channel)
                    .color(Color32::LIGHT_BLUE)
                    .width(1.0),
            );
        });
}
