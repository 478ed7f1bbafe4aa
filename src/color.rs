use eframe::egui::Color32;

// ---------------------------------------------------------------------------
// Interval label → fill colour
// ---------------------------------------------------------------------------

/// Labels offered in the label selectors, with their base RGB colours.
pub const KNOWN_LABELS: [(&str, [u8; 3]); 3] = [
    ("swd", [255, 0, 0]),
    ("is", [0, 255, 0]),
    ("ds", [0, 0, 255]),
];

/// Band fill opacity (0.7).
const BAND_ALPHA: u8 = 178;

fn lookup(description: &str) -> Option<[u8; 3]> {
    let key = description.to_lowercase();
    KNOWN_LABELS
        .iter()
        .find(|(label, _)| *label == key)
        .map(|(_, rgb)| *rgb)
}

/// Fill colour for an interval band. Unknown labels are transparent.
pub fn band_color(description: &str) -> Color32 {
    match lookup(description) {
        Some([r, g, b]) => Color32::from_rgba_unmultiplied(r, g, b, BAND_ALPHA),
        None => Color32::TRANSPARENT,
    }
}

/// Opaque colour for legend text and table rows.
pub fn legend_color(description: &str) -> Color32 {
    lookup(description)
        .map(|[r, g, b]| Color32::from_rgb(r, g, b))
        .unwrap_or(Color32::GRAY)
}
