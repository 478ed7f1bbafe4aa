/// Data layer: time codec, decoding, pairing, interval store, and output files.
///
/// Architecture:
/// ```text
///   .edf              .txt
///     │                 │
///     ▼                 ▼
///   ┌─────────────────────┐
///   │       loader        │  EDF → Recording, lines → Markers → Intervals
///   └─────────────────────┘
///              │
///              ▼
///   ┌─────────────────────┐
///   │    IntervalStore    │  ordered intervals with stable ids, add/edit/delete
///   └─────────────────────┘
///              │
///              ▼
///   ┌─────────────────────┐
///   │       persist       │  intervals → .json + paired-marker .txt
///   └─────────────────────┘
/// ```

pub mod loader;
pub mod model;
pub mod persist;
pub mod store;
pub mod timecode;
