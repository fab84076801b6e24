use crate::map::Marker;
use crate::types::{Details, Workout, WorkoutKind};
use std::fmt::Write;

pub const fn icon(kind: WorkoutKind) -> &'static str {
    match kind {
        WorkoutKind::Running => "🏃‍♂️",
        WorkoutKind::Cycling => "🚴‍♀️",
    }
}

pub fn marker(w: &Workout) -> Marker {
    Marker {
        at: w.coordinates,
        label: format!("{} {}", icon(w.kind()), w.description),
        class: format!("{}-popup", w.kind().label()),
    }
}

/// Multi-line list entry, e.g.
///
/// ```text
/// [1718013600] Running on June 10
///   🏃‍♂️ 5 km  ⏱ 30 min  ⚡️ 6.0 min/km  🦶🏼 150 spm
/// ```
pub fn entry(w: &Workout) -> String {
    let mut out = format!("[{}] {}\n  ", w.id, w.description);

    // Writing to a String cannot fail.
    let _ = write!(
        out,
        "{} {} km  ⏱ {} min  ",
        icon(w.kind()),
        w.distance_km,
        w.duration_min
    );
    let _ = match w.details {
        Details::Running {
            cadence_spm,
            pace_min_per_km,
        } => write!(out, "⚡️ {pace_min_per_km:.1} min/km  🦶🏼 {cadence_spm} spm"),
        Details::Cycling {
            elevation_gain_m,
            speed_km_per_h,
        } => write!(out, "⚡️ {speed_km_per_h:.1} km/h  ⛰ {elevation_gain_m} m"),
    };
    out
}

/// Newest first.
pub fn list<'a>(workouts: impl DoubleEndedIterator<Item = &'a Workout>) -> Vec<String> {
    workouts.rev().map(entry).collect()
}
