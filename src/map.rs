use crate::types::Coordinates;
use std::time::Duration;

/// Popup marker placed on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub at: Coordinates,
    pub label: String,
    pub class: String,
}

/// Animated pan parameters for [`MapWidget::set_view`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pan {
    pub animate: bool,
    pub duration: Duration,
}

impl Default for Pan {
    fn default() -> Self {
        Self {
            animate: true,
            duration: Duration::from_secs(1),
        }
    }
}

pub trait MapWidget {
    /// Shows the map centered at `center`.
    fn load(&mut self, center: Coordinates, zoom: u8);
    fn add_marker(&mut self, marker: Marker);
    fn set_view(&mut self, center: Coordinates, zoom: u8, pan: Pan);
    fn clear_markers(&mut self);
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("no home position configured")]
    Unavailable,
    #[error("location denied: {0}")]
    Denied(String),
}

pub trait Locator {
    fn locate(&mut self) -> Result<Coordinates, LocationError>;
}

/// Resolves to a configured coordinate, or fails when there is none.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator(pub Option<Coordinates>);

impl Locator for FixedLocator {
    fn locate(&mut self) -> Result<Coordinates, LocationError> {
        self.0.ok_or(LocationError::Unavailable)
    }
}

/// Map that reports what it would draw through `tracing`.
#[derive(Debug, Default)]
pub struct ConsoleMap {
    center: Option<Coordinates>,
    markers: usize,
}

impl ConsoleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn center(&self) -> Option<Coordinates> {
        self.center
    }

    pub const fn marker_count(&self) -> usize {
        self.markers
    }
}

impl MapWidget for ConsoleMap {
    fn load(&mut self, center: Coordinates, zoom: u8) {
        tracing::info!(%center, zoom, "map loaded");
        self.center = Some(center);
    }

    fn add_marker(&mut self, marker: Marker) {
        tracing::debug!(at = %marker.at, class = %marker.class, "marker: {}", marker.label);
        self.markers += 1;
    }

    fn set_view(&mut self, center: Coordinates, zoom: u8, pan: Pan) {
        tracing::info!(
            %center,
            zoom,
            animate = pan.animate,
            pan_secs = pan.duration.as_secs_f64(),
            "map centered"
        );
        self.center = Some(center);
    }

    fn clear_markers(&mut self) {
        self.markers = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_locator() {
        let here = Coordinates::new(1.0, 2.0);
        assert_eq!(FixedLocator(Some(here)).locate(), Ok(here));
        assert_eq!(FixedLocator(None).locate(), Err(LocationError::Unavailable));
    }

    #[test]
    fn console_map_tracks_state() {
        let mut map = ConsoleMap::new();
        assert_eq!(map.center(), None);
        map.load(Coordinates::new(1.0, 2.0), 15);
        map.add_marker(Marker {
            at: Coordinates::new(1.0, 2.0),
            label: "x".into(),
            class: "running-popup".into(),
        });
        map.set_view(Coordinates::new(3.0, 4.0), 15, Pan::default());
        assert_eq!(map.center(), Some(Coordinates::new(3.0, 4.0)));
        assert_eq!(map.marker_count(), 1);
        map.clear_markers();
        assert_eq!(map.marker_count(), 0);
    }
}
