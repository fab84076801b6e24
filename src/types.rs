use chrono::{DateTime, Datelike, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A `[lat, lng]` pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.lat, c.lng]
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoordinateParseError {
    #[error("expected LAT,LNG but got {0:?}")]
    Shape(String),
    #[error("not a number: {0:?}")]
    Number(String),
    #[error("latitude {0} out of range (-90..=90)")]
    Latitude(String),
    #[error("longitude {0} out of range (-180..=180)")]
    Longitude(String),
}

/// Parses `"51.5,-0.1"` (whitespace around either half is ignored).
impl FromStr for Coordinates {
    type Err = CoordinateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((lat_s, lng_s)) = s.split_once(',') else {
            return Err(CoordinateParseError::Shape(s.to_string()));
        };
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| CoordinateParseError::Number(v.trim().to_string()))
        };
        let lat = parse(lat_s)?;
        let lng = parse(lng_s)?;

        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateParseError::Latitude(lat.to_string()));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateParseError::Longitude(lng.to_string()));
        }
        Ok(Self { lat, lng })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }

    pub const fn capitalized(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Variant payload: the activity-specific input and its derived metric.
///
/// Serialized flat into the workout object, discriminated by `variant`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "lowercase")]
pub enum Details {
    #[serde(rename_all = "camelCase")]
    Running {
        cadence_spm: f64,
        pace_min_per_km: f64,
    },
    #[serde(rename_all = "camelCase")]
    Cycling {
        elevation_gain_m: f64,
        speed_km_per_h: f64,
    },
}

impl Details {
    pub fn running(distance_km: f64, duration_min: f64, cadence_spm: f64) -> Self {
        Self::Running {
            cadence_spm,
            pace_min_per_km: pace(distance_km, duration_min),
        }
    }

    pub fn cycling(distance_km: f64, duration_min: f64, elevation_gain_m: f64) -> Self {
        Self::Cycling {
            elevation_gain_m,
            speed_km_per_h: speed(distance_km, duration_min),
        }
    }

    pub const fn kind(&self) -> WorkoutKind {
        match self {
            Self::Running { .. } => WorkoutKind::Running,
            Self::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

/// Minutes per kilometer.
pub fn pace(distance_km: f64, duration_min: f64) -> f64 {
    duration_min / distance_km
}

/// Kilometers per hour.
pub fn speed(distance_km: f64, duration_min: f64) -> f64 {
    distance_km / (duration_min / 60.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub coordinates: Coordinates,
    pub distance_km: f64,
    pub duration_min: f64,
    pub description: String,
    pub interaction_count: u32,
    #[serde(flatten)]
    pub details: Details,
}

impl Workout {
    /// Builds a record with its metric and description already set.
    ///
    /// Inputs are expected to be validated (see [`crate::form`]).
    pub fn new(
        id: String,
        created_at: DateTime<Local>,
        coordinates: Coordinates,
        input: WorkoutInput,
    ) -> Self {
        let WorkoutInput {
            distance_km,
            duration_min,
            extra,
        } = input;
        let details = match extra {
            Extra::Cadence(c) => Details::running(distance_km, duration_min, c),
            Extra::Elevation(e) => Details::cycling(distance_km, duration_min, e),
        };
        let description = describe(details.kind(), &created_at);

        Self {
            id,
            created_at: created_at.with_timezone(&Utc),
            coordinates,
            distance_km,
            duration_min,
            description,
            interaction_count: 0,
            details,
        }
    }

    pub const fn kind(&self) -> WorkoutKind {
        self.details.kind()
    }

    /// Pace (min/km) for running, speed (km/h) for cycling.
    pub const fn metric(&self) -> f64 {
        match self.details {
            Details::Running {
                pace_min_per_km, ..
            } => pace_min_per_km,
            Details::Cycling { speed_km_per_h, .. } => speed_km_per_h,
        }
    }
}

/// `"Running on March 15"`.
pub fn describe(kind: WorkoutKind, date: &impl Datelike) -> String {
    let month = MONTHS[date.month0() as usize];
    format!("{} on {month} {}", kind.capitalized(), date.day())
}

/// Validated numeric inputs of one workout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutInput {
    pub distance_km: f64,
    pub duration_min: f64,
    pub extra: Extra,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extra {
    Cadence(f64),
    Elevation(f64),
}

impl WorkoutInput {
    pub const fn kind(&self) -> WorkoutKind {
        match self.extra {
            Extra::Cadence(_) => WorkoutKind::Running,
            Extra::Elevation(_) => WorkoutKind::Cycling,
        }
    }
}
