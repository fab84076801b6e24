use crate::types::{Extra, WorkoutInput, WorkoutKind};

/// Prefix of every validation notice shown to the user.
pub const INVALID_INPUT_NOTICE: &str = "Inputs have to be positive numbers!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Distance,
    Duration,
    Cadence,
    Elevation,
}

impl Field {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Duration => "duration",
            Self::Cadence => "cadence",
            Self::Elevation => "elevation",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{} is not a finite number", .0.name())]
    NotFinite(Field),
    #[error("{} must be greater than zero", .0.name())]
    NotPositive(Field),
}

impl ValidationError {
    pub const fn field(&self) -> Field {
        match self {
            Self::NotFinite(f) | Self::NotPositive(f) => *f,
        }
    }

    pub fn notice(&self) -> String {
        format!("{INVALID_INPUT_NOTICE} ({self})")
    }
}

/// The form as typed: every numeric field is still text.
///
/// Only the field matching `kind` among cadence/elevation is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutForm {
    pub kind: WorkoutKind,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

impl WorkoutForm {
    pub fn running(distance: &str, duration: &str, cadence: &str) -> Self {
        Self {
            kind: WorkoutKind::Running,
            distance: distance.to_string(),
            duration: duration.to_string(),
            cadence: cadence.to_string(),
            elevation: String::new(),
        }
    }

    pub fn cycling(distance: &str, duration: &str, elevation: &str) -> Self {
        Self {
            kind: WorkoutKind::Cycling,
            distance: distance.to_string(),
            duration: duration.to_string(),
            cadence: String::new(),
            elevation: elevation.to_string(),
        }
    }

    pub fn validate(&self) -> Result<WorkoutInput, ValidationError> {
        let distance_km = positive(Field::Distance, &self.distance)?;
        let duration_min = positive(Field::Duration, &self.duration)?;

        let extra = match self.kind {
            WorkoutKind::Running => Extra::Cadence(positive(Field::Cadence, &self.cadence)?),
            // Net descents are legal, so only finiteness is checked.
            WorkoutKind::Cycling => Extra::Elevation(finite(Field::Elevation, &self.elevation)?),
        };

        Ok(WorkoutInput {
            distance_km,
            duration_min,
            extra,
        })
    }
}

/// Text to number: blank is 0, garbage is NaN.
pub fn to_number(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

fn finite(field: Field, raw: &str) -> Result<f64, ValidationError> {
    let v = to_number(raw);
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ValidationError::NotFinite(field))
    }
}

fn positive(field: Field, raw: &str) -> Result<f64, ValidationError> {
    let v = finite(field, raw)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(ValidationError::NotPositive(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_to_number() {
        assert_eq!(to_number(""), 0.0);
        assert_eq!(to_number("   "), 0.0);
        assert_eq!(to_number(" 5 "), 5.0);
        assert_eq!(to_number("1e1"), 10.0);
        assert!(to_number("five").is_nan());
        assert!(to_number("inf").is_infinite());
    }

    #[test]
    fn accepts_valid_running() {
        let input = WorkoutForm::running("5", "30", "150").validate().unwrap();
        assert_eq!(input.distance_km, 5.0);
        assert_eq!(input.duration_min, 30.0);
        assert_eq!(input.extra, Extra::Cadence(150.0));
        assert_eq!(input.kind(), WorkoutKind::Running);
    }

    #[test]
    fn rejects_bad_running_fields() {
        use ValidationError::{NotFinite, NotPositive};

        let cases = [
            (("0", "30", "150"), NotPositive(Field::Distance)),
            (("-1", "30", "150"), NotPositive(Field::Distance)),
            (("5", "NaN", "150"), NotFinite(Field::Duration)),
            (("5", "abc", "150"), NotFinite(Field::Duration)),
            (("5", "30", "0"), NotPositive(Field::Cadence)),
            (("5", "30", ""), NotPositive(Field::Cadence)),
            (("inf", "30", "150"), NotFinite(Field::Distance)),
        ];
        for ((distance, duration, cadence), expected) in cases {
            let form = WorkoutForm::running(distance, duration, cadence);
            assert_eq!(form.validate(), Err(expected), "{form:?}");
        }
    }

    #[test]
    fn cycling_elevation_may_be_negative_but_finite() {
        let input = WorkoutForm::cycling("20", "60", "-120").validate().unwrap();
        assert_eq!(input.extra, Extra::Elevation(-120.0));

        let zero = WorkoutForm::cycling("20", "60", "").validate().unwrap();
        assert_eq!(zero.extra, Extra::Elevation(0.0));

        assert_eq!(
            WorkoutForm::cycling("20", "60", "nope").validate(),
            Err(ValidationError::NotFinite(Field::Elevation))
        );
        assert_eq!(
            WorkoutForm::cycling("20", "0", "300").validate(),
            Err(ValidationError::NotPositive(Field::Duration))
        );
    }

    #[test]
    fn ignores_hidden_field() {
        let mut form = WorkoutForm::running("5", "30", "150");
        form.elevation = "garbage".into();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn notice_mentions_field() {
        let err = ValidationError::NotPositive(Field::Cadence);
        assert_eq!(err.field(), Field::Cadence);
        assert_eq!(
            err.notice(),
            "Inputs have to be positive numbers! (cadence must be greater than zero)"
        );
    }
}
