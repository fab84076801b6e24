use crate::app::DEFAULT_MAP_ZOOM;
use crate::form::WorkoutForm;
use crate::types::Coordinates;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = ".trailog";

#[derive(Parser, Debug)]
#[command(
    name = "trailog",
    about = "Log running and cycling workouts pinned to map locations"
)]
pub struct Cli {
    /// Directory holding the persisted workout slot.
    #[arg(long, env = "TRAILOG_DATA_DIR", default_value = DEFAULT_DATA_DIR, global = true)]
    pub data_dir: PathBuf,

    /// Current position as LAT,LNG. Without it the map cannot load.
    #[arg(
        long,
        env = "TRAILOG_HOME",
        value_name = "LAT,LNG",
        allow_hyphen_values = true,
        global = true
    )]
    pub home: Option<Coordinates>,

    /// Map zoom level.
    #[arg(long, default_value_t = DEFAULT_MAP_ZOOM, global = true)]
    pub zoom: u8,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Print logged workouts, newest first (default).
    List,

    /// Click the map at a location and submit a workout there.
    Log {
        /// Where on the map to pin the workout.
        #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
        at: Coordinates,

        #[command(subcommand)]
        workout: WorkoutArgs,
    },

    /// Center the map on a logged workout.
    Select { id: String },

    /// Delete every logged workout.
    Reset,
}

/// Numbers stay text here; the form validates them.
#[derive(Subcommand, Debug)]
pub enum WorkoutArgs {
    Running {
        /// Distance in km.
        #[arg(long, allow_hyphen_values = true)]
        distance: String,
        /// Duration in minutes.
        #[arg(long, allow_hyphen_values = true)]
        duration: String,
        /// Steps per minute.
        #[arg(long, allow_hyphen_values = true)]
        cadence: String,
    },
    Cycling {
        /// Distance in km.
        #[arg(long, allow_hyphen_values = true)]
        distance: String,
        /// Duration in minutes.
        #[arg(long, allow_hyphen_values = true)]
        duration: String,
        /// Elevation gain in meters.
        #[arg(long, allow_hyphen_values = true)]
        elevation: String,
    },
}

impl WorkoutArgs {
    pub fn to_form(&self) -> WorkoutForm {
        match self {
            Self::Running {
                distance,
                duration,
                cadence,
            } => WorkoutForm::running(distance, duration, cadence),
            Self::Cycling {
                distance,
                duration,
                elevation,
            } => WorkoutForm::cycling(distance, duration, elevation),
        }
    }
}
