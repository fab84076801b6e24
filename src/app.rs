use crate::dlog;
use crate::form::WorkoutForm;
use crate::map::{LocationError, MapWidget, Pan};
use crate::render;
use crate::store::{Storage, WORKOUTS_KEY, WorkoutStore};
use crate::types::{Coordinates, Workout, WorkoutKind};
use anyhow::Result;
use chrono::{DateTime, Local};

pub const DEFAULT_MAP_ZOOM: u8 = 15;
pub const LOCATION_NOTICE: &str = "Could not get your position";
pub const NO_LOCATION_NOTICE: &str = "Click on the map to pick a location first";
pub const VARIANT_MISMATCH_NOTICE: &str = "Form fields do not match the selected workout type";

const ID_MODULUS: u64 = 10_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub map_zoom: u8,
    pub storage_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            map_zoom: DEFAULT_MAP_ZOOM,
            storage_key: WORKOUTS_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormState {
    Hidden,
    Visible { pending: Coordinates },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    PositionResolved(Result<Coordinates, LocationError>),
    MapClicked(Coordinates),
    VariantChanged(WorkoutKind),
    Submit(WorkoutForm),
    EntrySelected(String),
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    MapLoaded { center: Coordinates, markers: usize },
    FormShown(Coordinates),
    FieldsToggled(WorkoutKind),
    Added(Workout),
    Centered { id: String, at: Coordinates },
    Cleared,
    /// Something the user should be told; no state changed.
    Notice(String),
    Ignored,
}

/// Hands out the last ten digits of the millisecond clock, never repeating.
#[derive(Debug, Clone, Copy, Default)]
struct IdGenerator {
    last: Option<u64>,
}

impl IdGenerator {
    fn seeded(store: &WorkoutStore) -> Self {
        let last = store.iter().filter_map(|w| w.id.parse::<u64>().ok()).max();
        Self { last }
    }

    fn next(&mut self, now: DateTime<Local>) -> String {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let mut candidate = millis % ID_MODULUS;
        if let Some(last) = self.last
            && candidate <= last
        {
            candidate = (last + 1) % ID_MODULUS;
        }
        self.last = Some(candidate);
        format!("{candidate:010}")
    }
}

pub struct App<S, M> {
    config: AppConfig,
    storage: S,
    map: M,
    map_loaded: bool,
    store: WorkoutStore,
    form: FormState,
    kind: WorkoutKind,
    ids: IdGenerator,
    clock: fn() -> DateTime<Local>,
}

impl<S: Storage, M: MapWidget> App<S, M> {
    /// Rehydrates the store. The map stays unloaded until a position arrives.
    pub fn start(storage: S, map: M, config: AppConfig) -> Result<Self> {
        let store = WorkoutStore::load(&storage, &config.storage_key)?;
        let ids = IdGenerator::seeded(&store);
        tracing::info!(workouts = store.len(), "app started");

        Ok(Self {
            config,
            storage,
            map,
            map_loaded: false,
            store,
            form: FormState::Hidden,
            kind: WorkoutKind::Running,
            ids,
            clock: Local::now,
        })
    }

    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    pub const fn store(&self) -> &WorkoutStore {
        &self.store
    }

    pub const fn form(&self) -> FormState {
        self.form
    }

    /// Variant currently selected in the form.
    pub const fn selected_kind(&self) -> WorkoutKind {
        self.kind
    }

    pub const fn map(&self) -> &M {
        &self.map
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub const fn is_map_loaded(&self) -> bool {
        self.map_loaded
    }

    /// Rendered list, newest first.
    pub fn entries(&self) -> Vec<String> {
        render::list(self.store.iter())
    }

    pub fn dispatch(&mut self, msg: Message) -> Result<Response> {
        dlog!("dispatch msg={msg:?}");
        match msg {
            Message::PositionResolved(Ok(center)) => Ok(self.load_map(center)),
            Message::PositionResolved(Err(e)) => {
                tracing::warn!(err = %e, "position unavailable");
                Ok(Response::Notice(LOCATION_NOTICE.to_string()))
            }
            Message::MapClicked(at) => Ok(self.show_form(at)),
            Message::VariantChanged(kind) => {
                self.kind = kind;
                Ok(Response::FieldsToggled(kind))
            }
            Message::Submit(form) => self.submit(&form),
            Message::EntrySelected(id) => Ok(self.select(&id)),
            Message::Reset => self.reset(),
        }
    }

    fn load_map(&mut self, center: Coordinates) -> Response {
        self.map.load(center, self.config.map_zoom);
        for w in &self.store {
            self.map.add_marker(render::marker(w));
        }
        self.map_loaded = true;
        Response::MapLoaded {
            center,
            markers: self.store.len(),
        }
    }

    fn show_form(&mut self, at: Coordinates) -> Response {
        if !self.map_loaded {
            dlog!("map_click_without_map at={at}");
            return Response::Ignored;
        }
        self.form = FormState::Visible { pending: at };
        Response::FormShown(at)
    }

    fn submit(&mut self, form: &WorkoutForm) -> Result<Response> {
        let FormState::Visible { pending } = self.form else {
            return Ok(Response::Notice(NO_LOCATION_NOTICE.to_string()));
        };

        if form.kind != self.kind {
            tracing::warn!(selected = %self.kind, submitted = %form.kind, "variant mismatch");
            return Ok(Response::Notice(VARIANT_MISMATCH_NOTICE.to_string()));
        }

        let input = match form.validate() {
            Ok(input) => input,
            Err(e) => {
                tracing::warn!(field = e.field().name(), "rejected workout: {e}");
                return Ok(Response::Notice(e.notice()));
            }
        };

        let now = (self.clock)();
        let id = self.ids.next(now);
        let workout = Workout::new(id, now, pending, input);

        self.store.push(workout.clone());
        if let Err(e) = self.store.save(&mut self.storage, &self.config.storage_key) {
            // Keep memory and the slot in agreement.
            self.store.pop();
            return Err(e);
        }

        self.map.add_marker(render::marker(&workout));
        self.form = FormState::Hidden;

        tracing::info!(
            id = %workout.id,
            kind = %workout.kind(),
            metric = workout.metric(),
            "workout added"
        );
        Ok(Response::Added(workout))
    }

    fn select(&mut self, id: &str) -> Response {
        if !self.map_loaded {
            return Response::Ignored;
        }
        let Some(w) = self.store.find(id) else {
            dlog!("select_unknown id={id}");
            return Response::Ignored;
        };
        let at = w.coordinates;
        self.map.set_view(at, self.config.map_zoom, Pan::default());
        Response::Centered {
            id: id.to_string(),
            at,
        }
    }

    fn reset(&mut self) -> Result<Response> {
        self.store.clear(&mut self.storage, &self.config.storage_key)?;
        self.map.clear_markers();
        self.map_loaded = false;
        self.form = FormState::Hidden;
        self.ids = IdGenerator::default();
        tracing::info!("store reset");
        Ok(Response::Cleared)
    }
}
