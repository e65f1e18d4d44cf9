use crate::config::MapConfig;
use crate::dataset::Dataset;
use crate::error::MapError;
use crate::geometry::{Point, Rect};
use crate::registry::DatasetRegistry;
use crate::session::{MapEvent, MapSession};

#[derive(Debug, Clone)]
pub enum ViewState {
    /// Nothing requested yet.
    Empty,
    Loading { name: String },
    Ready(Box<MapSession>),
    Failed { name: String, error: MapError },
}

/// Proof of a particular load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer request superseded this one; the result was dropped.
    Stale,
}

/// Map selection and load sequencing. Each request gets a [`LoadTicket`];
/// only the ticket of the most recent request can install its result.
#[derive(Debug, Clone)]
pub struct MapViewer {
    config: MapConfig,
    state: ViewState,
    generation: u64,
    requested: Option<String>,
}

impl Default for MapViewer {
    fn default() -> Self {
        MapViewer {
            config: MapConfig::default(),
            state: ViewState::Empty,
            generation: 0,
            requested: None,
        }
    }
}

impl MapViewer {
    pub fn new(config: MapConfig) -> Result<Self, MapError> {
        config.validate()?;
        Ok(MapViewer {
            config,
            state: ViewState::Empty,
            generation: 0,
            requested: None,
        })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Replace the configuration. A loaded map is reconfigured in place; see
    /// [`MapSession::reconfigure`].
    pub fn set_config(&mut self, config: MapConfig) -> Result<(), MapError> {
        config.validate()?;
        let previous = std::mem::replace(&mut self.config, config);
        if let ViewState::Ready(session) = &mut self.state {
            session.reconfigure(&previous, &self.config);
        }
        Ok(())
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn requested_name(&self) -> Option<&str> {
        self.requested.as_deref()
    }

    pub fn session(&self) -> Option<&MapSession> {
        match &self.state {
            ViewState::Ready(session) => Some(&**session),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading { .. })
    }

    pub fn error(&self) -> Option<&MapError> {
        match &self.state {
            ViewState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Start loading `name`. Drops the current session, so transform and
    /// hover state reset even mid-gesture.
    pub fn request(&mut self, name: &str) -> LoadTicket {
        self.generation += 1;
        self.requested = Some(name.to_string());
        self.state = ViewState::Loading {
            name: name.to_string(),
        };
        tracing::debug!(map = name, generation = self.generation, "Requested map");
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Install the result of the load started by `ticket`, unless a newer
    /// request has been made since.
    pub fn complete(&mut self, ticket: LoadTicket, result: Result<Dataset, MapError>) -> LoadOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation,
                "Discarding stale map load"
            );
            return LoadOutcome::Stale;
        }
        let name = self.requested.clone().unwrap_or_default();
        self.state = match result {
            Ok(dataset) => ViewState::Ready(Box::new(MapSession::new(&name, dataset, &self.config))),
            Err(error) => {
                tracing::warn!(map = %name, %error, "Map failed to load");
                ViewState::Failed { name, error }
            }
        };
        LoadOutcome::Applied
    }

    /// Request and resolve `name` in one step.
    pub fn load(&mut self, registry: &DatasetRegistry, name: &str) -> LoadOutcome {
        let ticket = self.request(name);
        self.complete(ticket, registry.resolve(name))
    }

    /// Request the last requested map again.
    pub fn retry(&mut self) -> Option<LoadTicket> {
        let name = self.requested.clone()?;
        Some(self.request(&name))
    }

    fn ready_mut(&mut self) -> Option<(&mut MapSession, &MapConfig)> {
        match &mut self.state {
            ViewState::Ready(session) => Some((session.as_mut(), &self.config)),
            _ => None,
        }
    }

    pub fn pointer_down(&mut self, screen: Point, surface: Rect) {
        if let Some((session, config)) = self.ready_mut() {
            session.pointer_down(screen, surface, config);
        }
    }

    pub fn pointer_move(&mut self, screen: Point, surface: Rect) {
        if let Some((session, _)) = self.ready_mut() {
            session.pointer_move(screen, surface);
        }
    }

    pub fn pointer_up(&mut self) {
        if let Some((session, _)) = self.ready_mut() {
            session.pointer_up();
        }
    }

    pub fn pointer_leave(&mut self) {
        if let Some((session, _)) = self.ready_mut() {
            session.pointer_leave();
        }
    }

    /// See [`MapSession::wheel`]. `false` while no map is ready.
    pub fn wheel(&mut self, screen: Point, delta_y: f64, surface: Rect) -> bool {
        match self.ready_mut() {
            Some((session, config)) => session.wheel(screen, delta_y, surface, config),
            None => false,
        }
    }

    pub fn zoom_in(&mut self) {
        if let Some((session, config)) = self.ready_mut() {
            session.zoom_in(config);
        }
    }

    pub fn zoom_out(&mut self) {
        if let Some((session, config)) = self.ready_mut() {
            session.zoom_out(config);
        }
    }

    pub fn reset_view(&mut self) {
        if let Some((session, _)) = self.ready_mut() {
            session.reset_view();
        }
    }

    pub fn region_enter(&mut self, id: &str, has_click_handler: bool) -> Option<MapEvent> {
        let (session, config) = self.ready_mut()?;
        session.region_enter(id, has_click_handler, config)
    }

    pub fn region_move(&self, id: &str, screen: Point) -> Option<MapEvent> {
        self.session()?.region_move(id, screen)
    }

    pub fn region_leave(&mut self, id: &str) -> Option<MapEvent> {
        let (session, _) = self.ready_mut()?;
        session.region_leave(id)
    }

    pub fn region_click(&mut self, id: &str, has_click_handler: bool) -> Option<MapEvent> {
        let (session, config) = self.ready_mut()?;
        session.region_click(id, has_click_handler, config)
    }
}
