//! Session — the interaction loop that ties input, search, store and surface
//! together.
//!
//! ```text
//! text input ──► on_query_input ──► SearchCoordinator ──► ViewStore
//!                                                            │
//!                    surface.show_results ◄── sync ◄── Notification
//!
//! surface events ──► on_camera_move ──► ViewStore.camera
//!                └─► on_record_activated ──► surface.request_camera_transition(Ease)
//! reset ──────────► on_reset ──► surface.request_camera_transition(Fly)
//! ```
//!
//! The session never moves the camera itself. Transition requests go to the
//! surface, which animates and reports every intermediate position back
//! through [`Session::on_camera_move`]. The store therefore always follows
//! the surface.

use crate::config::Config;
use crate::dataset;
use crate::error::DatasetError;
use crate::index::{QueryIndex, RecordSource};
use crate::route::{DirectRoute, Polyline, RouteProvider};
use crate::search::{Outcome, SearchCoordinator};
use crate::store::{Changes, Notification, ViewStore};
use crate::surface::{InteractionSurface, SurfaceEvent, Transition};
use crate::types::{CameraState, Record};
use std::path::Path;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub struct Session<S> {
    search: SearchCoordinator<S>,
    home: CameraState,
    route: Option<Polyline>,
}

impl Session<QueryIndex> {
    /// Build a session over the configured dataset.
    ///
    /// `dataset_override` wins over `config.dataset.path`; with neither, the
    /// bundled ports are used. The route is computed once here.
    pub fn bootstrap(
        config: &Config,
        dataset_override: Option<&Path>,
        runtime: Handle,
    ) -> Result<Self, DatasetError> {
        let records = match dataset_override.or_else(|| config.dataset.path()) {
            Some(path) => dataset::load(path)?,
            None => dataset::bundled(),
        };
        tracing::info!(records = records.len(), "query index seeded");

        let home = config.camera.camera();
        let store = ViewStore::new(home);
        let search = SearchCoordinator::new(QueryIndex::new(records), store, runtime);

        let route = config.ui.show_route.then(|| {
            let (origin, destination) = config.route_endpoints();
            DirectRoute.route(origin, destination)
        });

        Ok(Self::new(search, home, route))
    }

    /// Every record in the index, for drawing.
    pub fn records(&self) -> &[Record] {
        self.search.source().records()
    }
}

impl<S: RecordSource> Session<S> {
    pub fn new(search: SearchCoordinator<S>, home: CameraState, route: Option<Polyline>) -> Self {
        Self {
            search,
            home,
            route,
        }
    }

    pub fn store(&self) -> &ViewStore {
        self.search.store()
    }

    /// Camera used for the initial view and for reset.
    pub fn home(&self) -> CameraState {
        self.home
    }

    pub fn route(&self) -> Option<&Polyline> {
        self.route.as_ref()
    }

    /// The text input changed. Empty input clears the results.
    pub fn on_query_input(&self, query: &str) -> Option<JoinHandle<Outcome>> {
        self.search.submit(query)
    }

    /// The surface reports its camera moved.
    pub fn on_camera_move(&self, camera: CameraState) -> Changes {
        self.store().set_camera(camera)
    }

    /// A record was picked: glide to it, keeping the current zoom.
    pub fn on_record_activated(
        &self,
        record: &Record,
        surface: &mut impl InteractionSurface,
    ) -> CameraState {
        let target = self.store().state().camera.centered_on(record.coordinates);
        tracing::debug!(record = record.display_name(), ?target, "session: record activated");
        surface.request_camera_transition(target, Transition::Ease);
        target
    }

    /// Fly back to the configured home camera.
    pub fn on_reset(&self, surface: &mut impl InteractionSurface) -> CameraState {
        tracing::debug!(target = ?self.home, "session: reset");
        surface.request_camera_transition(self.home, Transition::Fly);
        self.home
    }

    /// Route a surface event to its handler.
    pub fn handle(&self, event: SurfaceEvent, surface: &mut impl InteractionSurface) {
        match event {
            SurfaceEvent::CameraMoved(camera) => {
                self.on_camera_move(camera);
            }
            SurfaceEvent::RecordActivated(record) => {
                self.on_record_activated(&record, surface);
            }
        }
    }

    /// Forward a store notification to the surface.
    pub fn sync(&self, notification: &Notification, surface: &mut impl InteractionSurface) {
        if notification.changes.results {
            surface.show_results(&notification.state.results);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coordinates, ResultSet};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder {
        transitions: Vec<(CameraState, Transition)>,
        shown: Vec<usize>,
    }

    impl InteractionSurface for Recorder {
        fn request_camera_transition(&mut self, target: CameraState, transition: Transition) {
            self.transitions.push((target, transition));
        }

        fn show_results(&mut self, results: &ResultSet) {
            self.shown.push(results.len());
        }
    }

    fn session() -> Session<QueryIndex> {
        let mut config = Config::defaults();
        config.ui.show_route = true;
        Session::bootstrap(&config, None, Handle::current()).unwrap()
    }

    #[tokio::test]
    async fn bootstrap_uses_bundled_ports_and_home_camera() {
        let s = session();
        assert!(!s.records().is_empty());
        assert_eq!(s.store().state().camera, Config::defaults().camera.camera());
        assert_eq!(s.route().map(|r| r.points.len()), Some(2));
    }

    #[tokio::test]
    async fn activation_keeps_current_zoom() {
        let s = session();
        s.on_camera_move(CameraState::new(Coordinates::new(0.0, 0.0), 4.0));
        let mut surface = Recorder::default();
        let valencia = Record::new("Valencia", Coordinates::new(-0.318433451, 39.44416667));
        s.handle(SurfaceEvent::RecordActivated(valencia), &mut surface);
        assert_eq!(
            surface.transitions,
            vec![(
                CameraState::new(Coordinates::new(-0.318433451, 39.44416667), 4.0),
                Transition::Ease
            )]
        );
    }

    #[tokio::test]
    async fn reset_flies_home() {
        let s = session();
        s.on_camera_move(CameraState::new(Coordinates::new(10.0, 10.0), 1.0));
        let mut surface = Recorder::default();
        let target = s.on_reset(&mut surface);
        assert_eq!(target, s.home());
        assert_eq!(surface.transitions, vec![(s.home(), Transition::Fly)]);
    }

    #[tokio::test]
    async fn sync_only_renders_result_changes() {
        let s = session();
        let mut rx = s.store().subscribe_channel();
        let mut surface = Recorder::default();

        s.on_camera_move(CameraState::new(Coordinates::new(1.0, 1.0), 2.0));
        s.on_query_input("osaka").unwrap().await.unwrap();
        while let Ok(n) = rx.try_recv() {
            s.sync(&n, &mut surface);
        }
        assert_eq!(surface.shown, vec![1]);
    }
}
