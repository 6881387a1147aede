//! The drop-in navigation view
//!
//! Once started, the view extracts the launch data from the
//! [`NavigationViewOptions`]: either a ready route or a pair of coordinates for
//! which the route view-model fetches one. As soon as a route is published the
//! session begins.
//!
//! Hosts drive the view in this order:
//!
//! 1. [`NavigationView::builder`] with the inflated components, the session
//!    handle and the view-models
//! 2. [`NavigationView::on_create`] with the saved state, if any
//! 3. [`NavigationView::get_navigation_async`] with the host listener
//! 4. [`NavigationView::on_map_ready`] once the map engine is loaded
//! 5. [`NavigationView::start_navigation`] after `on_navigation_ready`

use crate::bound::{BoundViews, MapLayers};
use crate::collaborators::{LocationLayer, MapEngine, ViewComponents};
use crate::config::NavigationViewConfig;
use crate::contract::NavigationContract;
use crate::listener::{NavigationViewListener, RouteListener};
use crate::presenter::NavigationPresenter;
use crate::state::{SavedViewState, StateBundle};
use crate::subscriptions::{Binding, SubscriptionGroup};
use crate::widgets::BottomSheetState;
use nv_core::{
    LifecycleEvent, LifecycleObserver, Location, NavigationViewError, NavigationViewOptions, ObserverId, Result,
    Route, SessionHandle, ViewModels,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Builder injecting the host capabilities the view depends on
pub struct NavigationViewBuilder {
    components: ViewComponents,
    config: NavigationViewConfig,
    session: Option<Arc<dyn SessionHandle>>,
    view_models: Option<ViewModels>,
}

impl NavigationViewBuilder {
    pub fn config(mut self, config: NavigationViewConfig) -> Self {
        self.config = config;
        self
    }

    /// Lifecycle hooks of the hosting screen
    pub fn session(mut self, session: Arc<dyn SessionHandle>) -> Self {
        self.session = Some(session);
        self
    }

    /// View-models scoped to the hosting screen
    pub fn view_models(mut self, view_models: ViewModels) -> Self {
        self.view_models = Some(view_models);
        self
    }

    /// Build the view and attach it to the host lifecycle.
    ///
    /// Fails when the host did not provide a session handle or view-models.
    pub fn build(self) -> Result<NavigationView> {
        let view_models = self
            .view_models
            .ok_or(NavigationViewError::MissingCapability("view-model provider"))?;
        let session = self
            .session
            .ok_or(NavigationViewError::MissingCapability("lifecycle session"))?;

        let views = Arc::new(BoundViews::new(self.components, self.config));
        views.set_summary_behavior_hideable(false);

        let views_observer: Arc<dyn LifecycleObserver> = views.clone();
        let registration = session.register(views_observer);

        Ok(NavigationView {
            views,
            view_models,
            session,
            presenter: None,
            subscriptions: None,
            registrations: vec![registration],
        })
    }
}

pub struct NavigationView {
    views: Arc<BoundViews>,
    view_models: ViewModels,
    session: Arc<dyn SessionHandle>,
    presenter: Option<Arc<NavigationPresenter>>,
    /// Active bindings and their registration with the session
    subscriptions: Option<(Arc<SubscriptionGroup>, ObserverId)>,
    /// Everything else this view registered with the session
    registrations: Vec<ObserverId>,
}

impl NavigationView {
    pub fn builder(components: ViewComponents) -> NavigationViewBuilder {
        NavigationViewBuilder {
            components,
            config: NavigationViewConfig::default(),
            session: None,
            view_models: None,
        }
    }

    /// A saved state marks the view as restoring: the camera will not
    /// re-frame the route and resumes on the next location instead.
    pub fn on_create(&self, saved_state: Option<&StateBundle>) {
        let restoring = saved_state.is_some();
        self.views.set_resume_state(restoring);
        self.views.components().map_surface.on_create(restoring);
    }

    pub fn on_low_memory(&self) {
        self.views.components().map_surface.on_low_memory();
    }

    /// Returns `true` when the back press closed the instruction list
    pub fn on_back_pressed(&self) -> bool {
        let panel = &self.views.components().instruction_panel;
        if panel.is_showing_instruction_list() {
            panel.hide_instruction_list();
            return true;
        }
        false
    }

    /// Store the bottom sheet state, recenter visibility and map keys
    pub fn on_save_instance_state(&self, bundle: &mut StateBundle) -> Result<()> {
        SavedViewState {
            bottom_sheet_state: self.views.summary_state(),
            recenter_btn_visible: self.views.is_recenter_btn_visible(),
        }
        .write_to(bundle)?;
        self.views.components().map_surface.on_save_instance_state(bundle);
        Ok(())
    }

    pub fn on_restore_instance_state(&self, bundle: &StateBundle) -> Result<()> {
        let saved = SavedViewState::read_from(bundle)?;
        self.views.set_recenter_btn_visible(saved.recenter_btn_visible);
        self.views.reset_bottom_sheet_state(saved.bottom_sheet_state);
        Ok(())
    }

    /// Register the host listener and ask the surface for the map
    pub fn get_navigation_async(&self, listener: Arc<dyn NavigationViewListener>) {
        self.views.set_navigation_listener(listener);
        self.views.components().map_surface.request_map();
    }

    /// Finish setting up once the map engine is loaded, then signal
    /// `on_navigation_ready`.
    pub fn on_map_ready(&mut self, engine: Arc<dyn MapEngine>) {
        let config = self.views.config().clone();
        engine.set_style(config.theme.map_style());
        let padding = config
            .map_padding_bottom
            .unwrap_or_else(|| self.views.components().summary_sheet.height());
        engine.set_padding(0.0, 0.0, 0.0, padding);

        let route_layer = engine.create_route_layer(&config.theme.route_style, &config.route_below_layer);
        let location_layer = engine.create_location_layer();
        self.views.set_map(MapLayers {
            engine: engine.clone(),
            route_layer,
            location_layer: location_layer.clone(),
            camera: None,
        });

        self.init_lifecycle_observers(location_layer);

        let contract: Arc<dyn NavigationContract> = self.views.clone();
        let presenter = Arc::new(NavigationPresenter::new(contract));
        self.views.set_presenter(&presenter);
        self.presenter = Some(presenter.clone());

        let views = Arc::downgrade(&self.views);
        let presenter = Arc::downgrade(&presenter);
        engine.set_on_scroll_listener(Box::new(move || {
            let (Some(views), Some(presenter)) = (views.upgrade(), presenter.upgrade()) else {
                return;
            };
            if views.summary_state() != BottomSheetState::Hidden {
                presenter.on_map_scroll();
            }
        }));

        debug!("map ready, navigation view initialized");
        if let Some(listener) = self.views.navigation_listener() {
            listener.on_navigation_ready();
        }
    }

    /// Location layer and view-models follow the host lifecycle from here on
    fn init_lifecycle_observers(&mut self, location_layer: Arc<dyn LocationLayer>) {
        let observers: [Arc<dyn LifecycleObserver>; 3] = [
            Arc::new(ForwardLifecycle(location_layer)),
            Arc::new(ForwardLifecycle(self.view_models.location.clone())),
            Arc::new(ForwardLifecycle(self.view_models.navigation.clone())),
        ];
        for observer in observers {
            let id = self.session.register(observer);
            self.registrations.push(id);
        }
    }

    /// The user panned the map
    pub fn on_scroll(&self) {
        if self.views.summary_state() == BottomSheetState::Hidden {
            return;
        }
        if let Some(presenter) = &self.presenter {
            presenter.on_map_scroll();
        }
    }

    pub fn on_cancel_click(&self) {
        if let Some(presenter) = &self.presenter {
            presenter.on_cancel_btn_click();
        }
    }

    pub fn on_recenter_click(&self) {
        if let Some(presenter) = &self.presenter {
            presenter.on_recenter_click();
        }
    }

    /// Start the session: configure the engine, create the camera, subscribe
    /// to the view-models and hand over the launch data.
    pub fn start_navigation(&mut self, options: &NavigationViewOptions) -> Result<()> {
        let map = self
            .views
            .map()
            .ok_or(NavigationViewError::NotReady("map engine not loaded"))?;
        if self.is_subscribed() {
            return Err(NavigationViewError::AlreadySubscribed);
        }

        self.view_models.navigation.initialize_navigation_options(
            options.navigation_options.clone().with_from_navigation_ui(true),
        );
        self.views.set_camera(map.engine.create_camera());
        self.subscribe()?;

        info!(simulate = options.should_simulate_route, "starting navigation");
        self.view_models.route.extract_launch_data(options);
        Ok(())
    }

    /// Attach the view-model bindings. Only one group may be active.
    pub fn subscribe(&mut self) -> Result<()> {
        if self.is_subscribed() {
            return Err(NavigationViewError::AlreadySubscribed);
        }
        let presenter = self
            .presenter
            .clone()
            .ok_or(NavigationViewError::NotReady("presenter not created"))?;

        let group = Arc::new(SubscriptionGroup::bind(
            self.view_models.clone(),
            presenter,
            self.views.clone(),
        ));
        let observer: Arc<dyn LifecycleObserver> = group.clone();
        let registration = self.session.register(observer);
        self.subscriptions = Some((group, registration));
        Ok(())
    }

    /// Detach the view-model bindings ahead of the host's destroy event
    pub fn unsubscribe(&mut self) {
        if let Some((group, registration)) = self.subscriptions.take() {
            group.teardown();
            self.session.unregister(registration);
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscriptions
            .as_ref()
            .is_some_and(|(group, _)| group.is_active())
    }

    /// Bindings of the active session, empty when not subscribed
    pub fn active_bindings(&self) -> Vec<Binding> {
        self.subscriptions
            .as_ref()
            .filter(|(group, _)| group.is_active())
            .map(|(group, _)| group.bindings())
            .unwrap_or_default()
    }

    pub fn start_camera(&self, route: &Route) {
        self.views.start_camera(route);
    }

    pub fn resume_camera(&self, location: &Location) {
        self.views.resume_camera(location);
    }

    /// Set or clear the reroute delegate
    pub fn set_route_listener(&self, listener: Option<Arc<dyn RouteListener>>) {
        self.views.set_route_listener(listener);
    }

    pub fn summary_state(&self) -> BottomSheetState {
        self.views.summary_state()
    }

    pub fn is_summary_hideable(&self) -> bool {
        self.views.is_summary_hideable()
    }

    pub fn is_recenter_btn_visible(&self) -> bool {
        self.views.is_recenter_btn_visible()
    }

    pub fn is_resume_state(&self) -> bool {
        self.views.is_resume_state()
    }
}

impl Drop for NavigationView {
    fn drop(&mut self) {
        self.unsubscribe();
        for id in self.registrations.drain(..) {
            self.session.unregister(id);
        }
    }
}

/// Registers a component whose lifecycle hooks live on a wider trait object
struct ForwardLifecycle<T: ?Sized>(Arc<T>);

impl<T: LifecycleObserver + ?Sized> LifecycleObserver for ForwardLifecycle<T> {
    fn on_lifecycle_event(&self, event: LifecycleEvent) {
        self.0.on_lifecycle_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_route, Call, Harness};
    use crate::state::{BOTTOM_SHEET_STATE, RECENTER_BTN_VISIBLE};
    use nv_core::LifecycleRegistry;

    fn components() -> ViewComponents {
        let harness = Harness::new();
        harness.view.views.components().clone()
    }

    #[test]
    fn test_build_requires_view_models() {
        let result = NavigationView::builder(components())
            .session(Arc::new(LifecycleRegistry::new()))
            .build();
        assert!(matches!(
            result,
            Err(NavigationViewError::MissingCapability("view-model provider"))
        ));
    }

    #[test]
    fn test_build_requires_session() {
        let harness = Harness::new();
        let view_models = Harness::view_models_of(&harness.location, &harness.route, &harness.navigation);
        let result = NavigationView::builder(components()).view_models(view_models).build();
        assert!(matches!(
            result,
            Err(NavigationViewError::MissingCapability("lifecycle session"))
        ));
    }

    #[test]
    fn test_new_view_has_fixed_expanded_sheet() {
        let harness = Harness::new();
        assert_eq!(harness.view.summary_state(), BottomSheetState::Expanded);
        assert!(!harness.view.is_summary_hideable());
        assert!(!harness.view.is_recenter_btn_visible());
    }

    #[test]
    fn test_start_before_map_ready_is_not_ready() {
        let mut harness = Harness::new();
        let options = NavigationViewOptions::from_route(sample_route());
        assert!(matches!(
            harness.view.start_navigation(&options),
            Err(NavigationViewError::NotReady(_))
        ));
        assert!(!harness.view.is_subscribed());
    }

    #[test]
    fn test_map_ready_sets_up_layers_and_signals_ready() {
        let harness = Harness::ready(None);
        let calls = harness.log.calls();

        assert_eq!(calls[0], Call::MapCreate(false));
        assert_eq!(calls[1], Call::RequestMap);
        assert!(calls.iter().any(|call| matches!(call, Call::SetStyle(_))));
        assert!(calls.contains(&Call::SetPadding(180.0)));
        assert!(calls.contains(&Call::LayerLifecycle(LifecycleEvent::Create)));
        assert!(calls.contains(&Call::ViewModelLifecycle("location", LifecycleEvent::Create)));
        assert!(calls.contains(&Call::ViewModelLifecycle("navigation", LifecycleEvent::Create)));
        assert_eq!(calls.last(), Some(&Call::Ready));
    }

    #[test]
    fn test_start_navigation_marks_options_and_extracts_launch_data() {
        let harness = Harness::started(None);
        let calls = harness.log.calls();

        let init = calls
            .iter()
            .find_map(|call| match call {
                Call::InitOptions(options) => Some(options.clone()),
                _ => None,
            })
            .unwrap();
        assert!(init.from_navigation_ui);
        assert!(calls.contains(&Call::ExtractLaunchData));
        assert!(harness.view.is_subscribed());
    }

    #[test]
    fn test_start_navigation_twice_fails() {
        let mut harness = Harness::started(None);
        let options = NavigationViewOptions::from_route(sample_route());
        assert!(matches!(
            harness.view.start_navigation(&options),
            Err(NavigationViewError::AlreadySubscribed)
        ));
        assert_eq!(harness.log.count(|call| *call == Call::ExtractLaunchData), 1);
    }

    #[test]
    fn test_lifecycle_reaches_map_surface() {
        let harness = Harness::ready(None);
        harness.registry.handle_event(LifecycleEvent::Start);
        harness.registry.handle_event(LifecycleEvent::Resume);
        harness.registry.handle_event(LifecycleEvent::Pause);

        let calls = harness.log.calls();
        assert!(calls.contains(&Call::MapLifecycle(LifecycleEvent::Start)));
        assert!(calls.contains(&Call::MapLifecycle(LifecycleEvent::Resume)));
        assert!(calls.contains(&Call::MapLifecycle(LifecycleEvent::Pause)));
        assert!(calls.contains(&Call::LayerLifecycle(LifecycleEvent::Pause)));
    }

    #[test]
    fn test_low_memory_forwarded() {
        let harness = Harness::new();
        harness.view.on_low_memory();
        assert_eq!(harness.log.calls(), vec![Call::MapLowMemory]);
    }

    #[test]
    fn test_scroll_hides_sheet_and_shows_recenter() {
        let harness = Harness::started(None);
        harness.view.on_scroll();

        assert_eq!(harness.view.summary_state(), BottomSheetState::Hidden);
        assert!(harness.view.is_recenter_btn_visible());
        assert!(harness.log.calls().contains(&Call::CameraTracking(false)));

        harness.log.clear();
        harness.view.on_scroll();
        assert!(harness.log.calls().is_empty());
    }

    #[test]
    fn test_recenter_click_resumes_following() {
        let harness = Harness::started(None);
        harness.view.on_scroll();
        harness.log.clear();

        harness.view.on_recenter_click();

        assert_eq!(harness.view.summary_state(), BottomSheetState::Expanded);
        assert!(!harness.view.is_summary_hideable());
        assert!(!harness.view.is_recenter_btn_visible());
        assert_eq!(
            harness.log.calls(),
            vec![Call::CameraTracking(true), Call::CameraReset]
        );
    }

    #[test]
    fn test_cancel_finishes_navigation() {
        let harness = Harness::started(None);
        harness.view.on_cancel_click();
        assert_eq!(harness.log.count(|call| *call == Call::Finished), 1);
    }

    #[test]
    fn test_back_press_closes_instruction_list() {
        let harness = Harness::new();
        assert!(!harness.view.on_back_pressed());

        harness
            .instruction_panel
            .showing_list
            .store(true, std::sync::atomic::Ordering::SeqCst);
        assert!(harness.view.on_back_pressed());
        assert!(harness.log.calls().contains(&Call::HideInstructionList));
        assert!(!harness.view.on_back_pressed());
    }

    #[test]
    fn test_saved_state_round_trip_across_recreation() {
        let harness = Harness::started(None);
        harness.view.on_scroll();

        let mut bundle = StateBundle::new();
        harness.view.on_save_instance_state(&mut bundle).unwrap();
        assert!(bundle.contains_key(BOTTOM_SHEET_STATE));
        assert!(bundle.get_bool(RECENTER_BTN_VISIBLE));
        assert!(bundle.get_bool("map_saved"));
        let persisted = bundle.to_json().unwrap();
        drop(harness);

        let restored = StateBundle::from_json(&persisted).unwrap();
        let recreated = Harness::started(Some(&restored));
        recreated.view.on_restore_instance_state(&restored).unwrap();

        assert!(recreated.view.is_resume_state());
        assert!(recreated.view.is_recenter_btn_visible());
        assert_eq!(recreated.view.summary_state(), BottomSheetState::Hidden);
        assert!(recreated.view.is_summary_hideable());
        assert!(recreated.log.calls().contains(&Call::MapCreate(true)));
    }

    #[test]
    fn test_restored_expanded_sheet_is_not_hideable() {
        let harness = Harness::ready(None);
        let mut bundle = StateBundle::new();
        bundle.put(BOTTOM_SHEET_STATE, &BottomSheetState::Expanded).unwrap();
        bundle.put_bool(RECENTER_BTN_VISIBLE, false);

        harness.view.on_restore_instance_state(&bundle).unwrap();

        assert_eq!(harness.view.summary_state(), BottomSheetState::Expanded);
        assert!(!harness.view.is_summary_hideable());
    }

    #[test]
    fn test_drop_unregisters_from_session() {
        let harness = Harness::started(None);
        let registry = harness.registry.clone();
        // view widgets, location layer, two view-models, subscriptions
        assert_eq!(registry.observer_count(), 5);

        drop(harness);
        assert_eq!(registry.observer_count(), 0);
    }

    #[test]
    fn test_explicit_camera_calls_respect_guards() {
        let harness = Harness::started(None);
        harness.log.clear();

        harness.view.start_camera(&sample_route());
        harness.view.resume_camera(&nv_core::Location::new(1.0, 1.0));

        assert_eq!(harness.log.calls(), vec![Call::CameraStart(sample_route())]);
    }
}
