//! Navigation simulator entry point
//!
//! Drives a [`NavigationView`] against simulated view-models and logs what
//! each widget would render. Halfway through, the screen is recreated from
//! its saved state the way a device rotation would.

use anyhow::{Context, Result};
use clap::Parser;
use nv_core::{
    LifecycleEvent, LifecycleRegistry, Location, NavigationViewOptions, Point, ViewModels,
};
use nv_view::{NavigationView, NavigationViewConfig, StateBundle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

mod console;
mod demo;

use console::{HostListener, LoggingRouteListener, Screen};
use demo::{SimLocationViewModel, SimNavigationViewModel, SimRouteViewModel};

const SCROLL_AT_TICK: usize = 3;
const ROTATE_AT_TICK: usize = 5;
const RECENTER_AT_TICK: usize = 7;
const OFF_ROUTE_AT_TICK: usize = 9;
const BACK_PRESS_AT_TICK: usize = 12;

#[derive(Debug, Parser)]
#[command(name = "navsim")]
#[command(about = "Simulate a navigation session and log what the view renders")]
struct Args {
    /// Launch options as JSON (route or coordinates)
    #[arg(long)]
    options: Option<PathBuf>,

    /// View configuration as JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Milliseconds between simulation ticks
    #[arg(long, default_value = "400")]
    tick_ms: u64,
}

/// One instance of the hosting screen
struct ScreenSession {
    registry: Arc<LifecycleRegistry>,
    view: NavigationView,
    screen: Screen,
    listener: Arc<HostListener>,
}

impl ScreenSession {
    async fn open(
        config: NavigationViewConfig,
        view_models: ViewModels,
        options: &NavigationViewOptions,
        saved: Option<&StateBundle>,
    ) -> Result<Self> {
        let screen = Screen::inflate();
        let registry = Arc::new(LifecycleRegistry::new());
        let mut view = NavigationView::builder(screen.components.clone())
            .config(config)
            .session(registry.clone())
            .view_models(view_models)
            .build()?;

        view.on_create(saved);
        if let Some(bundle) = saved {
            view.on_restore_instance_state(bundle)?;
        }
        for event in [LifecycleEvent::Create, LifecycleEvent::Start, LifecycleEvent::Resume] {
            registry.handle_event(event);
        }

        let listener = Arc::new(HostListener::default());
        view.get_navigation_async(listener.clone());
        let engine = screen.surface.map_requested().await;
        view.on_map_ready(engine);
        listener.ready.notified().await;

        view.set_route_listener(Some(Arc::new(LoggingRouteListener)));
        view.start_navigation(options)?;

        Ok(Self {
            registry,
            view,
            screen,
            listener,
        })
    }

    fn save(&self) -> Result<StateBundle> {
        let mut bundle = StateBundle::new();
        self.view.on_save_instance_state(&mut bundle)?;
        Ok(bundle)
    }

    fn close(self) {
        for event in [LifecycleEvent::Pause, LifecycleEvent::Stop, LifecycleEvent::Destroy] {
            self.registry.handle_event(event);
        }
    }
}

fn default_options() -> NavigationViewOptions {
    NavigationViewOptions::from_coordinates(
        Point::from_lng_lat(-77.0365, 38.8977),
        Point::from_lng_lat(-77.0090, 38.8899),
    )
    .simulate(true)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let args = Args::parse();
    let options = match &args.options {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            NavigationViewOptions::from_json(&json)?
        }
        None => default_options(),
    };
    let config = match &args.config {
        Some(path) => NavigationViewConfig::load(path)?,
        None => NavigationViewConfig::default(),
    };
    info!(theme = %config.theme.name, "navigation simulator");

    let location = Arc::new(SimLocationViewModel::new(options.should_simulate_route));
    let route = Arc::new(SimRouteViewModel::new());
    let navigation = Arc::new(SimNavigationViewModel::new(Some(OFF_ROUTE_AT_TICK)));
    let view_models = ViewModels {
        location: location.clone(),
        route,
        navigation: navigation.clone(),
    };

    if let nv_core::LaunchData::Coordinates { origin, .. } = &options.launch {
        location.feed(
            Location::new(origin.latitude, origin.longitude)
                .with_timestamp(chrono::Utc::now().timestamp_millis())
                .with_provider("gps"),
        );
    }

    let mut session = ScreenSession::open(config.clone(), view_models.clone(), &options, None).await?;

    let mut interval = tokio::time::interval(Duration::from_millis(args.tick_ms));
    let mut tick = 0;
    loop {
        interval.tick().await;
        tick += 1;

        match tick {
            SCROLL_AT_TICK => session.screen.surface.engine().scroll(),
            ROTATE_AT_TICK => {
                let bundle = session.save()?;
                info!(saved = %serde_json::to_string(&bundle)?, "recreating screen");
                session.close();
                session = ScreenSession::open(config.clone(), view_models.clone(), &options, Some(&bundle)).await?;
            }
            RECENTER_AT_TICK => session.view.on_recenter_click(),
            BACK_PRESS_AT_TICK => {
                session.screen.instruction_panel.open_instruction_list();
                if !session.view.on_back_pressed() {
                    warn!("back press not consumed");
                }
            }
            _ => {}
        }

        if !navigation.tick() {
            break;
        }
    }

    tokio::time::timeout(Duration::from_secs(1), session.listener.finished.notified())
        .await
        .context("navigation never finished")?;
    session.view.on_cancel_click();
    session.close();
    Ok(())
}
