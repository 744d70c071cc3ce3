/*
 *  screen.rs
 *
 *  PhotoGallery - responsive grid, banner aware
 *  (c) 2020-26 Stuart Hunter
 *
 *  Gallery screen - routes platform, ad and icon events into layout state
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

use crate::ads::{AdDispatcher, AdEvent, AdOutcome, AdRequest, AdToken, BannerLoader};
use crate::icons::{apply_icon_urls, IconClient, IconLookupError, IconMap};
use crate::inset::{AdAwareInsetController, InsetConfig, InsetUpdate, SystemInsets};
use crate::layout::{classify, DisplayMetrics, GridSpacing, LayoutError, LayoutProfile, Orientation};
use crate::state::{lock, SharedState};

/// Everything the screen reacts to, delivered in order on one channel
#[derive(Debug)]
pub enum ScreenEvent {
    /// Window resized or rotated
    ConfigurationChanged { display: DisplayMetrics, orientation: Orientation },

    /// New system bar and cutout insets
    InsetsApplied(SystemInsets),

    /// Outcome of a banner load
    Ad(AdEvent),

    /// Ad container height after a layout pass, for the current banner
    AdContainerMeasured(u32),

    /// Drop the current banner and load another
    ReloadAd,

    /// Icon url lookup finished
    IconsResolved(Result<Arc<IconMap>, IconLookupError>),

    ScrollTo(i64),

    Select(usize),

    Shutdown,
}

impl From<AdEvent> for ScreenEvent {
    fn from(event: AdEvent) -> Self {
        ScreenEvent::Ad(event)
    }
}

#[derive(Debug, Clone)]
pub struct GallerySettings {
    pub insets: InsetConfig,
    pub ad_unit_id: String,
}

/// The gallery screen's single owner of layout and inset state.
///
/// All mutation happens in `handle`, one event at a time, so ad and icon
/// results racing against rotations are just events in a queue.
pub struct GalleryScreen<L: BannerLoader> {
    settings: GallerySettings,
    display: DisplayMetrics,
    profile: LayoutProfile,
    spacing: GridSpacing,
    controller: AdAwareInsetController,
    dispatcher: AdDispatcher<L, ScreenEvent>,
    icons: Option<IconClient>,
    state: SharedState,
    events: mpsc::UnboundedSender<ScreenEvent>,
}

impl<L: BannerLoader> GalleryScreen<L> {
    /// Classify the initial window and build the screen. The returned
    /// receiver carries every event for `run`.
    pub fn new(
        settings: GallerySettings,
        display: DisplayMetrics,
        orientation: Orientation,
        loader: L,
        icons: Option<IconClient>,
        state: SharedState,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ScreenEvent>), LayoutError> {
        let profile = classify(&display.screen_metrics(orientation)?);
        let spacing = GridSpacing::for_profile(&profile, &display)?;
        debug!("{}", profile);

        let (tx, rx) = mpsc::unbounded_channel();
        let controller = AdAwareInsetController::new(settings.insets, profile, display);
        let dispatcher = AdDispatcher::new(loader, tx.clone());

        let screen = Self {
            settings,
            display,
            profile,
            spacing,
            controller,
            dispatcher,
            icons,
            state,
            events: tx,
        };
        Ok((screen, rx))
    }

    /// Sender for platform events
    pub fn sender(&self) -> mpsc::UnboundedSender<ScreenEvent> {
        self.events.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<InsetUpdate> {
        self.controller.subscribe()
    }

    pub fn profile(&self) -> &LayoutProfile {
        &self.profile
    }

    pub fn spacing(&self) -> &GridSpacing {
        &self.spacing
    }

    pub fn controller(&self) -> &AdAwareInsetController {
        &self.controller
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Load the first banner and, once per session, the icon urls
    pub fn start(&mut self) {
        let token = self.controller.current_token();
        self.load_banner(token);
        self.spawn_icon_lookup();
    }

    /// Apply one event. Returns false once the screen has shut down.
    pub fn handle(&mut self, event: ScreenEvent) -> bool {
        match event {
            ScreenEvent::ConfigurationChanged { display, orientation } => {
                self.on_configuration_changed(display, orientation);
            }
            ScreenEvent::InsetsApplied(insets) => {
                self.controller.on_system_insets_changed(insets);
            }
            ScreenEvent::Ad(AdEvent { token, outcome }) => match outcome {
                AdOutcome::Loaded { measured_height_px } => {
                    self.controller.on_ad_height_resolved(token, measured_height_px);
                }
                AdOutcome::Failed(err) => {
                    self.controller.on_ad_load_failed(token, &err);
                }
            },
            ScreenEvent::AdContainerMeasured(height_px) => {
                let token = self.controller.current_token();
                self.controller.on_ad_height_resolved(token, height_px);
            }
            ScreenEvent::ReloadAd => self.reload_banner(),
            ScreenEvent::IconsResolved(result) => self.on_icons_resolved(result),
            ScreenEvent::ScrollTo(position) => {
                lock(&self.state).set_scroll_position(position);
            }
            ScreenEvent::Select(position) => {
                let mut state = lock(&self.state);
                if state.select(position) {
                    if let Some((item, _)) = state.selected() {
                        info!("Selected {} ({})", item.title, item.id);
                    }
                } else {
                    warn!("No item at position {}", position);
                }
            }
            ScreenEvent::Shutdown => {
                info!("Gallery screen shutting down");
                self.dispatcher.cancel();
                return false;
            }
        }
        true
    }

    /// Drain events until shutdown
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<ScreenEvent>) {
        while let Some(event) = events.recv().await {
            if !self.handle(event) {
                break;
            }
        }
    }

    fn on_configuration_changed(&mut self, display: DisplayMetrics, orientation: Orientation) {
        let metrics = match display.screen_metrics(orientation) {
            Ok(m) => m,
            Err(e) => {
                warn!("Ignoring configuration change: {}", e);
                return;
            }
        };
        let profile = classify(&metrics);
        if profile.category != self.profile.category {
            info!("Screen category {} -> {}", self.profile.category, profile.category);
        }
        debug!("{}", profile);

        match GridSpacing::for_profile(&profile, &display) {
            Ok(spacing) => self.spacing = spacing,
            Err(e) => warn!("Keeping previous grid spacing: {}", e),
        }
        self.display = display;
        self.profile = profile;
        debug!("Scroll position kept at {}", lock(&self.state).scroll_position());

        self.controller.on_layout_profile_changed(profile, display);

        // the banner is sized to the window, so a new window needs a new banner
        self.reload_banner();
    }

    fn reload_banner(&mut self) {
        let token = self.controller.on_reload_requested();
        self.load_banner(token);
    }

    fn load_banner(&mut self, token: AdToken) {
        let request = AdRequest::for_display(
            &self.settings.ad_unit_id,
            &self.display,
            &self.controller.compute_ad_margins(),
            self.profile.orientation,
        );
        self.dispatcher.dispatch(token, request);
    }

    fn spawn_icon_lookup(&self) {
        let Some(client) = self.icons.clone() else {
            return;
        };
        {
            let mut state = lock(&self.state);
            if state.icon_urls_loaded() {
                debug!("Icon urls already loaded this session");
                return;
            }
            state.set_loading(true);
        }

        let events = self.events.clone();
        tokio::spawn(async move {
            let result = client.lookup().await;
            if events.send(ScreenEvent::IconsResolved(result)).is_err() {
                debug!("Icon urls arrived after the screen closed");
            }
        });
    }

    fn on_icons_resolved(&mut self, result: Result<Arc<IconMap>, IconLookupError>) {
        let mut state = lock(&self.state);
        state.set_loading(false);
        match result {
            Ok(map) => {
                let updated = apply_icon_urls(state.menu_mut(), &map);
                state.set_icon_urls_loaded(true);
                state.touch();
                info!("Icon urls applied to {} of {} items", updated, state.item_count());
            }
            Err(e) => warn!("Icon url lookup failed: {}", e),
        }
    }
}
