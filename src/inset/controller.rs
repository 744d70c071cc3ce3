/*
 *  inset/controller.rs
 *
 *  PhotoGallery - responsive grid, banner aware
 *  (c) 2020-26 Stuart Hunter
 *
 *  Ad aware inset controller - reconciles grid padding against a banner
 *  whose height arrives asynchronously
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

use log::{debug, error, info, warn};
use tokio::sync::watch;

use super::state::{AdContainerMargins, AdHeightState, InsetUpdate, ReservedSpace, SystemInsets};
use crate::ads::{AdLoadError, AdToken};
use crate::layout::{DisplayMetrics, LayoutProfile};

/// Estimated cell height is the cell width scaled by 13/10 (square image
/// plus a title row)
const ITEM_HEIGHT_NUMERATOR: u32 = 13;
const ITEM_HEIGHT_DENOMINATOR: u32 = 10;

/// Sizes the controller works with, in dp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsetConfig {
    /// Banner height assumed until one is measured, and after a failure
    pub fallback_ad_height_dp: u32,

    /// Breathing room between the last row and the banner
    pub extra_margin_dp: u32,
}

impl Default for InsetConfig {
    fn default() -> Self {
        Self {
            fallback_ad_height_dp: 80,
            extra_margin_dp: 24,
        }
    }
}

/// Owns the bottom space the grid reserves for the banner, and the ad
/// container's own margins.
///
/// Every input replaces its stored value and triggers a recompute. The
/// output depends only on current state, so any interleaving of the same
/// inputs settles on the same value.
pub struct AdAwareInsetController {
    config: InsetConfig,
    profile: LayoutProfile,
    display: DisplayMetrics,
    insets: SystemInsets,
    ad_state: AdHeightState,

    // height behind the current output while a reload is pending
    held_height_px: Option<u32>,

    token: AdToken,
    emitted: InsetUpdate,
    publisher: watch::Sender<InsetUpdate>,
}

impl AdAwareInsetController {
    pub fn new(config: InsetConfig, profile: LayoutProfile, display: DisplayMetrics) -> Self {
        let mut controller = Self {
            config,
            profile,
            display,
            insets: SystemInsets::default(),
            ad_state: AdHeightState::Unknown,
            held_height_px: None,
            token: AdToken::default(),
            emitted: InsetUpdate::default(),
            publisher: watch::Sender::new(InsetUpdate::default()),
        };
        controller.emitted = controller.compute_update();
        controller.publisher.send_replace(controller.emitted);
        controller
    }

    /// Receiver that always holds the latest emitted update
    pub fn subscribe(&self) -> watch::Receiver<InsetUpdate> {
        self.publisher.subscribe()
    }

    pub fn current_token(&self) -> AdToken {
        self.token
    }

    pub fn ad_state(&self) -> AdHeightState {
        self.ad_state
    }

    pub fn profile(&self) -> &LayoutProfile {
        &self.profile
    }

    pub fn display(&self) -> &DisplayMetrics {
        &self.display
    }

    pub fn insets(&self) -> SystemInsets {
        self.insets
    }

    /// Last emitted grid padding
    pub fn reserved_space(&self) -> ReservedSpace {
        self.emitted.grid_padding
    }

    /// Last emitted ad container margins
    pub fn ad_margins(&self) -> AdContainerMargins {
        self.emitted.ad_margins
    }

    pub fn on_layout_profile_changed(
        &mut self,
        profile: LayoutProfile,
        display: DisplayMetrics,
    ) -> Option<InsetUpdate> {
        self.profile = profile;
        self.display = display;
        self.recompute()
    }

    pub fn on_system_insets_changed(&mut self, insets: SystemInsets) -> Option<InsetUpdate> {
        self.insets = insets;
        self.recompute()
    }

    /// Banner measured for request `token`.
    ///
    /// A zero height means the container has not been laid out yet; the
    /// state stays unknown until a real measurement arrives. Resolved and
    /// failed are terminal until the next reload.
    pub fn on_ad_height_resolved(&mut self, token: AdToken, height_px: u32) -> Option<InsetUpdate> {
        if !self.is_current(token) {
            return None;
        }
        if height_px == 0 {
            debug!("Ad container for {} not measured yet, keeping {:?}", token, self.ad_state);
            return None;
        }
        match self.ad_state {
            AdHeightState::Resolved(_) | AdHeightState::Failed => {
                warn!("Ignoring height {}px for {}: already {:?}", height_px, token, self.ad_state);
                None
            }
            AdHeightState::Unknown => {
                info!("Ad loaded successfully, {} measured at {}px", token, height_px);
                self.ad_state = AdHeightState::Resolved(height_px);
                self.held_height_px = None;
                self.recompute()
            }
        }
    }

    /// Load for `token` failed; fall back to the default banner height.
    pub fn on_ad_load_failed(&mut self, token: AdToken, err: &AdLoadError) -> Option<InsetUpdate> {
        if !self.is_current(token) {
            return None;
        }
        match self.ad_state {
            AdHeightState::Unknown => {
                error!("Ad failed to load: {}", err);
                self.ad_state = AdHeightState::Failed;
                self.held_height_px = None;
                self.recompute()
            }
            AdHeightState::Resolved(_) | AdHeightState::Failed => {
                warn!("Ignoring failure for {}: already {:?}", token, self.ad_state);
                None
            }
        }
    }

    /// Forget the current banner and issue a token for the next load.
    ///
    /// The emitted padding stays where it is until the new load resolves,
    /// so the grid does not jump while the replacement banner loads.
    pub fn on_reload_requested(&mut self) -> AdToken {
        self.held_height_px = Some(self.effective_ad_height_px());
        self.ad_state = AdHeightState::Unknown;
        self.token = self.token.next();
        debug!("Ad reload requested, now expecting {}", self.token);
        self.token
    }

    /// Grid padding for the current state.
    ///
    /// `bottom = ad height + extra margin + estimated item height / 4`,
    /// with the item height estimated as `(width_px / columns) * 13 / 10`.
    /// Side padding follows the side insets in landscape only.
    pub fn compute_reserved_bottom_space(&self) -> ReservedSpace {
        let columns = self.profile.columns.max(1);
        let item_width = self.display.width_px / columns;
        let item_height = item_width.saturating_mul(ITEM_HEIGHT_NUMERATOR) / ITEM_HEIGHT_DENOMINATOR;
        let bottom = self.effective_ad_height_px()
            .saturating_add(self.display.dp_to_px(self.config.extra_margin_dp))
            .saturating_add(item_height / 4);

        if self.profile.orientation.is_landscape() {
            ReservedSpace { bottom, left: self.insets.left, right: self.insets.right }
        } else {
            ReservedSpace { bottom, left: 0, right: 0 }
        }
    }

    /// Margins that keep the ad container off the side bars in landscape
    pub fn compute_ad_margins(&self) -> AdContainerMargins {
        if self.profile.orientation.is_landscape() {
            AdContainerMargins {
                left: self.insets.left,
                right: self.insets.right,
                bottom: self.insets.bottom,
            }
        } else {
            AdContainerMargins { left: 0, right: 0, bottom: self.insets.bottom }
        }
    }

    fn fallback_height_px(&self) -> u32 {
        self.display.dp_to_px(self.config.fallback_ad_height_dp)
    }

    fn effective_ad_height_px(&self) -> u32 {
        match self.ad_state {
            AdHeightState::Resolved(h) => h,
            AdHeightState::Failed => self.fallback_height_px(),
            AdHeightState::Unknown => self.held_height_px.unwrap_or_else(|| self.fallback_height_px()),
        }
    }

    fn is_current(&self, token: AdToken) -> bool {
        if token != self.token {
            debug!("Dropping stale ad outcome {} (current {})", token, self.token);
            return false;
        }
        true
    }

    fn compute_update(&self) -> InsetUpdate {
        InsetUpdate {
            grid_padding: self.compute_reserved_bottom_space(),
            ad_margins: self.compute_ad_margins(),
        }
    }

    fn recompute(&mut self) -> Option<InsetUpdate> {
        let next = self.compute_update();
        if next == self.emitted {
            return None;
        }
        info!(
            "Grid padding updated: bottom={}, left={}, right={} ({:?})",
            next.grid_padding.bottom, next.grid_padding.left, next.grid_padding.right, self.ad_state
        );
        self.emitted = next;
        self.publisher.send_replace(next);
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{classify, Orientation, ScreenMetrics};

    fn phone_portrait() -> (LayoutProfile, DisplayMetrics) {
        let display = DisplayMetrics::new(1080, 2400, 3.0).unwrap();
        let profile = classify(&display.screen_metrics(Orientation::Portrait).unwrap());
        (profile, display)
    }

    fn phone_landscape() -> (LayoutProfile, DisplayMetrics) {
        let display = DisplayMetrics::new(2400, 1080, 3.0).unwrap();
        let profile = classify(&display.screen_metrics(Orientation::Landscape).unwrap());
        (profile, display)
    }

    fn controller() -> AdAwareInsetController {
        let (profile, display) = phone_portrait();
        AdAwareInsetController::new(InsetConfig::default(), profile, display)
    }

    #[test]
    fn test_resolved_height_formula() {
        let mut c = controller();
        let token = c.current_token();
        c.on_ad_height_resolved(token, 250);
        // 250 + 72 + (360 * 13 / 10) / 4 = 250 + 72 + 117
        assert_eq!(c.reserved_space(), ReservedSpace { bottom: 439, left: 0, right: 0 });
        assert_eq!(c.ad_state(), AdHeightState::Resolved(250));
    }

    #[test]
    fn test_unknown_uses_fallback_from_the_start() {
        let c = controller();
        // 240 + 72 + 117
        assert_eq!(c.reserved_space().bottom, 429);
        assert_eq!(*c.subscribe().borrow(), InsetUpdate {
            grid_padding: ReservedSpace { bottom: 429, left: 0, right: 0 },
            ad_margins: AdContainerMargins::default(),
        });
    }

    #[test]
    fn test_failure_uses_fallback_never_zero() {
        let mut c = controller();
        let token = c.current_token();
        c.on_ad_load_failed(token, &AdLoadError::new(3, "No fill"));
        assert_eq!(c.ad_state(), AdHeightState::Failed);
        assert_eq!(c.reserved_space().bottom, 429);
        assert_eq!(c.compute_reserved_bottom_space().bottom, 429);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let mut c = controller();
        let token = c.current_token();
        c.on_ad_height_resolved(token, 150);
        let first = c.compute_reserved_bottom_space();
        for _ in 0..5 {
            assert_eq!(c.compute_reserved_bottom_space(), first);
        }
        assert_eq!(c.on_system_insets_changed(c.insets()), None);
    }

    #[test]
    fn test_inputs_converge_in_any_order() {
        let (profile, display) = phone_landscape();
        let insets = SystemInsets::new(84, 126, 0);

        let mut a = controller();
        let ta = a.current_token();
        a.on_layout_profile_changed(profile, display);
        a.on_system_insets_changed(insets);
        a.on_ad_height_resolved(ta, 162);

        let mut b = controller();
        let tb = b.current_token();
        b.on_ad_height_resolved(tb, 162);
        b.on_system_insets_changed(insets);
        b.on_layout_profile_changed(profile, display);

        assert_eq!(a.reserved_space(), b.reserved_space());
        assert_eq!(a.ad_margins(), b.ad_margins());
        // 162 + 72 + (400 * 13 / 10) / 4
        assert_eq!(a.reserved_space(), ReservedSpace { bottom: 364, left: 84, right: 126 });
    }

    #[test]
    fn test_portrait_ignores_side_insets() {
        let mut c = controller();
        c.on_system_insets_changed(SystemInsets::new(40, 40, 63));
        assert_eq!(c.reserved_space().left, 0);
        assert_eq!(c.reserved_space().right, 0);
        assert_eq!(c.ad_margins(), AdContainerMargins { left: 0, right: 0, bottom: 63 });
    }

    #[test]
    fn test_landscape_margins_follow_side_insets() {
        let (profile, display) = phone_landscape();
        let mut c = AdAwareInsetController::new(InsetConfig::default(), profile, display);
        c.on_system_insets_changed(SystemInsets::new(84, 126, 0));
        assert_eq!(c.ad_margins(), AdContainerMargins { left: 84, right: 126, bottom: 0 });
    }

    #[test]
    fn test_stale_outcome_dropped_after_reload() {
        let mut c = controller();
        let a = c.current_token();
        let b = c.on_reload_requested();
        assert_ne!(a, b);

        c.on_ad_height_resolved(b, 150);
        assert_eq!(c.on_ad_height_resolved(a, 300), None);
        assert_eq!(c.on_ad_load_failed(a, &AdLoadError::new(0, "late")), None);
        assert_eq!(c.ad_state(), AdHeightState::Resolved(150));
    }

    #[test]
    fn test_reload_keeps_padding_until_resolution() {
        let mut c = controller();
        let t = c.current_token();
        c.on_ad_height_resolved(t, 150);
        let before = c.reserved_space();

        c.on_reload_requested();
        assert_eq!(c.ad_state(), AdHeightState::Unknown);
        assert_eq!(c.reserved_space(), before);
        assert_eq!(c.compute_reserved_bottom_space(), before);

        // an inset change during the pending reload keeps the old ad height
        c.on_system_insets_changed(SystemInsets::new(0, 0, 48));
        assert_eq!(c.reserved_space().bottom, before.bottom);
    }

    #[test]
    fn test_zero_measurement_stays_unknown() {
        let mut c = controller();
        let t = c.current_token();
        assert_eq!(c.on_ad_height_resolved(t, 0), None);
        assert_eq!(c.ad_state(), AdHeightState::Unknown);
        assert_eq!(c.reserved_space().bottom, 429);
    }

    #[test]
    fn test_failed_is_terminal_until_reload() {
        let mut c = controller();
        let t = c.current_token();
        c.on_ad_load_failed(t, &AdLoadError::new(2, "Network error"));
        assert_eq!(c.on_ad_height_resolved(t, 150), None);
        assert_eq!(c.ad_state(), AdHeightState::Failed);

        let next = c.on_reload_requested();
        c.on_ad_height_resolved(next, 150);
        assert_eq!(c.ad_state(), AdHeightState::Resolved(150));
    }

    #[test]
    fn test_resolved_is_terminal_until_reload() {
        let mut c = controller();
        let t = c.current_token();
        let update = c.on_ad_height_resolved(t, 150).unwrap();
        assert_eq!(update.grid_padding.bottom, 150 + 72 + 117);
        assert_eq!(c.on_ad_height_resolved(t, 165), None);
        assert_eq!(c.on_ad_load_failed(t, &AdLoadError::new(0, "late")), None);
        assert_eq!(c.ad_state(), AdHeightState::Resolved(150));

        let next = c.on_reload_requested();
        c.on_ad_height_resolved(next, 165);
        assert_eq!(c.ad_state(), AdHeightState::Resolved(165));
    }

    #[test]
    fn test_huge_measurement_saturates() {
        let mut c = controller();
        let t = c.current_token();
        c.on_ad_height_resolved(t, u32::MAX);
        assert_eq!(c.ad_state(), AdHeightState::Resolved(u32::MAX));
        assert_eq!(c.reserved_space().bottom, u32::MAX);
    }

    #[test]
    fn test_huge_window_saturates() {
        let display = DisplayMetrics::new(u32::MAX, 2400, 3.0).unwrap();
        let profile = classify(&ScreenMetrics::new(411, 891, Orientation::Portrait).unwrap());
        let c = AdAwareInsetController::new(InsetConfig::default(), profile, display);
        assert!(c.reserved_space().bottom > 0);
    }

    #[test]
    fn test_subscriber_sees_latest() {
        let mut c = controller();
        let rx = c.subscribe();
        let t = c.current_token();
        c.on_ad_height_resolved(t, 250);
        assert_eq!(rx.borrow().grid_padding.bottom, 439);
    }
}
