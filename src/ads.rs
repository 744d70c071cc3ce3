/*
 *  ads.rs
 *
 *  PhotoGallery - responsive grid, banner aware
 *  (c) 2020-26 Stuart Hunter
 *
 *  Banner ad requests, outcomes and token-stamped dispatch
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

use log::{debug, info};
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::inset::AdContainerMargins;
use crate::layout::{DisplayMetrics, Orientation};

/// Google's public test banner unit
pub const TEST_AD_UNIT_ID: &str = "ca-app-pub-3940256099942544/6300978111";

/// Generation stamp for one ad load attempt.
///
/// Every reload advances the token; outcomes carrying an older token
/// belong to a superseded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct AdToken(u64);

impl AdToken {
    pub fn value(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        AdToken(self.0.wrapping_add(1))
    }
}

impl fmt::Display for AdToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Failure reported by the ad network
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ad load failed ({code}): {message}")]
pub struct AdLoadError {
    pub code: i32,
    pub message: String,
}

impl AdLoadError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

/// What the ad network eventually reports for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdOutcome {
    /// Banner attached; height of the container after the next layout pass.
    /// Zero means the container has not been measured yet.
    Loaded { measured_height_px: u32 },

    Failed(AdLoadError),
}

/// An outcome stamped with the token of the request that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdEvent {
    pub token: AdToken,
    pub outcome: AdOutcome,
}

/// Anchored adaptive banner request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdRequest {
    pub unit_id: String,

    /// Width available to the banner
    pub width_dp: u32,
}

impl AdRequest {
    /// Size the banner to the space the container actually has.
    ///
    /// In landscape the container sits between the side bars, so their
    /// margins come off the window width first.
    pub fn for_display(
        unit_id: &str,
        display: &DisplayMetrics,
        margins: &AdContainerMargins,
        orientation: Orientation,
    ) -> Self {
        let mut available_px = display.width_px;
        if orientation.is_landscape() {
            available_px = available_px.saturating_sub(margins.left + margins.right);
            debug!(
                "Ad width calculation - total: {}, leftMargin: {}, rightMargin: {}, available: {}",
                display.width_px, margins.left, margins.right, available_px
            );
        }
        Self {
            unit_id: unit_id.to_string(),
            width_dp: display.px_to_dp(available_px),
        }
    }
}

/// The ad network seen from this crate: one request in, one outcome out
pub trait BannerLoader: Send + Sync + 'static {
    fn load(&self, request: AdRequest) -> impl Future<Output = AdOutcome> + Send;
}

/// Stand-in ad network that answers every request with a fixed outcome
/// after a delay
#[derive(Debug, Clone)]
pub struct SimulatedBanner {
    outcome: AdOutcome,
    delay: Duration,
}

impl SimulatedBanner {
    pub fn loaded(height_px: u32, delay: Duration) -> Self {
        Self { outcome: AdOutcome::Loaded { measured_height_px: height_px }, delay }
    }

    pub fn failing(error: AdLoadError, delay: Duration) -> Self {
        Self { outcome: AdOutcome::Failed(error), delay }
    }
}

impl BannerLoader for SimulatedBanner {
    fn load(&self, request: AdRequest) -> impl Future<Output = AdOutcome> + Send {
        let outcome = self.outcome.clone();
        let delay = self.delay;
        async move {
            debug!("Simulated banner for {} at {}dp", request.unit_id, request.width_dp);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            outcome
        }
    }
}

/// Runs banner loads in the background and posts their outcomes, stamped
/// with the request token, onto the screen's event channel.
pub struct AdDispatcher<L, E> {
    loader: Arc<L>,
    events: mpsc::UnboundedSender<E>,
    in_flight: Option<JoinHandle<()>>,
}

impl<L, E> AdDispatcher<L, E>
where
    L: BannerLoader,
    E: From<AdEvent> + Send + 'static,
{
    pub fn new(loader: L, events: mpsc::UnboundedSender<E>) -> Self {
        Self {
            loader: Arc::new(loader),
            events,
            in_flight: None,
        }
    }

    /// Start a load for `token`, abandoning any load still running.
    ///
    /// Aborting is best effort: an outcome already queued from the old
    /// load still arrives and is dropped by token comparison.
    pub fn dispatch(&mut self, token: AdToken, request: AdRequest) {
        self.cancel();

        info!("Banner ad loading {} with width {}dp", token, request.width_dp);
        let loader = Arc::clone(&self.loader);
        let events = self.events.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let outcome = loader.load(request).await;
            if events.send(AdEvent { token, outcome }.into()).is_err() {
                debug!("Ad outcome for {} arrived after the screen closed", token);
            }
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

impl<L, E> Drop for AdDispatcher<L, E> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NeverBanner;

    impl BannerLoader for NeverBanner {
        fn load(&self, _request: AdRequest) -> impl Future<Output = AdOutcome> + Send {
            async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                AdOutcome::Loaded { measured_height_px: 1 }
            }
        }
    }

    fn request() -> AdRequest {
        AdRequest { unit_id: TEST_AD_UNIT_ID.to_string(), width_dp: 360 }
    }

    #[test]
    fn test_token_advances() {
        let t = AdToken::default();
        assert_eq!(t.value(), 0);
        assert_eq!(t.next().value(), 1);
        assert!(t.next() > t);
    }

    #[test]
    fn test_request_width_portrait_uses_full_window() {
        let display = DisplayMetrics::new(1080, 2400, 3.0).unwrap();
        let margins = AdContainerMargins { left: 90, right: 90, bottom: 0 };
        let r = AdRequest::for_display(TEST_AD_UNIT_ID, &display, &margins, Orientation::Portrait);
        assert_eq!(r.width_dp, 360);
    }

    #[test]
    fn test_request_width_landscape_subtracts_side_margins() {
        let display = DisplayMetrics::new(2400, 1080, 3.0).unwrap();
        let margins = AdContainerMargins { left: 72, right: 126, bottom: 0 };
        let r = AdRequest::for_display(TEST_AD_UNIT_ID, &display, &margins, Orientation::Landscape);
        assert_eq!(r.width_dp, 734); // (2400 - 198) / 3
    }

    #[tokio::test]
    async fn test_dispatch_stamps_outcome_with_token() {
        let (tx, mut rx) = mpsc::unbounded_channel::<AdEvent>();
        let mut dispatcher = AdDispatcher::new(SimulatedBanner::loaded(150, Duration::ZERO), tx);
        let token = AdToken::default().next();
        dispatcher.dispatch(token, request());

        let event = rx.recv().await.unwrap();
        assert_eq!(event.token, token);
        assert_eq!(event.outcome, AdOutcome::Loaded { measured_height_px: 150 });
    }

    #[tokio::test]
    async fn test_redispatch_supersedes_previous_load() {
        let (tx, mut rx) = mpsc::unbounded_channel::<AdEvent>();
        let err = AdLoadError::new(3, "No fill");
        let mut dispatcher = AdDispatcher::new(SimulatedBanner::failing(err.clone(), Duration::from_millis(50)), tx);
        let first = AdToken::default();
        let second = first.next();
        dispatcher.dispatch(first, request());
        dispatcher.dispatch(second, request());

        let event = rx.recv().await.unwrap();
        assert_eq!(event.token, second);
        assert_eq!(event.outcome, AdOutcome::Failed(err));
    }

    #[tokio::test]
    async fn test_cancel_abandons_pending_load() {
        let (tx, mut rx) = mpsc::unbounded_channel::<AdEvent>();
        let mut dispatcher = AdDispatcher::new(NeverBanner, tx);
        dispatcher.dispatch(AdToken::default(), request());
        dispatcher.cancel();
        drop(dispatcher);

        // sender side is gone once the aborted task is dropped
        let got = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await;
        assert!(matches!(got, Ok(None)));
    }
}
