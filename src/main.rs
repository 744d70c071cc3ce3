/*
 *  main.rs
 *
 *  PhotoGallery - responsive grid, banner aware
 *  (c) 2020-26 Stuart Hunter
 *
 *  Headless gallery driver: classifies the configured window, runs a
 *  simulated banner through the inset controller, prints each update as JSON
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

use env_logger::Env;
use log::{error, info, warn};
use std::time::Duration;
use tokio::sync::mpsc;

use photogallery::ads::{AdLoadError, SimulatedBanner};
use photogallery::config;
use photogallery::icons::IconClient;
use photogallery::inset::{EdgeInsets, SystemInsets};
use photogallery::layout::{DisplayMetrics, Orientation};
use photogallery::screen::{GalleryScreen, GallerySettings, ScreenEvent};
use photogallery::state::{lock, AppState};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Typical phone bars: 24dp status, 48dp navigation, and a 28dp camera
/// cutout on the left edge when lying down.
fn simulated_insets(display: &DisplayMetrics, orientation: Orientation) -> SystemInsets {
    let (bars, cutout) = match orientation {
        Orientation::Portrait => (
            EdgeInsets { top: display.dp_to_px(24), bottom: display.dp_to_px(48), ..Default::default() },
            EdgeInsets { top: display.dp_to_px(28), ..Default::default() },
        ),
        Orientation::Landscape => (
            EdgeInsets { top: display.dp_to_px(24), right: display.dp_to_px(48), ..Default::default() },
            EdgeInsets { left: display.dp_to_px(28), ..Default::default() },
        ),
    };
    SystemInsets::from_bars_and_cutout(bars, cutout)
}

fn rotated(display: &DisplayMetrics, orientation: Orientation) -> (DisplayMetrics, Orientation) {
    let turned = DisplayMetrics { width_px: display.height_px, height_px: display.width_px, ..*display };
    let next = match orientation {
        Orientation::Portrait => Orientation::Landscape,
        Orientation::Landscape => Orientation::Portrait,
    };
    (turned, next)
}

fn send(tx: &mpsc::UnboundedSender<ScreenEvent>, event: ScreenEvent) {
    if tx.send(event).is_err() {
        warn!("Gallery screen already closed");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (cfg, cli) = config::load()?;

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level())).init();
    info!("PhotoGallery v{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let display = cfg.display_metrics()?;
    let orientation = cfg.orientation();

    let loader = if cfg.simulate_failure() {
        SimulatedBanner::failing(AdLoadError::new(3, "No fill"), cfg.ad_load_delay())
    } else {
        SimulatedBanner::loaded(cfg.simulated_height_px(), cfg.ad_load_delay())
    };
    let icons = match cfg.icon_options() {
        Some(options) => Some(IconClient::new(&options)?),
        None => None,
    };

    let state = AppState::shared();
    let settings = GallerySettings { insets: cfg.inset_config(), ad_unit_id: cfg.ad_unit_id() };
    let (mut screen, events) = GalleryScreen::new(settings, display, orientation, loader, icons, state.clone())?;
    info!("{}", screen.profile());
    println!("{}", serde_json::to_string(screen.profile())?);

    let tx = screen.sender();
    let mut updates = screen.subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let update = *updates.borrow_and_update();
            match serde_json::to_string(&update) {
                Ok(line) => println!("{line}"),
                Err(e) => error!("Could not encode inset update: {}", e),
            }
        }
    });

    screen.start();
    let runner = tokio::spawn(screen.run(events));
    send(&tx, ScreenEvent::InsetsApplied(simulated_insets(&display, orientation)));

    let mut remaining = Duration::from_secs(cli.run_secs);
    if cli.rotate {
        remaining /= 2;
        tokio::time::sleep(remaining).await;
        let (turned, next) = rotated(&display, orientation);
        info!("Rotating to {} ({}x{}px)", next, turned.width_px, turned.height_px);
        send(&tx, ScreenEvent::ConfigurationChanged { display: turned, orientation: next });
        send(&tx, ScreenEvent::InsetsApplied(simulated_insets(&turned, next)));
    }

    tokio::select! {
        _ = tokio::time::sleep(remaining) => {}
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }

    send(&tx, ScreenEvent::Shutdown);
    drop(tx);
    runner.await?;
    printer.await?;

    info!("{}", lock(&state));
    Ok(())
}
