/*
 *  state.rs
 *
 *  PhotoGallery - responsive grid, banner aware
 *  (c) 2020-26 Stuart Hunter
 *
 *  Session state shared between the gallery screen and its tasks
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

use chrono::{DateTime, Local};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::catalog::{default_catalog, MenuItem};

pub type SharedState = Arc<Mutex<AppState>>;

/// Lock the shared state; a poisoned lock still holds usable data.
pub fn lock(state: &SharedState) -> MutexGuard<'_, AppState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Debug, Clone)]
pub struct AppState {
    menu: Vec<MenuItem>,
    initialized: bool,
    search_query: String,
    scroll_position: usize,
    loading: bool,
    icon_urls_loaded: bool,
    selected: Option<(MenuItem, usize)>,
    dark_mode: bool,
    last_update: Option<DateTime<Local>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Fresh state holding the built-in catalog
    pub fn new() -> Self {
        Self {
            menu: default_catalog(),
            initialized: true,
            search_query: String::new(),
            scroll_position: 0,
            loading: false,
            icon_urls_loaded: false,
            selected: None,
            dark_mode: false,
            last_update: None,
        }
    }

    pub fn shared() -> SharedState {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn menu(&self) -> &[MenuItem] {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut [MenuItem] {
        &mut self.menu
    }

    pub fn set_menu(&mut self, items: Vec<MenuItem>) {
        self.menu = items;
    }

    pub fn add_item(&mut self, item: MenuItem) {
        self.menu.push(item);
    }

    /// Out of range positions are ignored
    pub fn remove_item(&mut self, position: usize) -> Option<MenuItem> {
        (position < self.menu.len()).then(|| self.menu.remove(position))
    }

    pub fn item(&self, position: usize) -> Option<&MenuItem> {
        self.menu.get(position)
    }

    pub fn item_count(&self) -> usize {
        self.menu.len()
    }

    pub fn has_data(&self) -> bool {
        self.initialized && !self.menu.is_empty()
    }

    /// Items matching the current search query
    pub fn visible_items(&self) -> Vec<&MenuItem> {
        self.menu.iter().filter(|i| i.matches(&self.search_query)).collect()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
    }

    pub fn scroll_position(&self) -> usize {
        self.scroll_position
    }

    /// Negative positions clamp to the top
    pub fn set_scroll_position(&mut self, position: i64) {
        self.scroll_position = usize::try_from(position.max(0)).unwrap_or(usize::MAX);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn icon_urls_loaded(&self) -> bool {
        self.icon_urls_loaded
    }

    pub fn set_icon_urls_loaded(&mut self, loaded: bool) {
        self.icon_urls_loaded = loaded;
    }

    pub fn selected(&self) -> Option<(&MenuItem, usize)> {
        self.selected.as_ref().map(|(item, pos)| (item, *pos))
    }

    /// Select the item at `position`; returns false when there is none
    pub fn select(&mut self, position: usize) -> bool {
        match self.menu.get(position) {
            Some(item) => {
                self.selected = Some((item.clone(), position));
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn set_dark_mode(&mut self, dark: bool) {
        self.dark_mode = dark;
    }

    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.last_update
    }

    pub fn touch(&mut self) {
        self.last_update = Some(Local::now());
    }

    /// Reset everything, catalog included, to a fresh session
    pub fn clear_all(&mut self) {
        *self = Self::new();
    }

    /// Back to the top, not loading
    pub fn refresh(&mut self) {
        self.scroll_position = 0;
        self.loading = false;
    }
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "App State:")?;
        writeln!(f, "- Menu Count: {}", self.menu.len())?;
        writeln!(f, "- Search Query: '{}'", self.search_query)?;
        writeln!(f, "- Scroll Position: {}", self.scroll_position)?;
        writeln!(f, "- Is Loading: {}", self.loading)?;
        writeln!(f, "- Is Initialized: {}", self.initialized)?;
        writeln!(f, "- Icon Urls Loaded: {}", self.icon_urls_loaded)?;
        write!(f, "- Dark Mode: {}", self.dark_mode)
    }
}
