//! Saved instance state
//!
//! A [`StateBundle`] is the key/value store the host keeps across view
//! recreation (for example a rotation). The view writes its own keys and the
//! map surface may add more.

use crate::widgets::BottomSheetState;
use nv_core::{NavigationViewError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Key holding the summary bottom sheet state
pub const BOTTOM_SHEET_STATE: &str = "bottom_sheet_state";

/// Key holding whether the recenter button was visible
pub const RECENTER_BTN_VISIBLE: &str = "recenter_btn_visible";

/// Key/value bundle persisted by the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateBundle {
    entries: Map<String, Value>,
}

impl StateBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_bool(&mut self, key: &str, value: bool) {
        self.entries.insert(key.to_string(), Value::Bool(value));
    }

    /// Missing keys read as `false`
    pub fn get_bool(&self, key: &str) -> bool {
        self.entries.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn put<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        self.entries.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Typed read. `Ok(None)` when the key is absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.entries.get(key) {
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| NavigationViewError::InvalidState(format!("{key}: {e}"))),
            None => Ok(None),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the bundle to `path` as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// The two values the navigation view itself persists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedViewState {
    pub bottom_sheet_state: BottomSheetState,
    pub recenter_btn_visible: bool,
}

impl SavedViewState {
    pub fn write_to(&self, bundle: &mut StateBundle) -> Result<()> {
        bundle.put(BOTTOM_SHEET_STATE, &self.bottom_sheet_state)?;
        bundle.put_bool(RECENTER_BTN_VISIBLE, self.recenter_btn_visible);
        Ok(())
    }

    /// Read back the view keys. A bundle without a sheet state restores an
    /// expanded sheet.
    pub fn read_from(bundle: &StateBundle) -> Result<Self> {
        Ok(Self {
            bottom_sheet_state: bundle
                .get(BOTTOM_SHEET_STATE)?
                .unwrap_or(BottomSheetState::Expanded),
            recenter_btn_visible: bundle.get_bool(RECENTER_BTN_VISIBLE),
        })
    }
}
