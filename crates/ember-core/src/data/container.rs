// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The property-container contract and an in-memory implementation.

use super::error::PropertyError;
use super::signal::Signal;
use super::value::{FromProperty, PropertyValue};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A string-keyed store of typed values with per-path change notification.
///
/// This is the only surface draw calls use to read scene data. A container
/// may be shared by many draw calls; none of them ever mutates it.
pub trait PropertyContainer {
    /// Returns `true` if a value is stored at `path`.
    fn has_property(&self, path: &str) -> bool;

    /// Returns a copy of the value stored at `path`.
    ///
    /// Resource handles are shared, so the copy is cheap.
    fn get(&self, path: &str) -> Option<PropertyValue>;

    /// Returns the signal emitted whenever the value at `path` is added,
    /// replaced or removed.
    ///
    /// The signal exists before the property does, so callers can wait for
    /// a value that is not there yet.
    fn property_reference_changed(&self, path: &str) -> Signal;
}

impl<'a> dyn PropertyContainer + 'a {
    /// Reads the value at `path` as a `T`.
    ///
    /// ## Errors
    /// * `PropertyError::NotFound` - Nothing is stored at `path`.
    /// * `PropertyError::TypeMismatch` - The stored value is not a `T`.
    pub fn get_as<T: FromProperty>(&self, path: &str) -> Result<T, PropertyError> {
        let value = self.get(path).ok_or_else(|| PropertyError::NotFound {
            path: path.to_owned(),
        })?;
        T::from_property(&value).ok_or_else(|| PropertyError::TypeMismatch {
            path: path.to_owned(),
            expected: T::KIND,
            found: value.kind(),
        })
    }
}

/// A simple in-memory [`PropertyContainer`].
#[derive(Debug, Default)]
pub struct Container {
    values: RefCell<HashMap<String, PropertyValue>>,
    signals: RefCell<HashMap<String, Signal>>,
}

impl Container {
    /// Creates an empty, shareable container.
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Stores `value` at `path`.
    ///
    /// Subscribers of `path` are notified when the path is new or the value
    /// differs from the stored one (by identity for resources and arrays).
    pub fn set(&self, path: impl Into<String>, value: impl Into<PropertyValue>) {
        let path = path.into();
        let value = value.into();

        let changed = {
            let mut values = self.values.borrow_mut();
            let changed = !matches!(
                values.get(&path),
                Some(previous) if previous.same_reference(&value)
            );
            values.insert(path.clone(), value);
            changed
        };

        if changed {
            self.notify(&path);
        }
    }

    /// Removes the value at `path`, notifying subscribers if there was one.
    pub fn remove(&self, path: &str) -> Option<PropertyValue> {
        let removed = self.values.borrow_mut().remove(path);
        if removed.is_some() {
            self.notify(path);
        }
        removed
    }

    /// Returns the number of stored properties.
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    /// Returns `true` if the container stores nothing.
    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    fn notify(&self, path: &str) {
        // Cloned out so subscribers can read or subscribe to this container.
        let signal = self.signals.borrow().get(path).cloned();
        if let Some(signal) = signal {
            signal.emit(path);
        }
    }
}

impl PropertyContainer for Container {
    fn has_property(&self, path: &str) -> bool {
        self.values.borrow().contains_key(path)
    }

    fn get(&self, path: &str) -> Option<PropertyValue> {
        self.values.borrow().get(path).cloned()
    }

    fn property_reference_changed(&self, path: &str) -> Signal {
        self.signals
            .borrow_mut()
            .entry(path.to_owned())
            .or_default()
            .clone()
    }
}
