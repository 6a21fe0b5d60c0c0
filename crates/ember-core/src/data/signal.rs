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

//! Synchronous, single-threaded change signals.
//!
//! A [`Signal`] holds a list of callbacks invoked in-line by [`Signal::emit`].
//! Connecting returns a [`SignalSlot`] that disconnects its callback when
//! dropped, so a subscriber's lifetime bounds its subscription.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Callback invoked with the path of the property that changed.
pub type SignalCallback = Rc<dyn Fn(&str)>;

#[derive(Default)]
struct SignalInner {
    callbacks: RefCell<Vec<(u64, SignalCallback)>>,
    next_id: Cell<u64>,
}

/// A synchronous notification source. Clones share the same subscriber list.
#[derive(Clone, Default)]
pub struct Signal {
    inner: Rc<SignalInner>,
}

impl Signal {
    /// Creates a signal with no subscriber.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` and returns the slot that keeps it connected.
    #[must_use = "the callback is disconnected as soon as the slot is dropped"]
    pub fn connect(&self, callback: impl Fn(&str) + 'static) -> SignalSlot {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .callbacks
            .borrow_mut()
            .push((id, Rc::new(callback)));
        SignalSlot {
            signal: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Invokes every connected callback with `path`, in connection order.
    ///
    /// The subscriber list is snapshotted first: callbacks may connect or
    /// disconnect slots during emission without affecting the current pass.
    pub fn emit(&self, path: &str) {
        let snapshot: Vec<SignalCallback> = self
            .inner
            .callbacks
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();

        for callback in snapshot {
            callback(path);
        }
    }

    /// Returns the number of connected callbacks.
    pub fn subscriber_count(&self) -> usize {
        self.inner.callbacks.borrow().len()
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// A live connection to a [`Signal`]. Dropping it disconnects the callback.
#[derive(Debug)]
pub struct SignalSlot {
    signal: Weak<SignalInner>,
    id: u64,
}

impl SignalSlot {
    /// Returns `true` while the signal this slot is connected to still exists.
    pub fn is_connected(&self) -> bool {
        self.signal.strong_count() > 0
    }
}

impl Drop for SignalSlot {
    fn drop(&mut self) {
        if let Some(inner) = self.signal.upgrade() {
            inner.callbacks.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}
