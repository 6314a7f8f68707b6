use std::{collections::HashMap, rc::Rc};

use log::{debug, trace};

use crate::{
    class::EventDescriptor,
    types::{ListenerId, Value},
};

use super::{error::ObjectError, native_object::NativeObject};

/// Event callback: `(target, payload)`
pub type Callback = Rc<dyn Fn(&NativeObject, &Value)>;

#[derive(Clone)]
struct Subscription {
    id: ListenerId,
    callback: Callback,
    once: bool,
}

pub(crate) struct Listeners {
    next_id: u64,
    by_event: HashMap<String, Vec<Subscription>>,
}

impl Listeners {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            by_event: HashMap::new(),
        }
    }

    fn add(&mut self, event: &str, callback: Callback, once: bool) -> ListenerId {
        let id = ListenerId::new(self.next_id);
        self.next_id += 1;
        self.by_event
            .entry(event.to_string())
            .or_default()
            .push(Subscription { id, callback, once });
        id
    }

    fn remove(&mut self, event: &str, id: ListenerId) -> bool {
        let Some(subscriptions) = self.by_event.get_mut(event) else {
            return false;
        };
        let before = subscriptions.len();
        subscriptions.retain(|subscription| subscription.id != id);
        let removed = subscriptions.len() != before;
        if subscriptions.is_empty() {
            self.by_event.remove(event);
        }
        removed
    }

    fn has(&self, event: &str) -> bool {
        self.by_event.contains_key(event)
    }

    fn snapshot(&self, event: &str) -> Vec<Subscription> {
        self.by_event.get(event).cloned().unwrap_or_default()
    }

    fn events(&self) -> Vec<String> {
        self.by_event.keys().cloned().collect()
    }

    pub(crate) fn clear(&mut self) {
        self.by_event.clear();
    }
}

impl NativeObject {
    /// Subscribes to an event. The first subscription to a native event
    /// enables the native listener.
    ///
    /// Fails with `ObjectError::Disposed` if a native listener would be
    /// needed on a disposed object.
    pub fn on<F>(&self, event: &str, callback: F) -> Result<ListenerId, ObjectError>
    where
        F: Fn(&NativeObject, &Value) + 'static,
    {
        self.subscribe(event, Rc::new(callback), false)
    }

    /// Like `on`, but the subscription is removed before its first call
    pub fn once<F>(&self, event: &str, callback: F) -> Result<ListenerId, ObjectError>
    where
        F: Fn(&NativeObject, &Value) + 'static,
    {
        self.subscribe(event, Rc::new(callback), true)
    }

    fn subscribe(
        &self,
        event: &str,
        callback: Callback,
        once: bool,
    ) -> Result<ListenerId, ObjectError> {
        let was_listening = self.is_listening(event);
        let id = self
            .inner
            .listeners
            .borrow_mut()
            .add(event, callback, once);
        if !was_listening {
            if let Err(err) = self.listen(event, true) {
                self.inner.listeners.borrow_mut().remove(event, id);
                return Err(err);
            }
        }
        Ok(id)
    }

    /// Removes a subscription. Removing the last one disables the native
    /// listener, unless the object is already disposed.
    pub fn off(&self, event: &str, id: ListenerId) -> bool {
        let removed = self.inner.listeners.borrow_mut().remove(event, id);
        if removed && !self.is_listening(event) && !self.is_disposed() {
            if let Err(err) = self.listen(event, false) {
                debug!("{}: Could not stop listening to \"{}\": {}", self, event, err);
            }
        }
        removed
    }

    /// Removes every subscription to `event`
    pub fn off_all(&self, event: &str) {
        let subscriptions = self.inner.listeners.borrow().snapshot(event);
        for subscription in subscriptions {
            self.off(event, subscription.id);
        }
    }

    pub fn is_listening(&self, event: &str) -> bool {
        self.inner.listeners.borrow().has(event)
    }

    /// Events with at least one subscription
    pub fn listened_events(&self) -> Vec<String> {
        self.inner.listeners.borrow().events()
    }

    /// Raises `event` on the local subscribers
    pub fn trigger(&self, event: &str, payload: &Value) {
        let subscriptions = self.inner.listeners.borrow().snapshot(event);
        for subscription in subscriptions {
            if subscription.once {
                self.off(event, subscription.id);
            }
            (subscription.callback)(self, payload);
        }
    }

    /// Toggles the native subscription behind `event`. Events without a
    /// declaration are local only.
    pub fn listen(&self, event: &str, state: bool) -> Result<(), ObjectError> {
        let Some(config) = self.class().event(event) else {
            return Ok(());
        };
        if self.is_listening_to_alias(event, &config) {
            trace!("{}: \"{}\" already covered by its alias", self, event);
            return Ok(());
        }
        if let Some(listen) = &config.listen {
            let via_alias = config.alias.as_deref() == Some(event);
            listen(self, state, via_alias);
            return Ok(());
        }
        self.native_listen(&config.name, state)
    }

    fn is_listening_to_alias(&self, event: &str, config: &EventDescriptor) -> bool {
        match config.counterpart(event) {
            Some(other) => self.is_listening(other),
            None => false,
        }
    }

    /// Routes an event received from the native peer under its wire name.
    ///
    /// A custom trigger handler's result is returned to the caller; events
    /// without a mapping are raised under their wire name.
    pub fn dispatch_native_event(&self, wire_name: &str, params: &Value) -> Option<Value> {
        let class = self.class().clone();
        let Some(key) = class.trigger_key(wire_name) else {
            self.trigger(wire_name, params);
            return None;
        };
        let config = class.event(key)?;
        if let Some(trigger) = &config.trigger {
            return trigger(self, params, key);
        }
        self.trigger(key, params);
        if let Some(alias) = &config.alias {
            self.trigger(alias, params);
        }
        None
    }
}
