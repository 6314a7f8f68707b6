use std::{cell::RefCell, rc::Rc};

use log::{debug, info, warn};

use crate::{
    config::ContextConfig,
    object::{NativeObject, ObjectError},
    types::{Cid, Value},
};

pub mod bridge;
pub mod object_registry;

pub use bridge::NativeBridge;
pub use object_registry::ObjectRegistry;

struct ContextInner {
    config: ContextConfig,
    bridge: RefCell<Option<Rc<dyn NativeBridge>>>,
    registry: RefCell<ObjectRegistry>,
}

/// Process-scoped state shared by all native objects of one bridge
/// connection: the bridge itself and the correlation id registry.
///
/// Cheap to clone; clones share the same state. Objects keep their context
/// alive and the registry keeps undisposed objects alive; the cycle ends when
/// an object is disposed or the context is shut down.
#[derive(Clone)]
pub struct Context {
    inner: Rc<ContextInner>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new(ContextConfig::default())
    }
}

impl Context {
    pub fn new(config: ContextConfig) -> Self {
        let registry = ObjectRegistry::new(config.cid_prefix.clone());
        Self {
            inner: Rc::new(ContextInner {
                config,
                bridge: RefCell::new(None),
                registry: RefCell::new(registry),
            }),
        }
    }

    /// Context already bound to `bridge`
    pub fn started(config: ContextConfig, bridge: Rc<dyn NativeBridge>) -> Self {
        let context = Self::new(config);
        context.start(bridge);
        context
    }

    pub fn config(&self) -> &ContextConfig {
        &self.inner.config
    }

    /// Binds the native bridge. Objects can only be created once started.
    pub fn start(&self, bridge: Rc<dyn NativeBridge>) {
        if self.inner.bridge.replace(Some(bridge)).is_some() {
            warn!("Native bridge replaced while a previous one was still bound");
        } else {
            info!("Native bridge started");
        }
    }

    pub fn is_started(&self) -> bool {
        self.inner.bridge.borrow().is_some()
    }

    pub fn bridge(&self) -> Result<Rc<dyn NativeBridge>, ObjectError> {
        self.inner
            .bridge
            .borrow()
            .clone()
            .ok_or(ObjectError::NotStarted)
    }

    /// Unbinds the bridge. Live objects are disposed without `destroy`
    /// unless the config says otherwise.
    pub fn shutdown(&self) {
        self.inner.bridge.replace(None);
        let objects = self.inner.registry.borrow_mut().drain();
        let count = objects.len();
        if self.inner.config.dispose_on_shutdown {
            for object in objects {
                object.dispose_local();
            }
        }
        info!("Native bridge shut down, released {} objects", count);
    }

    pub fn find(&self, cid: &Cid) -> Option<NativeObject> {
        self.inner.registry.borrow().get(cid)
    }

    pub fn object_count(&self) -> usize {
        self.inner.registry.borrow().len()
    }

    /// Routes an inbound native event. Unknown or already disposed targets
    /// are ignored, the event may have been in flight during disposal.
    pub fn dispatch(&self, cid: &Cid, wire_name: &str, params: &Value) -> Option<Value> {
        let target = self.find(cid);
        match target {
            Some(object) => object.dispatch_native_event(wire_name, params),
            None => {
                debug!("Dropped \"{}\" event for unknown object {}", wire_name, cid);
                None
            }
        }
    }

    pub(crate) fn next_cid(&self, fixed: Option<Cid>) -> Result<Cid, ObjectError> {
        self.inner.registry.borrow_mut().next_cid(fixed)
    }

    pub(crate) fn insert(&self, object: &NativeObject) {
        self.inner.registry.borrow_mut().register(object);
    }

    pub(crate) fn remove(&self, cid: &Cid) {
        let removed = self.inner.registry.borrow_mut().remove(cid);
        if removed.is_none() {
            debug!("Object {} was not registered", cid);
        }
    }
}
