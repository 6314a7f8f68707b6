use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    fmt,
    rc::{Rc, Weak},
};

use log::{debug, trace};
use serde_json::json;

use crate::{
    class::NativeClass,
    context::{Context, NativeBridge},
    types::{Cid, LifecycleState, Value},
};

use super::{error::ObjectError, events::Listeners};

pub(crate) struct ObjectInner {
    pub(crate) class: Rc<NativeClass>,
    pub(crate) cid: Cid,
    pub(crate) context: Context,
    pub(crate) state: Cell<LifecycleState>,
    pub(crate) props: RefCell<HashMap<String, Value>>,
    pub(crate) listeners: RefCell<Listeners>,
}

/// Handle to an object whose state is mirrored by a native peer.
///
/// Cloning the handle does not clone the object; all clones observe the same
/// properties, listeners and lifecycle.
#[derive(Clone)]
pub struct NativeObject {
    pub(crate) inner: Rc<ObjectInner>,
}

/// Non-owning handle, for listeners that must not keep their target alive
#[derive(Clone)]
pub struct WeakNativeObject {
    inner: Weak<ObjectInner>,
}

impl WeakNativeObject {
    pub fn upgrade(&self) -> Option<NativeObject> {
        self.inner.upgrade().map(NativeObject::from_inner)
    }
}

impl NativeObject {
    pub(crate) fn from_inner(inner: Rc<ObjectInner>) -> Self {
        Self { inner }
    }

    /// Binds a correlation id, fixed or freshly generated, and enters the
    /// object into the context's registry.
    pub(crate) fn register(
        context: &Context,
        class: Rc<NativeClass>,
        fixed_cid: Option<Cid>,
    ) -> Result<Self, ObjectError> {
        let cid = context.next_cid(fixed_cid)?;
        let object = Self::from_inner(Rc::new(ObjectInner {
            class,
            cid,
            context: context.clone(),
            state: Cell::new(LifecycleState::Live),
            props: RefCell::new(HashMap::new()),
            listeners: RefCell::new(Listeners::new()),
        }));
        context.insert(&object);
        trace!("Registered {} as {}", object, object.cid());
        Ok(object)
    }

    pub(crate) fn create_native<I, K>(
        &self,
        bridge: &dyn NativeBridge,
        properties: I,
    ) -> Result<(), ObjectError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        bridge.create(self.cid(), self.class().type_tag());
        for (name, value) in self.class().init_properties() {
            self.native_set(name, value)?;
        }
        self.set_all(properties);
        Ok(())
    }

    pub fn cid(&self) -> &Cid {
        &self.inner.cid
    }

    pub fn class(&self) -> &Rc<NativeClass> {
        &self.inner.class
    }

    pub fn context(&self) -> &Context {
        &self.inner.context
    }

    pub fn state(&self) -> LifecycleState {
        self.inner.state.get()
    }

    pub fn is_disposed(&self) -> bool {
        self.state().is_disposed()
    }

    pub fn supports_children(&self) -> bool {
        self.inner.class.supports_children()
    }

    pub fn downgrade(&self) -> WeakNativeObject {
        WeakNativeObject {
            inner: Rc::downgrade(&self.inner),
        }
    }


    // Lifecycle

    /// Disposes the object and its native peer. Repeated and reentrant calls
    /// are ignored.
    pub fn dispose(&self) {
        self.dispose_with(false);
    }

    /// Disposes the object without sending `destroy`, for peers owned by the
    /// native side.
    pub fn dispose_local(&self) {
        self.dispose_with(true);
    }

    fn dispose_with(&self, skip_native: bool) {
        if self.state() != LifecycleState::Live {
            trace!("Ignored dispose of {} in state {:?}", self.cid(), self.state());
            return;
        }
        self.inner.state.set(LifecycleState::Disposing);
        self.trigger("dispose", &json!({}));
        if let Some(release) = self.class().release_hook() {
            release(self);
        }
        if !skip_native {
            match self.context().bridge() {
                Ok(bridge) => bridge.destroy(self.cid()),
                Err(_) => debug!("No bridge bound, skipped destroy of {}", self.cid()),
            }
        }
        self.context().remove(self.cid());
        self.inner.props.borrow_mut().clear();
        self.inner.state.set(LifecycleState::Disposed);
        self.inner.listeners.borrow_mut().clear();
    }

    // Native calls

    pub fn check_disposed(&self) -> Result<(), ObjectError> {
        if self.is_disposed() {
            return Err(ObjectError::Disposed {
                cid: self.cid().clone(),
            });
        }
        Ok(())
    }

    pub fn native_set(&self, name: &str, value: &Value) -> Result<(), ObjectError> {
        self.check_disposed()?;
        self.context().bridge()?.set(self.cid(), name, value);
        Ok(())
    }

    pub fn native_get(&self, name: &str) -> Result<Value, ObjectError> {
        self.check_disposed()?;
        Ok(self.context().bridge()?.get(self.cid(), name))
    }

    pub fn native_call(&self, method: &str, parameters: &Value) -> Result<Value, ObjectError> {
        self.check_disposed()?;
        Ok(self.context().bridge()?.call(self.cid(), method, parameters))
    }

    pub fn native_listen(&self, event: &str, state: bool) -> Result<(), ObjectError> {
        self.check_disposed()?;
        self.context().bridge()?.listen(self.cid(), event, state);
        Ok(())
    }
}

impl PartialEq for NativeObject {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for NativeObject {}

impl fmt::Display for NativeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class().name())
    }
}

impl fmt::Debug for NativeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeObject")
            .field("class", &self.class().name())
            .field("cid", self.cid())
            .field("state", &self.state())
            .finish()
    }
}

impl AsRef<NativeObject> for NativeObject {
    fn as_ref(&self) -> &NativeObject {
        self
    }
}
