use std::{fmt, rc::Rc};

use crate::{
    object::NativeObject,
    property_type::{TypeRef, TypeRegistry},
    types::{Cid, Value},
};

use super::{error::ClassError, native_class::NativeClass};

/// Reads the raw (encoded) value of a property
pub type Getter = Rc<dyn Fn(&NativeObject, &str) -> Option<Value>>;
/// Writes an already encoded value
pub type Setter = Rc<dyn Fn(&NativeObject, &str, Value)>;
/// Custom native subscription toggle: `(object, state, via_alias)`
pub type ListenHandler = Rc<dyn Fn(&NativeObject, bool, bool)>;
/// Custom inbound event handler: `(object, params, event)`; the result is
/// handed back to the native side.
pub type TriggerHandler = Rc<dyn Fn(&NativeObject, &Value, &str) -> Option<Value>>;
pub type ReorderHook = Rc<dyn Fn(Vec<String>) -> Vec<String>>;
pub type ReleaseHook = Rc<dyn Fn(&NativeObject)>;

/// Default value of a property. `Lazy` is evaluated on every read.
#[derive(Clone)]
pub enum DefaultValue {
    Const(Value),
    Lazy(Rc<dyn Fn() -> Value>),
}

impl DefaultValue {
    pub fn resolve(&self) -> Value {
        match self {
            DefaultValue::Const(value) => value.clone(),
            DefaultValue::Lazy(function) => function(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Const(value) => f.debug_tuple("Const").field(value).finish(),
            DefaultValue::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// Overrides of the default get/set strategies
#[derive(Clone, Default)]
pub struct PropertyAccess {
    pub get: Option<Getter>,
    pub set: Option<Setter>,
}

/// Full form of a property declaration
#[derive(Clone, Default)]
pub struct PropertyConfig {
    pub(crate) type_ref: Option<TypeRef>,
    pub(crate) default: Option<DefaultValue>,
    pub(crate) nocache: bool,
    pub(crate) access: PropertyAccess,
}

impl PropertyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of_type(mut self, type_ref: impl Into<TypeRef>) -> Self {
        self.type_ref = Some(type_ref.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Const(value.into()));
        self
    }

    pub fn lazy_default<F>(mut self, function: F) -> Self
    where
        F: Fn() -> Value + 'static,
    {
        self.default = Some(DefaultValue::Lazy(Rc::new(function)));
        self
    }

    /// Writes are forwarded and echoed as change events, never stored
    pub fn nocache(mut self) -> Self {
        self.nocache = true;
        self
    }

    pub fn getter<F>(mut self, get: F) -> Self
    where
        F: Fn(&NativeObject, &str) -> Option<Value> + 'static,
    {
        self.access.get = Some(Rc::new(get));
        self
    }

    pub fn setter<F>(mut self, set: F) -> Self
    where
        F: Fn(&NativeObject, &str, Value) + 'static,
    {
        self.access.set = Some(Rc::new(set));
        self
    }
}

/// A property declaration in one of its three accepted forms
#[derive(Clone)]
pub enum PropertySpec {
    Named(String),
    Parametrized(String, Vec<Value>),
    Full(PropertyConfig),
}

impl PropertySpec {
    /// Collapses the shorthand forms into a `PropertyConfig`
    pub fn normalize(self) -> PropertyConfig {
        match self {
            PropertySpec::Named(name) => PropertyConfig::new().of_type(TypeRef::Named(name)),
            PropertySpec::Parametrized(name, args) => {
                PropertyConfig::new().of_type(TypeRef::Parametrized(name, args))
            }
            PropertySpec::Full(config) => config,
        }
    }
}

impl From<&str> for PropertySpec {
    fn from(name: &str) -> Self {
        PropertySpec::Named(name.to_string())
    }
}

impl From<TypeRef> for PropertySpec {
    fn from(type_ref: TypeRef) -> Self {
        match type_ref {
            TypeRef::Named(name) => PropertySpec::Named(name),
            TypeRef::Parametrized(name, args) => PropertySpec::Parametrized(name, args),
        }
    }
}

impl From<PropertyConfig> for PropertySpec {
    fn from(config: PropertyConfig) -> Self {
        PropertySpec::Full(config)
    }
}

/// Event declaration
#[derive(Clone, Default)]
pub struct EventSpec {
    pub(crate) name: Option<String>,
    pub(crate) alias: Option<String>,
    pub(crate) listen: Option<ListenHandler>,
    pub(crate) trigger: Option<TriggerHandler>,
}

impl EventSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Event whose wire name differs from its key
    pub fn wire(name: impl Into<String>) -> Self {
        Self::new().name(name)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn on_listen<F>(mut self, listen: F) -> Self
    where
        F: Fn(&NativeObject, bool, bool) + 'static,
    {
        self.listen = Some(Rc::new(listen));
        self
    }

    pub fn on_trigger<F>(mut self, trigger: F) -> Self
    where
        F: Fn(&NativeObject, &Value, &str) -> Option<Value> + 'static,
    {
        self.trigger = Some(Rc::new(trigger));
        self
    }
}

/// Declarative description of a native class, turned into a `NativeClass`
/// by `build`.
///
/// ```ignore
/// let widget = ClassSpec::new("Widget")
///     .type_tag("tabris.Widget")
///     .property("opacity", PropertyConfig::new().of_type("opacity").default_value(1.0))
///     .event("select", EventSpec::new().alias("tap"))
///     .build(&TypeRegistry::default())?;
/// ```
pub struct ClassSpec {
    pub(crate) name: String,
    pub(crate) type_tag: Option<String>,
    pub(crate) cid: Option<Cid>,
    pub(crate) supports_children: Option<bool>,
    pub(crate) events: Vec<(String, EventSpec)>,
    pub(crate) properties: Vec<(String, PropertySpec)>,
    pub(crate) init_properties: Vec<(String, Value)>,
    pub(crate) reorder: Option<ReorderHook>,
    pub(crate) release: Option<ReleaseHook>,
    pub(crate) superclass: Option<Rc<NativeClass>>,
}

impl ClassSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: None,
            cid: None,
            supports_children: None,
            events: Vec::new(),
            properties: Vec::new(),
            init_properties: Vec::new(),
            reorder: None,
            release: None,
            superclass: None,
        }
    }

    pub fn extends(mut self, superclass: &Rc<NativeClass>) -> Self {
        self.superclass = Some(superclass.clone());
        self
    }

    /// Native type sent with `create`. Defaults to the class name.
    pub fn type_tag(mut self, type_tag: impl Into<String>) -> Self {
        self.type_tag = Some(type_tag.into());
        self
    }

    /// Binds every instance to an existing native peer. No `create` is sent.
    pub fn cid(mut self, cid: impl Into<Cid>) -> Self {
        self.cid = Some(cid.into());
        self
    }

    pub fn supports_children(mut self, supports_children: bool) -> Self {
        self.supports_children = Some(supports_children);
        self
    }

    pub fn event(mut self, key: impl Into<String>, spec: EventSpec) -> Self {
        self.events.push((key.into(), spec));
        self
    }

    pub fn property(mut self, key: impl Into<String>, spec: impl Into<PropertySpec>) -> Self {
        self.properties.push((key.into(), spec.into()));
        self
    }

    /// Sent unconditionally right after `create`, bypassing the pipeline
    pub fn init_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.init_properties.push((key.into(), value.into()));
        self
    }

    pub fn reorder_properties<F>(mut self, reorder: F) -> Self
    where
        F: Fn(Vec<String>) -> Vec<String> + 'static,
    {
        self.reorder = Some(Rc::new(reorder));
        self
    }

    pub fn on_release<F>(mut self, release: F) -> Self
    where
        F: Fn(&NativeObject) + 'static,
    {
        self.release = Some(Rc::new(release));
        self
    }

    pub fn build(self, types: &TypeRegistry) -> Result<Rc<NativeClass>, ClassError> {
        NativeClass::from_spec(self, types).map(Rc::new)
    }
}
