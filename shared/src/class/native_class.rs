use std::{collections::HashMap, fmt, rc::Rc};

use log::{debug, warn};

use crate::{
    context::Context,
    object::{default_getter, default_setter, NativeObject, ObjectError},
    property_type::{PropertyType, TypeRef, TypeRegistry},
    types::{Cid, Value},
};

use super::{
    class_spec::{
        ClassSpec, DefaultValue, EventSpec, Getter, ListenHandler, PropertyConfig, ReleaseHook,
        ReorderHook, Setter, TriggerHandler,
    },
    error::ClassError,
};

/// Normalized event entry. An aliased event is reachable under both its key
/// and its alias through the same descriptor.
pub struct EventDescriptor {
    pub key: String,
    pub name: String,
    pub alias: Option<String>,
    pub listen: Option<ListenHandler>,
    pub trigger: Option<TriggerHandler>,
}

impl EventDescriptor {
    fn new(key: String, spec: EventSpec) -> Self {
        Self {
            name: spec.name.unwrap_or_else(|| key.clone()),
            key,
            alias: spec.alias,
            listen: spec.listen,
            trigger: spec.trigger,
        }
    }

    /// The other name of an aliased pair
    pub fn counterpart(&self, event: &str) -> Option<&str> {
        let alias = self.alias.as_deref()?;
        if event == self.key {
            Some(alias)
        } else {
            Some(self.key.as_str())
        }
    }
}

/// Normalized property entry
pub struct PropertyDescriptor {
    pub name: String,
    pub property_type: PropertyType,
    pub default: Option<DefaultValue>,
    pub nocache: bool,
    pub get: Getter,
    pub set: Setter,
}

impl PropertyDescriptor {
    pub fn default_value(&self) -> Option<Value> {
        self.default.as_ref().map(DefaultValue::resolve)
    }
}

/// A class of native objects: the normalized form of a `ClassSpec`
pub struct NativeClass {
    name: String,
    type_tag: String,
    fixed_cid: Option<Cid>,
    supports_children: bool,
    events: HashMap<String, Rc<EventDescriptor>>,
    event_keys: Vec<String>,
    properties: HashMap<String, Rc<PropertyDescriptor>>,
    property_names: Vec<String>,
    trigger_map: HashMap<String, String>,
    init_properties: Vec<(String, Value)>,
    reorder: Option<ReorderHook>,
    release: Option<ReleaseHook>,
    superclass: Option<Rc<NativeClass>>,
}

impl NativeClass {
    pub(crate) fn from_spec(spec: ClassSpec, types: &TypeRegistry) -> Result<Self, ClassError> {
        let ClassSpec {
            name,
            type_tag,
            cid,
            supports_children,
            events: event_specs,
            properties: property_specs,
            init_properties: own_init_properties,
            reorder,
            release,
            superclass,
        } = spec;

        let mut events = HashMap::new();
        let mut event_keys = Vec::new();
        let mut properties = HashMap::new();
        let mut property_names = Vec::new();
        let mut init_properties = Vec::new();
        let mut inherited_type_tag = None;
        let mut inherited_children = false;
        let mut inherited_reorder = None;
        let mut inherited_release = None;

        if let Some(parent) = &superclass {
            events = parent.events.clone();
            event_keys = parent.event_keys.clone();
            properties = parent.properties.clone();
            property_names = parent.property_names.clone();
            init_properties = parent.init_properties.clone();
            inherited_type_tag = Some(parent.type_tag.clone());
            inherited_children = parent.supports_children;
            inherited_reorder = parent.reorder.clone();
            inherited_release = parent.release.clone();
        }

        normalize_events(&mut events, &mut event_keys, event_specs)?;

        for (key, property_spec) in property_specs {
            let descriptor = normalize_property(&key, property_spec.normalize(), types)?;
            if !properties.contains_key(&key) {
                property_names.push(key.clone());
            }
            properties.insert(key, Rc::new(descriptor));
        }

        for (key, value) in own_init_properties {
            init_properties.retain(|(existing, _)| *existing != key);
            init_properties.push((key, value));
        }

        let trigger_map = build_trigger_map(&events, &event_keys);
        debug!(
            "Defined native class {} ({} properties, {} events)",
            name,
            properties.len(),
            trigger_map.len()
        );

        Ok(Self {
            type_tag: type_tag
                .or(inherited_type_tag)
                .unwrap_or_else(|| name.clone()),
            name,
            fixed_cid: cid,
            supports_children: supports_children.unwrap_or(inherited_children),
            events,
            event_keys,
            properties,
            property_names,
            trigger_map,
            init_properties,
            reorder: reorder.or(inherited_reorder),
            release: release.or(inherited_release),
            superclass,
        })
    }

    /// Instantiates the class.
    ///
    /// With a fixed cid the instance binds to the existing native peer and
    /// `properties` are not applied. Otherwise a fresh cid is registered,
    /// `create` is sent and `properties` go through the property pipeline.
    pub fn create<I, K>(
        self: &Rc<Self>,
        context: &Context,
        properties: I,
    ) -> Result<NativeObject, ObjectError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        if let Some(cid) = &self.fixed_cid {
            let object = NativeObject::register(context, self.clone(), Some(cid.clone()))?;
            if properties.into_iter().next().is_some() {
                warn!(
                    "{}: Ignored constructor properties for object bound to existing native peer {}",
                    self.name, cid
                );
            }
            return Ok(object);
        }
        let bridge = context.bridge()?;
        let object = NativeObject::register(context, self.clone(), None)?;
        object.create_native(bridge.as_ref(), properties)?;
        Ok(object)
    }

    /// `create` without constructor properties
    pub fn instantiate(self: &Rc<Self>, context: &Context) -> Result<NativeObject, ObjectError> {
        self.create(context, Vec::<(String, Value)>::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn fixed_cid(&self) -> Option<&Cid> {
        self.fixed_cid.as_ref()
    }

    pub fn supports_children(&self) -> bool {
        self.supports_children
    }

    pub fn superclass(&self) -> Option<&Rc<NativeClass>> {
        self.superclass.as_ref()
    }

    pub fn is_subclass_of(&self, other: &Rc<NativeClass>) -> bool {
        let mut current = self.superclass.as_ref();
        while let Some(parent) = current {
            if Rc::ptr_eq(parent, other) {
                return true;
            }
            current = parent.superclass.as_ref();
        }
        false
    }

    pub fn property(&self, name: &str) -> Option<Rc<PropertyDescriptor>> {
        self.properties.get(name).cloned()
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Declared property keys in declaration order, inherited ones first
    pub fn property_names(&self) -> &[String] {
        &self.property_names
    }

    pub fn event(&self, name: &str) -> Option<Rc<EventDescriptor>> {
        self.events.get(name).cloned()
    }

    /// Logical event key for an inbound wire name
    pub fn trigger_key(&self, wire_name: &str) -> Option<&str> {
        self.trigger_map.get(wire_name).map(String::as_str)
    }

    pub fn init_properties(&self) -> &[(String, Value)] {
        &self.init_properties
    }

    pub fn reorder_properties(&self, names: Vec<String>) -> Vec<String> {
        match &self.reorder {
            Some(reorder) => reorder(names),
            None => names,
        }
    }

    pub(crate) fn release_hook(&self) -> Option<ReleaseHook> {
        self.release.clone()
    }
}

impl fmt::Debug for NativeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeClass")
            .field("name", &self.name)
            .field("type_tag", &self.type_tag)
            .field("fixed_cid", &self.fixed_cid)
            .field("properties", &self.property_names)
            .finish()
    }
}

fn normalize_events(
    events: &mut HashMap<String, Rc<EventDescriptor>>,
    event_keys: &mut Vec<String>,
    specs: Vec<(String, EventSpec)>,
) -> Result<(), ClassError> {
    let mut declared = Vec::with_capacity(specs.len());
    for (key, spec) in specs {
        if let Some(existing) = events.get(&key).cloned() {
            if existing.key != key {
                return Err(ClassError::AliasConflict {
                    event: existing.key.clone(),
                    alias: key,
                });
            }
            // an overridden event takes its alias with it
            if let Some(alias) = &existing.alias {
                if events
                    .get(alias)
                    .is_some_and(|entry| Rc::ptr_eq(entry, &existing))
                {
                    events.remove(alias);
                }
            }
        } else {
            event_keys.push(key.clone());
        }
        let descriptor = Rc::new(EventDescriptor::new(key.clone(), spec));
        events.insert(key, descriptor.clone());
        declared.push(descriptor);
    }
    for descriptor in declared {
        let Some(alias) = &descriptor.alias else {
            continue;
        };
        if events.contains_key(alias) {
            return Err(ClassError::AliasConflict {
                event: descriptor.key.clone(),
                alias: alias.clone(),
            });
        }
        events.insert(alias.clone(), descriptor.clone());
    }
    Ok(())
}

fn normalize_property(
    name: &str,
    config: PropertyConfig,
    types: &TypeRegistry,
) -> Result<PropertyDescriptor, ClassError> {
    let type_ref = config.type_ref.unwrap_or_else(|| TypeRef::named("any"));
    let property_type = if type_ref == TypeRef::named("any") && !types.contains("any") {
        PropertyType::new("any")
    } else {
        types.resolve(&type_ref)?
    };
    Ok(PropertyDescriptor {
        name: name.to_string(),
        property_type,
        default: config.default,
        nocache: config.nocache,
        get: config.access.get.unwrap_or_else(|| Rc::new(default_getter)),
        set: config.access.set.unwrap_or_else(|| Rc::new(default_setter)),
    })
}

/// Wire name to event key, in declaration order. A later declaration with
/// the same wire name replaces an earlier one.
fn build_trigger_map(
    events: &HashMap<String, Rc<EventDescriptor>>,
    event_keys: &[String],
) -> HashMap<String, String> {
    let mut trigger_map = HashMap::new();
    for descriptor in event_keys.iter().filter_map(|key| events.get(key)) {
        let previous = trigger_map.insert(descriptor.name.clone(), descriptor.key.clone());
        if let Some(previous) = previous {
            debug!(
                "Native event \"{}\" now triggers \"{}\" instead of \"{}\"",
                descriptor.name, descriptor.key, previous
            );
        }
    }
    trigger_map
}
