use std::collections::HashMap;

use log::{trace, warn};

use crate::types::Value;

use super::native_object::NativeObject;

impl NativeObject {
    /// Reads a property through its getter and decodes it.
    ///
    /// Returns `None` for disposed objects and undeclared properties, both
    /// with a warning.
    pub fn get(&self, name: &str) -> Option<Value> {
        if self.is_disposed() {
            warn!("Cannot get property \"{}\" on disposed object", name);
            return None;
        }
        let Some(property) = self.class().property(name) else {
            warn!("{}: Unknown property \"{}\"", self, name);
            return None;
        };
        let value = (property.get)(self, name)?;
        Some(property.property_type.decode(value))
    }

    /// Writes one property. Unknown names and rejected values are logged and
    /// dropped.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> &Self {
        self.set_existing_property(name, value.into());
        self
    }

    /// Writes several properties in the order chosen by the class's reorder
    /// hook. Later duplicates of a key replace earlier ones.
    pub fn set_all<I, K>(&self, properties: I) -> &Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut names = Vec::new();
        let mut values = HashMap::new();
        for (name, value) in properties {
            let name = name.into();
            if values.insert(name.clone(), value).is_none() {
                names.push(name);
            }
        }
        for name in self.class().reorder_properties(names) {
            if let Some(value) = values.remove(&name) {
                self.set_existing_property(&name, value);
            }
        }
        self
    }

    fn set_existing_property(&self, name: &str, value: Value) {
        if self.class().has_property(name) {
            self.set_property(name, value);
        } else {
            warn!("{}: Unknown property \"{}\"", self, name);
        }
    }

    fn set_property(&self, name: &str, value: Value) {
        if self.is_disposed() {
            warn!("Cannot set property \"{}\" on disposed object", name);
            return;
        }
        let Some(property) = self.class().property(name) else {
            return;
        };
        let encoded = match property.property_type.encode(value) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(
                    "{}: Ignored unsupported value for property \"{}\": {}",
                    self, name, err
                );
                return;
            }
        };
        (property.set)(self, name, encoded);
    }

    /// Caches an encoded value and raises `change:<name>` if it differs from
    /// the current one. `None` drops the cached value.
    pub fn store_property(&self, name: &str, encoded: Option<Value>) {
        let unchanged = match (self.stored_property(name), &encoded) {
            (Some(current), Some(next)) => same_value(&current, next),
            (current, next) => current.is_none() && next.is_none(),
        };
        if unchanged {
            trace!("{}: Skipped redundant write of \"{}\"", self, name);
            return;
        }
        {
            let mut props = self.inner.props.borrow_mut();
            match &encoded {
                Some(value) => {
                    props.insert(name.to_string(), value.clone());
                }
                None => {
                    props.remove(name);
                }
            }
        }
        self.trigger_change_event(name, encoded.as_ref());
    }

    /// Cached encoded value, or the property's default
    pub fn stored_property(&self, name: &str) -> Option<Value> {
        let cached = self.inner.props.borrow().get(name).cloned();
        cached.or_else(|| {
            self.class()
                .property(name)
                .and_then(|property| property.default_value())
        })
    }

    pub fn trigger_change_event(&self, name: &str, encoded: Option<&Value>) {
        let decoded = match (self.class().property(name), encoded) {
            (Some(property), Some(value)) => property.property_type.decode(value.clone()),
            (None, Some(value)) => value.clone(),
            (_, None) => Value::Null,
        };
        self.trigger(&format!("change:{}", name), &decoded);
    }
}

/// Standard getter: cached or default value, else one uncached read from the
/// native peer.
pub fn default_getter(object: &NativeObject, name: &str) -> Option<Value> {
    if let Some(value) = object.stored_property(name) {
        return Some(value);
    }
    match object.native_get(name) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("{}: Could not read \"{}\": {}", object, name, err);
            None
        }
    }
}

/// Standard setter: forward to the native peer, then store (or, for
/// `nocache` properties, just announce) the value.
pub fn default_setter(object: &NativeObject, name: &str, value: Value) {
    if let Err(err) = object.native_set(name, &value) {
        warn!("{}: Could not write \"{}\": {}", object, name, err);
        return;
    }
    let nocache = object
        .class()
        .property(name)
        .map(|property| property.nocache)
        .unwrap_or(false);
    if nocache {
        object.trigger_change_event(name, Some(&value));
    } else {
        object.store_property(name, Some(value));
    }
}

/// Value equality for change detection. Numbers compare by numeric value, so
/// `1` and `1.0` are the same write.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if x.is_f64() || y.is_f64() {
                x.as_f64() == y.as_f64()
            } else {
                x == y
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same_value(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| same_value(x, y)))
        }
        _ => a == b,
    }
}
