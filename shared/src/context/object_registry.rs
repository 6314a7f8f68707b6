use std::collections::HashMap;

use crate::{
    object::{NativeObject, ObjectError},
    types::Cid,
};

/// Correlation ids of live objects.
///
/// Entries own their object from registration until `dispose` (or context
/// shutdown) removes them, so a native peer stays reachable even when the
/// application keeps no handle of its own.
pub struct ObjectRegistry {
    prefix: String,
    next_id: u64,
    objects: HashMap<Cid, NativeObject>,
}

impl ObjectRegistry {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next_id: 1,
            objects: HashMap::new(),
        }
    }

    /// Picks the id for a new object: `fixed` if given and not bound to a
    /// live object, else the next generated one.
    pub fn next_cid(&mut self, fixed: Option<Cid>) -> Result<Cid, ObjectError> {
        if let Some(cid) = fixed {
            if self.contains(&cid) {
                return Err(ObjectError::CidInUse { cid });
            }
            return Ok(cid);
        }
        loop {
            let cid = Cid::new(format!("{}{}", self.prefix, self.next_id));
            self.next_id += 1;
            if !self.contains(&cid) {
                return Ok(cid);
            }
        }
    }

    pub fn register(&mut self, object: &NativeObject) {
        self.objects.insert(object.cid().clone(), object.clone());
    }

    /// Returns the entry that was registered under `cid`
    pub fn remove(&mut self, cid: &Cid) -> Option<NativeObject> {
        self.objects.remove(cid)
    }

    pub fn get(&self, cid: &Cid) -> Option<NativeObject> {
        self.objects.get(cid).cloned()
    }

    pub fn contains(&self, cid: &Cid) -> bool {
        self.objects.contains_key(cid)
    }

    /// Registered objects, in no particular order
    pub fn objects(&self) -> Vec<NativeObject> {
        self.objects.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Drops every entry and returns them, releasing the registry's hold on
    /// the objects.
    pub(crate) fn drain(&mut self) -> Vec<NativeObject> {
        self.objects.drain().map(|(_, object)| object).collect()
    }
}
