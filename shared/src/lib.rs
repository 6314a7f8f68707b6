//! # Tessera Shared
//! Object, property and event model for UI objects whose state lives in a
//! native platform peer reached through a command bridge.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod class;
mod config;
mod context;
mod object;
mod property_type;
mod types;

pub use class::{
    ClassError, ClassSpec, DefaultValue, EventDescriptor, EventSpec, Getter, ListenHandler,
    NativeClass, PropertyAccess, PropertyConfig, PropertyDescriptor, PropertySpec, ReleaseHook,
    ReorderHook, Setter, TriggerHandler,
};
pub use config::ContextConfig;
pub use context::{Context, NativeBridge, ObjectRegistry};
pub use object::{
    default_getter, default_setter, Callback, NativeObject, ObjectError, WeakNativeObject,
};
pub use property_type::{
    builtin, EncodeError, Decoder, Encoder, PropertyType, TypeRef, TypeRegistry,
};
pub use types::{Cid, LifecycleState, ListenerId, Value};
