pub mod class_spec;
pub mod error;
pub mod native_class;

pub use class_spec::{
    ClassSpec, DefaultValue, EventSpec, Getter, ListenHandler, PropertyAccess, PropertyConfig,
    PropertySpec, ReleaseHook, ReorderHook, Setter, TriggerHandler,
};
pub use error::ClassError;
pub use native_class::{EventDescriptor, NativeClass, PropertyDescriptor};
