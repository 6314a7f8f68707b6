pub mod error;
pub mod events;
pub mod native_object;
pub mod property_pipeline;
pub mod typed;

pub use error::ObjectError;
pub use events::Callback;
pub use native_object::{NativeObject, WeakNativeObject};
pub use property_pipeline::{default_getter, default_setter};
