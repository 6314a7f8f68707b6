use log::warn;
use serde::{de::DeserializeOwned, Serialize};

use super::native_object::NativeObject;

impl NativeObject {
    /// Reads a property and converts it into `T`
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let value = self.get(name)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(err) => {
                warn!("{}: Property \"{}\" has unexpected shape: {}", self, name, err);
                None
            }
        }
    }

    /// Converts `value` and writes it through the pipeline
    pub fn set_as<T: Serialize>(&self, name: &str, value: T) -> &Self {
        match serde_json::to_value(value) {
            Ok(value) => self.set(name, value),
            Err(err) => {
                warn!("{}: Ignored unserializable value for property \"{}\": {}", self, name, err);
                self
            }
        }
    }
}

/// Generates typed accessors on a wrapper around `NativeObject`.
///
/// The wrapper must implement `AsRef<NativeObject>`.
///
/// ```ignore
/// struct Button(NativeObject);
///
/// native_properties!(Button {
///     text / set_text: String = "text",
///     opacity / set_opacity: f64 = "opacity",
/// });
/// ```
#[macro_export]
macro_rules! native_properties {
    ($wrapper:ty { $($getter:ident / $setter:ident : $value:ty = $key:literal),* $(,)? }) => {
        impl $wrapper {
            $(
                pub fn $getter(&self) -> Option<$value> {
                    ::core::convert::AsRef::<$crate::NativeObject>::as_ref(self).get_as::<$value>($key)
                }

                pub fn $setter(&self, value: $value) -> &Self {
                    ::core::convert::AsRef::<$crate::NativeObject>::as_ref(self).set_as($key, value);
                    self
                }
            )*
        }
    };
}
