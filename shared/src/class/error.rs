use thiserror::Error;

/// Errors raised while building a `NativeClass`. These indicate a mistake in
/// the class definition and abort the build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassError {
    /// A property declares a type name the registry does not know
    #[error("Can not find property type {type_name}")]
    UnknownPropertyType { type_name: String },

    /// An event alias collides with another declared event
    #[error("Alias '{alias}' of event '{event}' collides with another event name")]
    AliasConflict { event: String, alias: String },
}
