use std::{collections::HashMap, fmt, rc::Rc};

use crate::{class::ClassError, types::Value};

pub mod builtin;
pub mod error;
pub use error::EncodeError;

/// Encoder function. Receives the value and the arguments bound by a
/// parametrized type reference.
pub type Encoder = Rc<dyn Fn(Value, &[Value]) -> Result<Value, EncodeError>>;
/// Decoder function, same argument convention as `Encoder`.
pub type Decoder = Rc<dyn Fn(Value, &[Value]) -> Value>;

/// Reference to a property type as written in a class spec
#[derive(Clone, Debug, PartialEq)]
pub enum TypeRef {
    Named(String),
    Parametrized(String, Vec<Value>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn parametrized(name: impl Into<String>, args: Vec<Value>) -> Self {
        TypeRef::Parametrized(name.into(), args)
    }

    pub fn name(&self) -> &str {
        match self {
            TypeRef::Named(name) | TypeRef::Parametrized(name, _) => name,
        }
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        TypeRef::named(name)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::Parametrized(name, args) => {
                write!(f, "[{}", name)?;
                for arg in args {
                    write!(f, ", {}", arg)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// An encode/decode pair. Either side may be absent, in which case values
/// pass through unchanged.
#[derive(Clone)]
pub struct PropertyType {
    name: String,
    encode: Option<Encoder>,
    decode: Option<Decoder>,
    args: Vec<Value>,
}

impl PropertyType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            encode: None,
            decode: None,
            args: Vec::new(),
        }
    }

    pub fn with_encoder<F>(mut self, encode: F) -> Self
    where
        F: Fn(Value, &[Value]) -> Result<Value, EncodeError> + 'static,
    {
        self.encode = Some(Rc::new(encode));
        self
    }

    pub fn with_decoder<F>(mut self, decode: F) -> Self
    where
        F: Fn(Value, &[Value]) -> Value + 'static,
    {
        self.decode = Some(Rc::new(decode));
        self
    }

    /// Copy of this type with `args` bound after the value argument of both
    /// coders.
    pub fn bind(&self, args: Vec<Value>) -> Self {
        let mut bound = self.clone();
        bound.args = args;
        bound
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn has_encoder(&self) -> bool {
        self.encode.is_some()
    }

    pub fn has_decoder(&self) -> bool {
        self.decode.is_some()
    }

    pub fn encode(&self, value: Value) -> Result<Value, EncodeError> {
        match &self.encode {
            Some(encode) => encode(value, &self.args),
            None => Ok(value),
        }
    }

    pub fn decode(&self, value: Value) -> Value {
        match &self.decode {
            Some(decode) => decode(value, &self.args),
            None => value,
        }
    }
}

impl fmt::Debug for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyType")
            .field("name", &self.name)
            .field("encode", &self.encode.is_some())
            .field("decode", &self.decode.is_some())
            .field("args", &self.args)
            .finish()
    }
}

/// Named property types available to class specs
pub struct TypeRegistry {
    types: HashMap<String, PropertyType>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl TypeRegistry {
    /// Registry without any types, not even `any`
    pub fn empty() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        for property_type in builtin::all() {
            registry.register(property_type);
        }
        registry
    }

    /// Adds or replaces a type under its own name
    pub fn register(&mut self, property_type: PropertyType) -> &mut Self {
        self.types
            .insert(property_type.name().to_string(), property_type);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn resolve(&self, type_ref: &TypeRef) -> Result<PropertyType, ClassError> {
        let Some(property_type) = self.types.get(type_ref.name()) else {
            return Err(ClassError::UnknownPropertyType {
                type_name: type_ref.to_string(),
            });
        };
        match type_ref {
            TypeRef::Named(_) => Ok(property_type.clone()),
            TypeRef::Parametrized(_, args) => Ok(property_type.bind(args.clone())),
        }
    }
}
