use crate::types::{Cid, Value};

/// Command channel to the native platform. Every command addresses one
/// native peer by its correlation id.
///
/// `get` and `call` are blocking round-trips from the caller's point of view.
pub trait NativeBridge {
    fn create(&self, cid: &Cid, type_tag: &str);
    fn set(&self, cid: &Cid, name: &str, value: &Value);
    fn get(&self, cid: &Cid, name: &str) -> Value;
    fn listen(&self, cid: &Cid, event: &str, state: bool);
    fn call(&self, cid: &Cid, method: &str, parameters: &Value) -> Value;
    fn destroy(&self, cid: &Cid);
}
