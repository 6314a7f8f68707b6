use thiserror::Error;

use crate::types::Cid;

/// Errors that can occur while instantiating or talking to a native object
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    /// No native bridge is bound to the context
    #[error("Native bridge not started. Call `Context::start()` before creating native objects")]
    NotStarted,

    /// A native operation was attempted on a disposed object
    #[error("Object {cid} is disposed")]
    Disposed { cid: Cid },

    /// A fixed correlation id is still held by a live object
    #[error("Correlation id {cid} is already bound to a live object")]
    CidInUse { cid: Cid },
}
