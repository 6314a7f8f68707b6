
pub use event_log::EventLog;
pub use recording_bridge::{BridgeCommand, RecordingBridge};

use std::rc::Rc;

use tessera_shared::{Context, ContextConfig};

/// Installs a test logger once per process
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Context already bound to a fresh recording bridge
pub fn started_context() -> (Context, Rc<RecordingBridge>) {
    init_logging();
    let bridge = RecordingBridge::new();
    let context = Context::started(ContextConfig::default(), bridge.clone());
    (context, bridge)
}
