/// Settings of a `Context`, fixed at construction
#[derive(Clone, Debug)]
pub struct ContextConfig {
    /// Prefix of generated correlation ids. Ids are `prefix` followed by a
    /// counter starting at 1.
    pub cid_prefix: String,
    /// Whether `Context::shutdown` disposes objects that are still live.
    /// Disposal on shutdown never sends `destroy`, the bridge is gone by then.
    pub dispose_on_shutdown: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            cid_prefix: "$".to_string(),
            dispose_on_shutdown: true,
        }
    }
}

impl ContextConfig {
    pub fn with_cid_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.cid_prefix = prefix.into();
        self
    }

    pub fn keep_objects_on_shutdown(mut self) -> Self {
        self.dispose_on_shutdown = false;
        self
    }
}
