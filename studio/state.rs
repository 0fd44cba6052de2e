use std::sync::Arc;

use lora_tagger::Transformer;

/// Immutable per-process state handed to every handler.
///
/// Nothing here is mutated after startup, so no lock is needed.
pub struct ServerState {
    pub transformer: Transformer,
}

impl ServerState {
    pub fn new(transformer: Transformer) -> Self {
        ServerState { transformer }
    }
}

/// Shared state type — an `Arc<ServerState>` passed to every handler.
pub type SharedState = Arc<ServerState>;
