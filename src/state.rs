use std::sync::Arc;

use crate::{
    catalog::Catalog,
    config::Settings,
    embeddings::{EmbeddingsWorker, HashEmbedder},
    hub::RoomHub,
    store::MessageStore,
};

pub type SharedStore   = Arc<MessageStore>;
pub type SharedCatalog = Arc<Catalog>;
pub type SharedHub     = Arc<RoomHub>;

/* ------------ handles passed to every handler -------------- */
#[derive(Clone)]
pub struct AppState {
    pub catalog:    SharedCatalog,
    pub store:      SharedStore,
    pub hub:        SharedHub,
    pub embeddings: EmbeddingsWorker,
}

impl AppState {
    /// Starts the embeddings worker, so call it inside a tokio runtime.
    pub fn new(settings: &Settings) -> Self {
        let store = SharedStore::new(MessageStore::new(settings.history_limit));
        Self {
            catalog:    SharedCatalog::default(),
            hub:        SharedHub::new(RoomHub::new(store.clone(), settings.send_timeout)),
            store,
            embeddings: EmbeddingsWorker::start(Arc::new(HashEmbedder), settings.embed_queue),
        }
    }
}
