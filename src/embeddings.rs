//! Deterministic placeholder embeddings behind a swappable interface.
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::{
    sync::{mpsc, oneshot, Mutex},
    task::JoinHandle,
};
use tracing::debug;

pub const EMBEDDING_DIM: usize = 8;

#[derive(thiserror::Error, Debug)]
pub enum EmbedError {
    #[error("embeddings worker is not running")]
    NotRunning,

    #[error("embeddings worker dropped the request")]
    Dropped,
}

/// Same text in, same vector out.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Vec<f64>;
}

/// SHA-256 digest read as eight big-endian u32 words scaled into [0, 1).
#[derive(Debug, Default, Clone, Copy)]
pub struct HashEmbedder;

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Vec<f64> {
        const SCALE: f64 = 4_294_967_296.0; // 2^32
        Sha256::digest(text.as_bytes())
            .chunks_exact(4)
            .map(|w| {
                let word = u32::from_be_bytes([w[0], w[1], w[2], w[3]]);
                round6(f64::from(word) / SCALE)
            })
            .collect()
    }
}

fn round6(x: f64) -> f64 { (x * 1e6).round() / 1e6 }

type Job = (String, oneshot::Sender<Vec<f64>>);

/* ------------ queue worker -------------- */

/// Cloneable handle to a background task that computes embeddings in order.
#[derive(Clone)]
pub struct EmbeddingsWorker {
    tx:   mpsc::Sender<Job>,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl EmbeddingsWorker {
    /// Spawn the runner. Needs a tokio runtime.
    pub fn start(embedder: Arc<dyn Embedder>, queue: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<Job>(queue.max(1));
        let task = tokio::spawn(async move {
            while let Some((text, reply)) = rx.recv().await {
                let _ = reply.send(embedder.embed(&text));
            }
            debug!("embeddings worker drained");
        });
        Self { tx, task: Arc::new(Mutex::new(Some(task))) }
    }

    pub async fn embed(&self, text: &str) -> Result<Vec<f64>, EmbedError> {
        let (reply, rx) = oneshot::channel();
        self.tx.send((text.to_owned(), reply)).await.map_err(|_| EmbedError::NotRunning)?;
        rx.await.map_err(|_| EmbedError::Dropped)
    }

    /// Stop the runner; later `embed` calls fail with `NotRunning`.
    pub async fn shutdown(&self) {
        if let Some(task) = self.task.lock().await.take() {
            task.abort();
            let _ = task.await;
            debug!("embeddings worker stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_embedding_is_deterministic() {
        let e = HashEmbedder;
        let v = e.embed("ping");
        assert_eq!(v.len(), EMBEDDING_DIM);
        assert_eq!(v, e.embed("ping"));
        assert_ne!(v, e.embed("pong"));
        assert!(v.iter().all(|x| (0.0..1.0).contains(x)));
    }

    #[test]
    fn values_have_six_decimals() {
        for x in HashEmbedder.embed("hello there") {
            assert!(((x * 1e6).round() - x * 1e6).abs() < 1e-6);
        }
    }

    #[test]
    fn empty_text_hashes_known_digest() {
        // sha256("") starts with e3b0c442
        let first = HashEmbedder.embed("")[0];
        assert_eq!(first, round6(f64::from(0xe3b0_c442_u32) / 4_294_967_296.0));
    }

    #[tokio::test]
    async fn worker_matches_embedder_and_stops() {
        let worker = EmbeddingsWorker::start(Arc::new(HashEmbedder), 4);
        assert_eq!(worker.embed("ping").await.unwrap(), HashEmbedder.embed("ping"));

        worker.shutdown().await;
        worker.shutdown().await;
        assert!(matches!(worker.embed("ping").await, Err(EmbedError::NotRunning)));
    }
}
