//! Runs the in-memory backend on an ephemeral local port.

use super::fake_api::{router, BackendOptions, SharedStore, Store};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use tokio::sync::oneshot;

/// A backend serving on its own thread until dropped.
pub struct FakeServer {
    addr: SocketAddr,
    store: SharedStore,
    shutdown: Option<oneshot::Sender<()>>,
}

impl FakeServer {
    /// Bind `127.0.0.1:0` and start serving.
    pub fn start(options: BackendOptions) -> Result<Self> {
        let store: SharedStore = Arc::new(Mutex::new(Store::new(&options)));
        let app = router(store.clone());
        let (addr_tx, addr_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    let _ = addr_tx.send(Err(anyhow::Error::from(e)));
                    return;
                }
            };
            runtime.block_on(async move {
                let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
                    Ok(listener) => listener,
                    Err(e) => {
                        let _ = addr_tx.send(Err(e.into()));
                        return;
                    }
                };
                let _ = addr_tx.send(listener.local_addr().map_err(Into::into));
                let _ = axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        let _ = shutdown_rx.await;
                    })
                    .await;
            });
        });

        let addr = addr_rx
            .recv()
            .context("backend thread exited before binding")??;
        Ok(Self {
            addr,
            store,
            shutdown: Some(shutdown_tx),
        })
    }

    /// Base URL the harness appends case paths to.
    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    /// Read-only view of what the backend holds right now.
    pub fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
