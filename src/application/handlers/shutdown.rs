//! Shutdown signal helpers shared by the resolver and the pipeline.

use tokio::sync::watch;

/// Completes once `true` is sent on the channel.
///
/// If the sender is dropped without signalling, this never completes.
pub async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    let closed = shutdown.wait_for(|stop| *stop).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}

/// Like [`shutdown_requested`] for an optional channel; `None` never completes.
pub async fn shutdown_requested_opt(shutdown: Option<&watch::Receiver<bool>>) {
    match shutdown {
        Some(rx) => {
            let mut rx = rx.clone();
            shutdown_requested(&mut rx).await;
        }
        None => std::future::pending::<()>().await,
    }
}
