use crate::config::Listener;
use crate::errors::Result;
use crate::service::VanityService;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use tokio::net::TcpListener;

/// Accept loop for the resolver. Each connection gets its own task and a
/// clone of the service; requests share nothing but the store handle, so
/// arbitrary interleaving is safe without locking.
pub async fn serve(listener: &Listener, service: VanityService) -> Result<()> {
    let tcp = TcpListener::bind(format!("{}:{}", listener.host, listener.port)).await?;
    tracing::info!(host = %listener.host, port = listener.port, "listening");

    loop {
        let (stream, _peer_addr) = tcp.accept().await?;
        let _ = stream.set_nodelay(true);
        let io = TokioIo::new(stream);
        let svc = service.clone();

        // Hand the connection to hyper; auto-detect h1/h2 on this socket
        tokio::spawn(async move {
            if let Err(err) = Builder::new(TokioExecutor::new())
                .serve_connection(io, svc)
                .await
            {
                tracing::debug!(error = %err, "connection closed with error");
            }
        });
    }
}
