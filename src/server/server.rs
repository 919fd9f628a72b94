//! TCP server: one task per connection, all sharing the store.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{self, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::data::QuizStore;
use crate::error::QuizError;

use super::channel::{LineChannel, TcpChannel};
use super::session::Session;

/// Bind `addr` and serve until Ctrl-C.
pub async fn run(addr: &str, store: Arc<dyn QuizStore>) -> Result<(), QuizError> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "server listening");
    serve(listener, store, shutdown_signal()).await
}

/// Accept connections on `listener` until `shutdown` resolves.
///
/// Open sessions are cancelled on shutdown, which closes their sockets.
pub async fn serve<F>(
    listener: TcpListener,
    store: Arc<dyn QuizStore>,
    shutdown: F,
) -> Result<(), QuizError>
where
    F: Future<Output = ()>,
{
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let mut sessions = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    sessions.spawn(handle_connection(
                        stream,
                        addr,
                        Arc::clone(&store),
                        cancel_rx.clone(),
                    ));
                }
                Err(e) => warn!(error = %e, "failed to accept connection"),
            },
            Some(_) = sessions.join_next(), if !sessions.is_empty() => {}
            () = &mut shutdown => {
                info!(open_sessions = sessions.len(), "shutting down");
                break;
            }
        }
    }

    let _ = cancel_tx.send(true);
    while sessions.join_next().await.is_some() {}
    Ok(())
}

/// Run one session over an accepted connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    store: Arc<dyn QuizStore>,
    mut cancel: watch::Receiver<bool>,
) {
    let mut session = Session::new(TcpChannel::from_stream(stream), store, StdRng::from_os_rng());
    let id = session.id();
    info!(session = %id, peer = %addr, "connection accepted");

    tokio::select! {
        result = session.run() => match result {
            Ok(()) => info!(session = %id, "session ended"),
            Err(e) => warn!(session = %id, error = %e, "session aborted"),
        },
        () = async {
            let _ = cancel.wait_for(|cancelled| *cancelled).await;
        } => {
            info!(session = %id, "session cancelled by shutdown");
        }
    }
}

/// Serve a single session on stdin/stdout.
pub async fn run_stdio(store: Arc<dyn QuizStore>) -> Result<(), QuizError> {
    let channel = LineChannel::new(BufReader::new(io::stdin()), io::stdout());
    let mut session = Session::new(channel, store, StdRng::from_os_rng());
    info!(session = %session.id(), "stdio session started");
    session.run().await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
}
