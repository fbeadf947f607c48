//! Daemon server — TCP gateway in front of the index service.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, Semaphore};
use tracing::{debug, error, info};

use super::protocol::{parse_request, Request, Response};
use super::throttle::Throttler;
use crate::config::Config;
use crate::error::Result;
use crate::graph::{GraphStore, MapIndexStore};
use crate::service::IndexService;

/// A validated request plus the slot its response goes back through.
struct Envelope {
    request: Request,
    reply: oneshot::Sender<Response>,
}

pub struct IndexServer<S = MapIndexStore> {
    listener: TcpListener,
    service: Arc<IndexService<S>>,
    throttle: u32,
    max_connections: usize,
    channel_capacity: usize,
}

impl<S: GraphStore + Send + 'static> IndexServer<S> {
    /// Bind the listening socket described by `config`.
    pub async fn bind(config: &Config, service: Arc<IndexService<S>>) -> Result<Self> {
        config.validate()?;
        let listener = TcpListener::bind(config.listen_addr()).await?;
        info!(addr = %listener.local_addr()?, "index listening");

        Ok(Self {
            listener,
            service,
            throttle: config.effective_throttle(),
            max_connections: config.max_connections,
            channel_capacity: config.channel_capacity,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve connections forever.
    pub async fn serve(self) -> Result<()> {
        self.serve_until(std::future::pending()).await
    }

    /// Serve connections until `shutdown` resolves.
    pub async fn serve_until(self, shutdown: impl Future<Output = ()>) -> Result<()> {
        let (requests, inbox) = mpsc::channel(self.channel_capacity);
        tokio::spawn(run_dispatcher(Arc::clone(&self.service), inbox));

        let limit = (self.max_connections > 0)
            .then(|| Arc::new(Semaphore::new(self.max_connections)));
        let mut next_id: u64 = 0;

        tokio::pin!(shutdown);
        loop {
            // With a connection cap, wait for a free slot before accepting.
            let permit = match &limit {
                Some(semaphore) => tokio::select! {
                    permit = Arc::clone(semaphore).acquire_owned() => permit.ok(),
                    _ = &mut shutdown => break,
                },
                None => None,
            };

            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        next_id += 1;
                        let id = next_id;
                        debug!(client = id, peer = %peer, "client connected");

                        let requests = requests.clone();
                        let throttle = self.throttle;
                        tokio::spawn(async move {
                            let _permit = permit;
                            handle_client(id, stream, requests, throttle).await;
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "accept error");
                    }
                },
                _ = &mut shutdown => break,
            }
        }

        info!("index shutting down");
        Ok(())
    }
}

/// Apply queued requests one at a time, in arrival order.
async fn run_dispatcher<S: GraphStore>(
    service: Arc<IndexService<S>>,
    mut inbox: mpsc::Receiver<Envelope>,
) {
    while let Some(Envelope { request, reply }) = inbox.recv().await {
        let response = service.process(&request);
        if reply.send(response).is_err() {
            debug!("client gone before response was ready");
        }
    }
    debug!("dispatcher stopped");
}

/// Handle a single client connection until it closes or fails.
async fn handle_client(
    id: u64,
    stream: TcpStream,
    requests: mpsc::Sender<Envelope>,
    throttle: u32,
) {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut throttler = Throttler::new(throttle);
    let mut line = String::new();

    loop {
        throttler.next().await;

        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                debug!(client = id, "client disconnected");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                debug!(client = id, error = %e, "read error, closing connection");
                let _ = writer.write_all(Response::Error.as_line().as_bytes()).await;
                break;
            }
        }

        let response = match parse_request(&line) {
            Ok(request) => forward(&requests, request).await,
            Err(e) => {
                debug!(client = id, line = ?line, error = %e, "invalid request");
                Response::Error
            }
        };

        if let Err(e) = writer.write_all(response.as_line().as_bytes()).await {
            debug!(client = id, error = %e, "write error, closing connection");
            break;
        }
    }

    throttler.stop();
}

async fn forward(requests: &mpsc::Sender<Envelope>, request: Request) -> Response {
    let (reply, response) = oneshot::channel();
    if requests.send(Envelope { request, reply }).await.is_err() {
        error!("dispatcher unavailable");
        return Response::Error;
    }
    response.await.unwrap_or(Response::Error)
}
