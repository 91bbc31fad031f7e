//! Tick source driven over HTTP. Every `GET /<tick>?timestamp=<ms>` request
//! pushes one timepoint into the matching channel.

use std::convert::Infallible;
use std::net::SocketAddr;

use hyper::service::{make_service_fn, service_fn};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use trading_model::model::TimeStampMs;

mod server;

pub use server::{get_time_point, MAX_TIMEPOINT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// order book
    Orderbook,
    /// auth data
    AuthData,
    /// rates
    Rate,
    /// blockchain
    Block,
    /// trade history
    TradeHistory,
    /// global data
    GlobalData,
}

impl Tick {
    pub const ALL: [Tick; 6] = [
        Tick::Orderbook,
        Tick::AuthData,
        Tick::Rate,
        Tick::Block,
        Tick::TradeHistory,
        Tick::GlobalData,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Tick::Orderbook => "/otick",
            Tick::AuthData => "/atick",
            Tick::Rate => "/rtick",
            Tick::Block => "/btick",
            Tick::TradeHistory => "/ttick",
            Tick::GlobalData => "/gtick",
        }
    }
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tick| tick.path() == path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("http runner is already started")]
    AlreadyStarted,
    #[error("http runner is not started")]
    NotStarted,
    #[error("http runner can not bind {addr}: {error}")]
    Bind { addr: SocketAddr, error: hyper::Error },
    #[error("http runner stopped with error: {0}")]
    Serve(#[from] hyper::Error),
    #[error("http runner task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Sending halves of the tick channels, shared with every connection.
#[derive(Debug, Clone)]
pub(crate) struct Tickers {
    otick: mpsc::Sender<TimeStampMs>,
    atick: mpsc::Sender<TimeStampMs>,
    rtick: mpsc::Sender<TimeStampMs>,
    btick: mpsc::Sender<TimeStampMs>,
    ttick: mpsc::Sender<TimeStampMs>,
    gtick: mpsc::Sender<TimeStampMs>,
}

impl Tickers {
    fn sender(&self, tick: Tick) -> &mpsc::Sender<TimeStampMs> {
        match tick {
            Tick::Orderbook => &self.otick,
            Tick::AuthData => &self.atick,
            Tick::Rate => &self.rtick,
            Tick::Block => &self.btick,
            Tick::TradeHistory => &self.ttick,
            Tick::GlobalData => &self.gtick,
        }
    }
    /// Blocks until the consumer has room for the tick.
    pub(crate) async fn send(&self, tick: Tick, timepoint: TimeStampMs) -> Result<(), mpsc::error::SendError<TimeStampMs>> {
        self.sender(tick).send(timepoint).await
    }
}

/// Receiving halves, one per tick kind.
#[derive(Debug)]
pub struct TickReceivers {
    pub otick: mpsc::Receiver<TimeStampMs>,
    pub atick: mpsc::Receiver<TimeStampMs>,
    pub rtick: mpsc::Receiver<TimeStampMs>,
    pub btick: mpsc::Receiver<TimeStampMs>,
    pub ttick: mpsc::Receiver<TimeStampMs>,
    pub gtick: mpsc::Receiver<TimeStampMs>,
}

struct RunningServer {
    local_addr: SocketAddr,
    token: CancellationToken,
    handle: JoinHandle<hyper::Result<()>>,
}

pub struct HttpRunner {
    addr: SocketAddr,
    tickers: Tickers,
    server: Mutex<Option<RunningServer>>,
}

impl HttpRunner {
    /// `capacity` bounds every tick channel; a full channel holds the
    /// request until the consumer catches up.
    pub fn new(addr: SocketAddr, capacity: usize) -> (Self, TickReceivers) {
        let (otick, orx) = mpsc::channel(capacity);
        let (atick, arx) = mpsc::channel(capacity);
        let (rtick, rrx) = mpsc::channel(capacity);
        let (btick, brx) = mpsc::channel(capacity);
        let (ttick, trx) = mpsc::channel(capacity);
        let (gtick, grx) = mpsc::channel(capacity);
        let runner = Self {
            addr,
            tickers: Tickers {
                otick,
                atick,
                rtick,
                btick,
                ttick,
                gtick,
            },
            server: Mutex::new(None),
        };
        let receivers = TickReceivers {
            otick: orx,
            atick: arx,
            rtick: rrx,
            btick: brx,
            ttick: trx,
            gtick: grx,
        };
        (runner, receivers)
    }

    /// Bind and serve in the background. Returns the bound address.
    ///
    /// The server also stops when the process-wide terminate flag is set.
    pub async fn start(&self) -> Result<SocketAddr, RunnerError> {
        let mut server = self.server.lock().await;
        if server.is_some() {
            return Err(RunnerError::AlreadyStarted);
        }
        let tickers = self.tickers.clone();
        let make_svc = make_service_fn(move |_conn| {
            let tickers = tickers.clone();
            async move { Ok::<_, Infallible>(service_fn(move |req| server::handle(req, tickers.clone()))) }
        });
        let bound = hyper::Server::try_bind(&self.addr)
            .map_err(|error| RunnerError::Bind { addr: self.addr, error })?
            .serve(make_svc);
        let local_addr = bound.local_addr();

        let token = common::signal::CANCELLATION_TOKEN.child_token();
        let shutdown = token.clone();
        let handle = tokio::spawn(bound.with_graceful_shutdown(async move { shutdown.cancelled().await }));
        info!(%local_addr, "http runner listening");
        *server = Some(RunningServer {
            local_addr,
            token,
            handle,
        });
        Ok(local_addr)
    }

    /// Shut the server down gracefully and wait for it to finish.
    pub async fn stop(&self) -> Result<(), RunnerError> {
        let Some(running) = self.server.lock().await.take() else {
            return Err(RunnerError::NotStarted);
        };
        running.token.cancel();
        running.handle.await??;
        info!(local_addr = %running.local_addr, "http runner stopped");
        Ok(())
    }

    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.server.lock().await.as_ref().map(|running| running.local_addr)
    }
}

impl Drop for HttpRunner {
    fn drop(&mut self) {
        if let Some(running) = self.server.get_mut().take() {
            warn!(local_addr = %running.local_addr, "http runner dropped while running");
            running.token.cancel();
        }
    }
}
