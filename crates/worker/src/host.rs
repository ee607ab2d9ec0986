//! Seams between the router and its host.
//!
//! The host owns the event loop. It delivers lifecycle events through
//! [`LifecycleHandler`] and exposes optional platform features through
//! [`HostCapabilities`].

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use shellcache_core::{Error, Request, Response};

/// Control message data that activates a waiting worker immediately.
pub const SKIP_WAITING: &str = "SKIP_WAITING";

/// Platform features the host may or may not provide.
#[async_trait]
pub trait HostCapabilities: Send + Sync {
    /// Turn on navigation preload. Hosts without support return `Error::Unsupported`.
    async fn enable_navigation_preload(&self) -> Result<(), Error>;

    /// Activate this worker without waiting for older instances to finish.
    async fn skip_waiting(&self) -> Result<(), Error>;

    /// Take control of every open page immediately.
    async fn claim_clients(&self) -> Result<(), Error>;
}

/// A preload response the host already has in flight for a navigation.
///
/// Resolves to `None` when the host decided not to preload this navigation.
pub type Preload = BoxFuture<'static, Result<Option<Response>, Error>>;

/// One intercepted fetch.
pub struct FetchEvent {
    pub request: Request,
    pub preload: Option<Preload>,
}

impl FetchEvent {
    pub fn new(request: Request) -> Self {
        Self { request, preload: None }
    }

    pub fn with_preload(mut self, preload: Preload) -> Self {
        self.preload = Some(preload);
        self
    }
}

impl std::fmt::Debug for FetchEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchEvent")
            .field("request", &self.request)
            .field("preload", &self.preload.is_some())
            .finish()
    }
}

/// What the host should do with an intercepted fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchDisposition {
    /// Not intercepted: perform the default network fetch, unobserved.
    Passthrough,
    /// Answer the page with this response.
    Respond(Response),
}

impl FetchDisposition {
    pub fn response(&self) -> Option<&Response> {
        match self {
            FetchDisposition::Passthrough => None,
            FetchDisposition::Respond(response) => Some(response),
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, FetchDisposition::Passthrough)
    }
}

/// Messages a page can post to the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlMessage {
    SkipWaiting,
    Other(String),
}

impl ControlMessage {
    pub fn parse(data: &str) -> Self {
        if data == SKIP_WAITING { ControlMessage::SkipWaiting } else { ControlMessage::Other(data.to_string()) }
    }
}

/// One handler per host event kind.
///
/// Each returned future is the event's "wait until" work: the host must not
/// deliver fetches before `install` and `activate` have resolved.
#[async_trait]
pub trait LifecycleHandler: Send + Sync {
    /// Populate the active namespace. Fails if any shell resource cannot be fetched.
    async fn install(&self) -> Result<(), Error>;

    /// Remove stale namespaces and take control of open pages.
    async fn activate(&self) -> Result<(), Error>;

    /// React to a message posted by a page.
    async fn message(&self, data: &str) -> Result<(), Error>;

    /// Route one intercepted request.
    async fn fetch(&self, event: FetchEvent) -> Result<FetchDisposition, Error>;
}
