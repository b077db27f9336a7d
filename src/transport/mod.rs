//! Transport layer
//!
//! The connection to the display server as seen by the client: screen
//! information gathered at setup, resource ID allocation, a single request
//! primitive with checked or unchecked acknowledgment, and a blocking event
//! stream.

use crate::protocol::*;
use std::error::Error;
use std::fmt;

#[cfg(feature = "backend-x11")]
pub mod x11;

#[cfg(feature = "backend-x11")]
pub use x11::X11Transport;

/// How a request's outcome is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// Fire and forget; an error arrives later through the event stream
    Unchecked,
    /// Block until the server has processed the request and report its error
    Checked,
}

/// One item from the event stream
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming<E> {
    Event(E),
    Error(X11Error),
    /// The connection is gone; no more items will follow
    Closed,
}

/// Default screen, read from the connection setup data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenInfo {
    pub root: Window,
    pub root_depth: u8,
    pub root_visual: VisualID,
    pub width_in_pixels: u16,
    pub height_in_pixels: u16,
}

/// Connection-level failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The display could not be opened
    Connect(String),
    /// No more resource IDs can be handed out
    IdsExhausted,
    /// The established connection failed
    Connection(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Connect(msg) => write!(f, "cannot open display: {}", msg),
            TransportError::IdsExhausted => write!(f, "resource IDs exhausted"),
            TransportError::Connection(msg) => write!(f, "connection error: {}", msg),
        }
    }
}

impl Error for TransportError {}

/// Failure to issue a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The server rejected a checked request
    Protocol(X11Error),
    /// The request could not be written or its answer read
    Connection(String),
    /// Attribute bit the transport cannot express
    Unsupported(u32),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Protocol(err) => write!(f, "{}", err),
            RequestError::Connection(msg) => write!(f, "connection error: {}", msg),
            RequestError::Unsupported(bit) => {
                write!(f, "unsupported window attribute 0x{:04x}", bit)
            }
        }
    }
}

impl Error for RequestError {}

/// Client side of a display connection
pub trait Transport {
    /// Event type delivered by `wait_for_event`
    type Event: fmt::Debug;

    /// Default screen of the connection
    fn default_screen(&self) -> ScreenInfo;

    /// Allocate a fresh resource ID
    fn generate_id(&mut self) -> Result<XID, TransportError>;

    /// Send a request.
    ///
    /// With `RequestMode::Unchecked` this returns as soon as the request is
    /// written; a protocol error only shows up later as `Incoming::Error`.
    /// With `RequestMode::Checked` it blocks for the round trip and returns
    /// `RequestError::Protocol` if the server rejected the request.
    fn send(&mut self, request: &Request, mode: RequestMode) -> Result<(), RequestError>;

    /// Block until the next event or error. No timeout is applied.
    fn wait_for_event(&mut self) -> Incoming<Self::Event>;
}
