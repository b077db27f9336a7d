//! Protocol client
//!
//! Drives one connection: creates a top-level window, names it, sets its
//! background and event mask, maps it with a checked request, then reports
//! every event and error until the connection closes.
//!
//! All report lines go to the output sink given at construction.

use crate::color::Argb;
use crate::protocol::*;
use crate::transport::{Incoming, RequestError, RequestMode, Transport, TransportError};
use std::error::Error;
use std::fmt;
use std::io::{self, Write};

/// Window parameters
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub background: Argb,
    pub title: String,
    pub geometry: Rectangle,
    pub border_width: u16,
    pub event_mask: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            background: Argb::OPAQUE_WHITE,
            title: "cw".to_string(),
            geometry: Rectangle::new(0, 0, 500, 500),
            border_width: 0,
            event_mask: event_mask::STRUCTURE_NOTIFY
                | event_mask::KEY_PRESS
                | event_mask::KEY_RELEASE,
        }
    }
}

impl ClientConfig {
    pub fn with_background(mut self, background: Argb) -> Self {
        self.background = background;
        self
    }
}

#[derive(Debug)]
pub enum ClientError {
    Transport(TransportError),
    Request(RequestError),
    ValueList(ValueListError),
    Io(io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(e) => write!(f, "{}", e),
            ClientError::Request(e) => write!(f, "request failed: {}", e),
            ClientError::ValueList(e) => write!(f, "bad attribute list: {}", e),
            ClientError::Io(e) => write!(f, "cannot write report: {}", e),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ClientError::Transport(e) => Some(e),
            ClientError::Request(e) => Some(e),
            ClientError::ValueList(e) => Some(e),
            ClientError::Io(e) => Some(e),
        }
    }
}

impl From<TransportError> for ClientError {
    fn from(e: TransportError) -> Self {
        ClientError::Transport(e)
    }
}

impl From<RequestError> for ClientError {
    fn from(e: RequestError) -> Self {
        ClientError::Request(e)
    }
}

impl From<ValueListError> for ClientError {
    fn from(e: ValueListError) -> Self {
        ClientError::ValueList(e)
    }
}

impl From<io::Error> for ClientError {
    fn from(e: io::Error) -> Self {
        ClientError::Io(e)
    }
}

pub struct Client<T: Transport, W: Write> {
    transport: T,
    out: W,
    config: ClientConfig,
}

impl<T: Transport, W: Write> Client<T, W> {
    pub fn new(transport: T, out: W, config: ClientConfig) -> Self {
        Client {
            transport,
            out,
            config,
        }
    }

    /// Create, configure and map the window.
    ///
    /// Only the final MapWindow is checked. Its outcome is reported to the
    /// sink and never fails setup.
    pub fn setup(&mut self) -> Result<Window, ClientError> {
        let screen = self.transport.default_screen();
        let wid = Window(self.transport.generate_id()?);
        let geometry = self.config.geometry;

        self.transport.send(
            &Request::CreateWindow(CreateWindowRequest {
                depth: screen.root_depth,
                wid,
                parent: screen.root,
                x: geometry.x,
                y: geometry.y,
                width: geometry.width,
                height: geometry.height,
                border_width: self.config.border_width,
                class: WindowClass::InputOutput,
                visual: screen.root_visual,
                attributes: ValueList::new(),
            }),
            RequestMode::Unchecked,
        )?;

        self.transport.send(
            &Request::ChangeProperty(ChangePropertyRequest {
                mode: PropMode::Replace,
                window: wid,
                property: Atom::WM_NAME,
                type_: Atom::STRING,
                format: PropFormat::Bits8,
                data: self.config.title.as_bytes().to_vec(),
            }),
            RequestMode::Unchecked,
        )?;

        // Background first, then event mask
        let attributes = ValueList::from_pairs(&[
            (window_attr::BACK_PIXEL, self.config.background.get()),
            (window_attr::EVENT_MASK, self.config.event_mask),
        ])?;
        self.transport.send(
            &Request::ChangeWindowAttributes(ChangeWindowAttributesRequest {
                window: wid,
                attributes,
            }),
            RequestMode::Unchecked,
        )?;

        log::info!(
            "Created window {} ({}x{}, background {})",
            wid,
            geometry.width,
            geometry.height,
            self.config.background
        );

        let mapped = self.transport.send(
            &Request::MapWindow(MapWindowRequest { window: wid }),
            RequestMode::Checked,
        );
        match mapped {
            Ok(()) => writeln!(self.out, "Map window {} successful!", wid)?,
            Err(err) => {
                log::warn!("MapWindow for {} failed", wid);
                writeln!(self.out, "Checked Error for mapping window {}: {}", wid, err)?;
            }
        }

        Ok(wid)
    }

    /// Report events and errors until the connection closes.
    pub fn run(&mut self) -> Result<(), ClientError> {
        loop {
            match self.transport.wait_for_event() {
                Incoming::Event(event) => {
                    log::debug!("Received event");
                    writeln!(self.out, "Event: {:?}", event)?;
                }
                Incoming::Error(err) => {
                    log::debug!("Received error for sequence {}", err.sequence);
                    writeln!(self.out, "Error: {}", err)?;
                }
                Incoming::Closed => {
                    writeln!(self.out, "Both event and error are nil. Exiting...")?;
                    return Ok(());
                }
            }
        }
    }
}
