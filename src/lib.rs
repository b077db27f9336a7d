//! cw - a minimal X11 client
//!
//! Opens a display connection, creates one window with a chosen background
//! color and reports every event and protocol error it receives.

pub mod color;
pub mod protocol;
pub mod transport;
pub mod client;

pub use color::{parse_color, Argb, ColorError};
pub use client::{Client, ClientConfig, ClientError};
pub use protocol::{Atom, Window, XID};
pub use transport::{Incoming, RequestMode, Transport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
