/// X11 protocol model
///
/// This module describes the requests a client sends and the errors a server
/// can answer with. Encoding and decoding on the wire is left to the transport.

pub mod types;
pub mod errors;
pub mod requests;

pub use types::*;
pub use errors::*;
pub use requests::*;

