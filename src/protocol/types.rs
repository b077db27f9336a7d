//! Core X11 protocol types
//!
//! Client-side view of the handful of protocol types this program issues
//! requests with. Kept close to the wire representation.

use std::fmt;

/// X11 resource ID - used for windows, pixmaps, graphics contexts, etc.
/// In X11, all objects are identified by 29-bit IDs.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XID(pub u32);

impl XID {
    pub fn new(id: u32) -> Self {
        XID(id)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for XID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// Window ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window(pub XID);

impl Window {
    pub fn new(id: u32) -> Self {
        Window(XID::new(id))
    }

    pub fn id(&self) -> XID {
        self.0
    }
}

/// Windows are reported by their decimal resource ID
impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.get())
    }
}

/// Atom - interned string identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Atom(pub u32);

impl Atom {
    pub const STRING: Atom = Atom(31);
    pub const WM_NAME: Atom = Atom(39);

    pub fn new(id: u32) -> Self {
        Atom(id)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

/// Visual ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualID(pub u32);

impl VisualID {
    pub fn new(id: u32) -> Self {
        VisualID(id)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

/// Rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rectangle {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

impl Rectangle {
    pub fn new(x: i16, y: i16, width: u16, height: u16) -> Self {
        Rectangle {
            x,
            y,
            width,
            height,
        }
    }
}

/// Window class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowClass {
    CopyFromParent = 0,
    InputOutput = 1,
    InputOnly = 2,
}

/// ChangeProperty mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropMode {
    Replace = 0,
    Prepend = 1,
    Append = 2,
}

/// Property data format (bits per item). Titles are 8-bit strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropFormat {
    Bits8 = 8,
}

impl PropFormat {
    pub fn bytes_per_item(&self) -> usize {
        *self as usize / 8
    }
}

/// Event mask bits selected on the window
pub mod event_mask {
    pub const KEY_PRESS: u32 = 1 << 0;
    pub const KEY_RELEASE: u32 = 1 << 1;
    pub const STRUCTURE_NOTIFY: u32 = 1 << 17;
}

/// Window attribute value-mask bits (CreateWindow / ChangeWindowAttributes).
/// Values in a request's value list appear in this bit order.
pub mod window_attr {
    pub const BACK_PIXMAP: u32 = 1 << 0;
    pub const BACK_PIXEL: u32 = 1 << 1;
    pub const BORDER_PIXMAP: u32 = 1 << 2;
    pub const BORDER_PIXEL: u32 = 1 << 3;
    pub const BIT_GRAVITY: u32 = 1 << 4;
    pub const WIN_GRAVITY: u32 = 1 << 5;
    pub const BACKING_STORE: u32 = 1 << 6;
    pub const BACKING_PLANES: u32 = 1 << 7;
    pub const BACKING_PIXEL: u32 = 1 << 8;
    pub const OVERRIDE_REDIRECT: u32 = 1 << 9;
    pub const SAVE_UNDER: u32 = 1 << 10;
    pub const EVENT_MASK: u32 = 1 << 11;
    pub const DONT_PROPAGATE: u32 = 1 << 12;
    pub const COLORMAP: u32 = 1 << 13;
    pub const CURSOR: u32 = 1 << 14;

    /// Every bit defined by the core protocol
    pub const ALL: u32 = (1 << 15) - 1;
}
