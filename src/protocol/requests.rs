//! X11 protocol requests
//!
//! The requests a client issues to bring up a window, and the ordered value
//! list used by the window-attribute requests.

use super::types::*;
use std::error::Error;
use std::fmt;

/// X11 request opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RequestOpcode {
    CreateWindow = 1,
    ChangeWindowAttributes = 2,
    MapWindow = 8,
    ChangeProperty = 18,
}

impl RequestOpcode {
    pub fn from_u8(opcode: u8) -> Option<Self> {
        match opcode {
            1 => Some(RequestOpcode::CreateWindow),
            2 => Some(RequestOpcode::ChangeWindowAttributes),
            8 => Some(RequestOpcode::MapWindow),
            18 => Some(RequestOpcode::ChangeProperty),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestOpcode::CreateWindow => "CreateWindow",
            RequestOpcode::ChangeWindowAttributes => "ChangeWindowAttributes",
            RequestOpcode::MapWindow => "MapWindow",
            RequestOpcode::ChangeProperty => "ChangeProperty",
        }
    }
}

/// Malformed attribute value list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueListError {
    /// Mask contains bits the core protocol does not define
    UnknownBits(u32),
    /// Attribute supplied after one that comes later in protocol order
    OutOfOrder { bit: u32, after: u32 },
}

impl fmt::Display for ValueListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueListError::UnknownBits(bits) => {
                write!(f, "unknown value mask bits 0x{:08x}", bits)
            }
            ValueListError::OutOfOrder { bit, after } => write!(
                f,
                "attribute 0x{:04x} must come before 0x{:04x}",
                bit, after
            ),
        }
    }
}

impl Error for ValueListError {}

/// Window attribute value list: a mask plus one value per set bit, in bit
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueList {
    mask: u32,
    values: Vec<u32>,
}

impl ValueList {
    /// Empty list (no attributes)
    pub fn new() -> Self {
        ValueList::default()
    }

    /// Build from (bit, value) pairs, which must be in protocol order.
    pub fn from_pairs(pairs: &[(u32, u32)]) -> Result<Self, ValueListError> {
        let mut list = ValueList::new();
        for &(bit, value) in pairs {
            if bit.count_ones() != 1 || bit & !window_attr::ALL != 0 {
                return Err(ValueListError::UnknownBits(bit));
            }
            if bit <= list.highest_bit() {
                return Err(ValueListError::OutOfOrder {
                    bit,
                    after: list.highest_bit(),
                });
            }
            list.mask |= bit;
            list.values.push(value);
        }
        Ok(list)
    }

    pub fn mask(&self) -> u32 {
        self.mask
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Iterate (bit, value) pairs in protocol order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..32)
            .map(|shift| 1u32 << shift)
            .filter(move |bit| self.mask & bit != 0)
            .zip(self.values.iter().copied())
    }

    fn highest_bit(&self) -> u32 {
        match self.mask {
            0 => 0,
            mask => 1 << (31 - mask.leading_zeros()),
        }
    }
}

/// X11 request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    CreateWindow(CreateWindowRequest),
    ChangeWindowAttributes(ChangeWindowAttributesRequest),
    ChangeProperty(ChangePropertyRequest),
    MapWindow(MapWindowRequest),
}

impl Request {
    pub fn opcode(&self) -> RequestOpcode {
        match self {
            Request::CreateWindow(_) => RequestOpcode::CreateWindow,
            Request::ChangeWindowAttributes(_) => RequestOpcode::ChangeWindowAttributes,
            Request::ChangeProperty(_) => RequestOpcode::ChangeProperty,
            Request::MapWindow(_) => RequestOpcode::MapWindow,
        }
    }

    /// Window the request operates on
    pub fn window(&self) -> Window {
        match self {
            Request::CreateWindow(req) => req.wid,
            Request::ChangeWindowAttributes(req) => req.window,
            Request::ChangeProperty(req) => req.window,
            Request::MapWindow(req) => req.window,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateWindowRequest {
    pub depth: u8,
    pub wid: Window,
    pub parent: Window,
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
    pub border_width: u16,
    pub class: WindowClass,
    pub visual: VisualID,
    pub attributes: ValueList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeWindowAttributesRequest {
    pub window: Window,
    pub attributes: ValueList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangePropertyRequest {
    pub mode: PropMode,
    pub window: Window,
    pub property: Atom,
    pub type_: Atom,
    pub format: PropFormat,
    pub data: Vec<u8>,
}

impl ChangePropertyRequest {
    /// Number of `format`-sized items in `data`
    pub fn data_len(&self) -> u32 {
        (self.data.len() / self.format.bytes_per_item()) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapWindowRequest {
    pub window: Window,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_list_from_pairs() {
        let list = ValueList::from_pairs(&[
            (window_attr::BACK_PIXEL, 0xffff_0000),
            (window_attr::EVENT_MASK, event_mask::KEY_PRESS),
        ])
        .unwrap();

        assert_eq!(list.mask(), window_attr::BACK_PIXEL | window_attr::EVENT_MASK);
        assert_eq!(list.values(), &[0xffff_0000, event_mask::KEY_PRESS]);
    }

    #[test]
    fn test_value_list_rejects_out_of_order() {
        let err = ValueList::from_pairs(&[
            (window_attr::EVENT_MASK, event_mask::KEY_PRESS),
            (window_attr::BACK_PIXEL, 0xffff_0000),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            ValueListError::OutOfOrder {
                bit: window_attr::BACK_PIXEL,
                after: window_attr::EVENT_MASK,
            }
        );
    }

    #[test]
    fn test_value_list_rejects_duplicates_and_bad_bits() {
        let duplicate = ValueList::from_pairs(&[
            (window_attr::BACK_PIXEL, 1),
            (window_attr::BACK_PIXEL, 2),
        ]);
        assert!(duplicate.is_err());

        let both = window_attr::BACK_PIXEL | window_attr::EVENT_MASK;
        assert_eq!(
            ValueList::from_pairs(&[(both, 1)]),
            Err(ValueListError::UnknownBits(both))
        );
        assert_eq!(
            ValueList::from_pairs(&[(1 << 20, 0)]),
            Err(ValueListError::UnknownBits(1 << 20))
        );
        assert_eq!(
            ValueList::from_pairs(&[(0, 0)]),
            Err(ValueListError::UnknownBits(0))
        );
    }

    #[test]
    fn test_value_list_iterates_in_bit_order() {
        let list = ValueList::from_pairs(&[
            (window_attr::BACK_PIXMAP, 1),
            (window_attr::EVENT_MASK, 2),
            (window_attr::CURSOR, 3),
        ])
        .unwrap();
        let pairs: Vec<_> = list.iter().collect();
        assert_eq!(
            pairs,
            vec![
                (window_attr::BACK_PIXMAP, 1),
                (window_attr::EVENT_MASK, 2),
                (window_attr::CURSOR, 3),
            ]
        );
        assert_eq!(
            list.mask(),
            window_attr::BACK_PIXMAP | window_attr::EVENT_MASK | window_attr::CURSOR
        );
    }

    #[test]
    fn test_empty_value_list() {
        let list = ValueList::new();
        assert_eq!(list.mask(), 0);
        assert_eq!(list.iter().count(), 0);
        assert_eq!(ValueList::from_pairs(&[]), Ok(ValueList::new()));
    }

    #[test]
    fn test_request_opcodes() {
        let req = Request::MapWindow(MapWindowRequest {
            window: Window::new(0x0040_0001),
        });
        assert_eq!(req.opcode(), RequestOpcode::MapWindow);
        assert_eq!(req.opcode() as u8, 8);
        assert_eq!(req.window(), Window::new(0x0040_0001));
        assert_eq!(RequestOpcode::from_u8(18), Some(RequestOpcode::ChangeProperty));
        assert_eq!(RequestOpcode::from_u8(99), None);
    }

    #[test]
    fn test_property_data_len() {
        let req = ChangePropertyRequest {
            mode: PropMode::Replace,
            window: Window::new(1),
            property: Atom::WM_NAME,
            type_: Atom::STRING,
            format: PropFormat::Bits8,
            data: b"cw".to_vec(),
        };
        assert_eq!(req.data_len(), 2);
    }
}
