//! X11 transport - a real display connection through x11rb
//!
//! Requests from the protocol model are translated to x11rb calls on a
//! `RustConnection`. Unchecked requests are flushed right away and their
//! cookies dropped, which hands any error to the event queue.

use super::*;
use x11rb::connection::Connection;
use x11rb::cookie::VoidCookie;
use x11rb::errors::{ReplyError, ReplyOrIdError};
use x11rb::protocol::xproto::{self, ConnectionExt as _};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;

/// CreateWindowAux and ChangeWindowAttributesAux share their setters.
macro_rules! window_aux {
    ($aux:expr, $attributes:expr) => {{
        let mut aux = $aux;
        for (bit, value) in $attributes.iter() {
            aux = match bit {
                window_attr::BACK_PIXMAP => aux.background_pixmap(value),
                window_attr::BACK_PIXEL => aux.background_pixel(value),
                window_attr::BORDER_PIXMAP => aux.border_pixmap(value),
                window_attr::BORDER_PIXEL => aux.border_pixel(value),
                window_attr::BACKING_PLANES => aux.backing_planes(value),
                window_attr::BACKING_PIXEL => aux.backing_pixel(value),
                window_attr::OVERRIDE_REDIRECT => aux.override_redirect(value),
                window_attr::SAVE_UNDER => aux.save_under(value),
                window_attr::EVENT_MASK => aux.event_mask(xproto::EventMask::from(value)),
                window_attr::COLORMAP => aux.colormap(value),
                window_attr::CURSOR => aux.cursor(value),
                other => return Err(RequestError::Unsupported(other)),
            };
        }
        aux
    }};
}

pub struct X11Transport {
    display: String,
    conn: RustConnection,
    screen: ScreenInfo,
}

impl X11Transport {
    /// Connect to `display`, or to `$DISPLAY` when `None`.
    pub fn connect(display: Option<&str>) -> Result<Self, TransportError> {
        let (conn, screen_num) =
            x11rb::connect(display).map_err(|e| TransportError::Connect(e.to_string()))?;

        let setup = conn.setup();
        let root = setup.roots.get(screen_num).ok_or_else(|| {
            TransportError::Connect(format!("screen {} not in setup data", screen_num))
        })?;
        let screen = ScreenInfo {
            root: Window::new(root.root),
            root_depth: root.root_depth,
            root_visual: VisualID::new(root.root_visual),
            width_in_pixels: root.width_in_pixels,
            height_in_pixels: root.height_in_pixels,
        };

        let display = display
            .map(str::to_string)
            .or_else(|| std::env::var("DISPLAY").ok())
            .unwrap_or_default();

        log::info!(
            "Connected to display {:?} (protocol {}.{}, vendor {:?}), screen {}: {}x{}",
            display,
            setup.protocol_major_version,
            setup.protocol_minor_version,
            String::from_utf8_lossy(&setup.vendor),
            screen_num,
            screen.width_in_pixels,
            screen.height_in_pixels
        );

        Ok(X11Transport {
            display,
            conn,
            screen,
        })
    }

    fn issue(&self, request: &Request) -> Result<VoidCookie<'_, RustConnection>, RequestError> {
        let cookie = match request {
            Request::CreateWindow(req) => {
                let aux = create_window_aux(&req.attributes)?;
                self.conn.create_window(
                    req.depth,
                    req.wid.id().get(),
                    req.parent.id().get(),
                    req.x,
                    req.y,
                    req.width,
                    req.height,
                    req.border_width,
                    window_class(req.class),
                    req.visual.get(),
                    &aux,
                )
            }
            Request::ChangeWindowAttributes(req) => {
                let aux = window_attributes(&req.attributes)?;
                self.conn
                    .change_window_attributes(req.window.id().get(), &aux)
            }
            Request::ChangeProperty(req) => self.conn.change_property(
                prop_mode(req.mode),
                req.window.id().get(),
                req.property.get(),
                req.type_.get(),
                req.format as u8,
                req.data_len(),
                &req.data,
            ),
            Request::MapWindow(req) => self.conn.map_window(req.window.id().get()),
        };
        cookie.map_err(|e| RequestError::Connection(e.to_string()))
    }
}

impl Transport for X11Transport {
    type Event = Event;

    fn default_screen(&self) -> ScreenInfo {
        self.screen
    }

    fn generate_id(&mut self) -> Result<XID, TransportError> {
        match self.conn.generate_id() {
            Ok(id) => Ok(XID::new(id)),
            Err(ReplyOrIdError::IdsExhausted) => Err(TransportError::IdsExhausted),
            Err(e) => Err(TransportError::Connection(e.to_string())),
        }
    }

    fn send(&mut self, request: &Request, mode: RequestMode) -> Result<(), RequestError> {
        let cookie = self.issue(request)?;
        let sequence = cookie.sequence_number();
        log::debug!(
            "{} ({:?}) for window {} sent as #{}",
            request.opcode().as_str(),
            mode,
            request.window(),
            sequence
        );

        match mode {
            RequestMode::Unchecked => {
                drop(cookie);
                self.conn
                    .flush()
                    .map_err(|e| RequestError::Connection(e.to_string()))
            }
            RequestMode::Checked => cookie.check().map_err(|e| match e {
                ReplyError::X11Error(err) => RequestError::Protocol(convert_error(err)),
                ReplyError::ConnectionError(err) => RequestError::Connection(err.to_string()),
            }),
        }
    }

    fn wait_for_event(&mut self) -> Incoming<Event> {
        match self.conn.wait_for_event() {
            Ok(Event::Error(err)) => Incoming::Error(convert_error(err)),
            Ok(event) => Incoming::Event(event),
            Err(e) => {
                log::debug!("Connection to {:?} closed: {}", self.display, e);
                Incoming::Closed
            }
        }
    }
}

/// Attribute list of a CreateWindow request
fn create_window_aux(attributes: &ValueList) -> Result<xproto::CreateWindowAux, RequestError> {
    Ok(window_aux!(xproto::CreateWindowAux::new(), attributes))
}

/// Attribute list of a ChangeWindowAttributes request
fn window_attributes(
    attributes: &ValueList,
) -> Result<xproto::ChangeWindowAttributesAux, RequestError> {
    Ok(window_aux!(xproto::ChangeWindowAttributesAux::new(), attributes))
}

fn convert_error(err: x11rb::x11_utils::X11Error) -> X11Error {
    X11Error::new(
        err.error_code,
        err.sequence,
        err.bad_value,
        err.minor_opcode,
        err.major_opcode,
    )
    .with_request_name(err.request_name)
}

fn window_class(class: WindowClass) -> xproto::WindowClass {
    match class {
        WindowClass::CopyFromParent => xproto::WindowClass::COPY_FROM_PARENT,
        WindowClass::InputOutput => xproto::WindowClass::INPUT_OUTPUT,
        WindowClass::InputOnly => xproto::WindowClass::INPUT_ONLY,
    }
}

fn prop_mode(mode: PropMode) -> xproto::PropMode {
    match mode {
        PropMode::Replace => xproto::PropMode::REPLACE,
        PropMode::Prepend => xproto::PropMode::PREPEND,
        PropMode::Append => xproto::PropMode::APPEND,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use x11rb::protocol::ErrorKind;

    fn wire_error(
        error_kind: ErrorKind,
        error_code: u8,
        major_opcode: u8,
        minor_opcode: u16,
        request_name: Option<&'static str>,
    ) -> x11rb::x11_utils::X11Error {
        x11rb::x11_utils::X11Error {
            error_kind,
            error_code,
            sequence: 9,
            bad_value: 0x0040_0001,
            minor_opcode,
            major_opcode,
            extension_name: None,
            request_name,
        }
    }

    #[test]
    fn test_convert_core_error() {
        let err = convert_error(wire_error(ErrorKind::Window, 3, 8, 0, Some("MapWindow")));

        assert_eq!(err.kind(), Some(ErrorCode::Window));
        assert_eq!(err.sequence, 9);
        assert_eq!(err.bad_value, 0x0040_0001);
        assert_eq!(err.major_opcode, 8);
        assert_eq!(err.minor_opcode, 0);
        assert_eq!(err.request_name, Some("MapWindow"));
        assert_eq!(
            err.to_string(),
            "X11 Error: Window: invalid Window parameter \
             (sequence: 9, value: 0x00400001, major: 8, minor: 0, request: MapWindow)"
        );
    }

    #[test]
    fn test_convert_extension_error_keeps_opcode_order() {
        let err = convert_error(wire_error(
            ErrorKind::Unknown(150),
            150,
            131,
            5,
            Some("RandR::GetScreenResources"),
        ));

        assert_eq!(err.kind(), None);
        assert_eq!(err.major_opcode, 131);
        assert_eq!(err.minor_opcode, 5);
        assert_eq!(err.request_name, Some("RandR::GetScreenResources"));
        assert_eq!(
            err.to_string(),
            "X11 Error: code 150 (sequence: 9, value: 0x00400001, major: 131, minor: 5, \
             request: RandR::GetScreenResources)"
        );
    }

    #[test]
    fn test_convert_error_without_request_name() {
        let err = convert_error(wire_error(ErrorKind::Window, 3, 2, 0, None));
        assert_eq!(err.request_name, Some("ChangeWindowAttributes"));
    }

    #[test]
    fn test_window_attributes() {
        let mask = event_mask::STRUCTURE_NOTIFY | event_mask::KEY_PRESS;
        let attributes = ValueList::from_pairs(&[
            (window_attr::BACK_PIXEL, 0xffff_0000),
            (window_attr::EVENT_MASK, mask),
        ])
        .unwrap();

        let aux = window_attributes(&attributes).unwrap();
        assert_eq!(aux.background_pixel, Some(0xffff_0000));
        assert_eq!(aux.event_mask, Some(xproto::EventMask::from(mask)));
        assert_eq!(aux.border_pixel, None);
        assert_eq!(aux.cursor, None);
    }

    #[test]
    fn test_window_attributes_rejects_gravity() {
        let attributes = ValueList::from_pairs(&[(window_attr::BIT_GRAVITY, 1)]).unwrap();
        match window_attributes(&attributes) {
            Err(err) => assert_eq!(err, RequestError::Unsupported(window_attr::BIT_GRAVITY)),
            Ok(_) => panic!("bit gravity must not be translated"),
        }
    }

    #[test]
    fn test_create_window_aux() {
        let aux = create_window_aux(&ValueList::new()).unwrap();
        assert_eq!(aux.background_pixel, None);
        assert_eq!(aux.event_mask, None);

        let attributes = ValueList::from_pairs(&[
            (window_attr::BORDER_PIXEL, 0),
            (window_attr::DONT_PROPAGATE, 0),
        ])
        .unwrap();
        match create_window_aux(&attributes) {
            Err(err) => assert_eq!(err, RequestError::Unsupported(window_attr::DONT_PROPAGATE)),
            Ok(_) => panic!("do-not-propagate mask must not be translated"),
        }
    }
}
