use std::cell::RefCell;

use switchcost_core::FocusProber;
use tracing::{debug, info, trace, warn};
use x11rb::connection::Connection;
use x11rb::errors::ReplyError;
use x11rb::protocol::xproto::{AtomEnum, ConnectionExt, Window};
use x11rb::rust_connection::RustConnection;

/// Probes skipped between reconnection attempts once the display is gone.
const RECONNECT_EVERY_PROBES: u32 = 25;

/// Reports the `WM_CLASS` class name of the window named by the root
/// window's `_NET_ACTIVE_WINDOW` property.
///
/// Replies are awaited without a timeout: a server that accepts requests but
/// never answers stalls the probe. A dropped connection is detected and
/// rebuilt, reporting `""` until the display is reachable again.
pub struct X11FocusProber {
    state: RefCell<ProberState>,
}

struct ProberState {
    session: Option<X11Session>,
    reconnect: ReconnectSchedule,
}

struct X11Session {
    connection: RustConnection,
    root_window: Window,
    active_window_atom: u32,
    wm_class_atom: u32,
}

impl X11FocusProber {
    pub fn new() -> Option<Self> {
        let session = X11Session::connect()?;

        debug!("X11 focus prober initialized");

        Some(Self {
            state: RefCell::new(ProberState {
                session: Some(session),
                reconnect: ReconnectSchedule::default(),
            }),
        })
    }
}

impl FocusProber for X11FocusProber {
    fn current_focus(&self) -> String {
        let mut state = self.state.borrow_mut();

        if state.session.is_none() {
            if !state.reconnect.should_attempt() {
                return String::new();
            }
            state.session = X11Session::connect();
            if state.session.is_some() {
                info!("reconnected to X11 display");
            }
        }

        let Some(session) = state.session.as_ref() else {
            return String::new();
        };

        match session.focused_class() {
            Ok(window_class) => window_class,
            Err(error) if is_connection_lost(&error) => {
                warn!(%error, "lost X11 connection, will reconnect");
                state.session = None;
                state.reconnect = ReconnectSchedule::default();
                String::new()
            }
            Err(error) => {
                trace!(%error, "X11 request failed");
                String::new()
            }
        }
    }
}

impl X11Session {
    fn connect() -> Option<Self> {
        let (connection, screen_number) = RustConnection::connect(None)
            .map_err(|error| {
                warn!(%error, "failed to connect to X11 display");
            })
            .ok()?;

        let root_window = connection.setup().roots.get(screen_number)?.root;

        let active_window_atom = connection
            .intern_atom(false, b"_NET_ACTIVE_WINDOW")
            .ok()?
            .reply()
            .ok()?
            .atom;

        Some(Self {
            connection,
            root_window,
            active_window_atom,
            wm_class_atom: AtomEnum::WM_CLASS.into(),
        })
    }

    fn focused_class(&self) -> Result<String, ReplyError> {
        let Some(window) = self.get_active_window()? else {
            trace!("no active window");
            return Ok(String::new());
        };

        let window_class = self.get_window_class(window)?.unwrap_or_default();
        trace!(window, window_class = %window_class, "probed active window");
        Ok(window_class)
    }

    fn get_active_window(&self) -> Result<Option<Window>, ReplyError> {
        let reply = self
            .connection
            .get_property(
                false,
                self.root_window,
                self.active_window_atom,
                AtomEnum::WINDOW,
                0,
                1,
            )?
            .reply()?;

        Ok(reply
            .value32()
            .and_then(|mut values| values.next())
            .filter(|&window_id| window_id != 0))
    }

    fn get_window_class(&self, window: Window) -> Result<Option<String>, ReplyError> {
        let reply = self
            .connection
            .get_property(false, window, self.wm_class_atom, AtomEnum::STRING, 0, 2048)?
            .reply()?;

        Ok(parse_wm_class(&reply.value))
    }
}

/// A destroyed window answers with an X11 error; only a broken connection
/// needs a new session.
fn is_connection_lost(error: &ReplyError) -> bool {
    matches!(error, ReplyError::ConnectionError(_))
}

#[derive(Debug, Default)]
struct ReconnectSchedule {
    skipped_probes: u32,
}

impl ReconnectSchedule {
    fn should_attempt(&mut self) -> bool {
        self.skipped_probes += 1;
        if self.skipped_probes < RECONNECT_EVERY_PROBES {
            return false;
        }

        self.skipped_probes = 0;
        true
    }
}

/// `WM_CLASS` holds `instance\0class\0`; the class part names the application.
fn parse_wm_class(value: &[u8]) -> Option<String> {
    let parts: Vec<&str> = std::str::from_utf8(value)
        .ok()?
        .split('\0')
        .filter(|part| !part.is_empty())
        .collect();

    parts.get(1).or(parts.first()).map(|part| part.to_string())
}
