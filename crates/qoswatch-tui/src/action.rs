//! Actions flowing from input handling to the app loop.

use qoswatch_core::ViewKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Render,
    Resize(u16, u16),

    // ── Selection ──
    /// Operator picked a new switch id.
    SelectSwitch(String),
    /// Operator picked a new port id on the current switch.
    SelectPort(String),
    /// Port ids reported by the backend for `switch`.
    PortsLoaded { switch: String, ports: Vec<String> },

    // ── Refresh triggers ──
    /// Pointer entered a view's panel.
    Hover(ViewKind),
    RequestRefresh,

    // ── History table ──
    ScrollUp,
    ScrollDown,
}
