//! Action enum — all user-initiated intents.

/// Outbound links shown as buttons on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    Portfolio,
    Profile,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    OpenLink(LinkTarget),
    ResetTilt,
    ToggleHelp,
    ToggleKeys,
    Quit,
}
