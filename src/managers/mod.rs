// WebShell lifecycle managers
// Managers own the window and tab state machines: creation, selection,
// destruction, and the routing of surface events.

pub mod tab_controller;
pub mod window_controller;
pub mod window_manager;
