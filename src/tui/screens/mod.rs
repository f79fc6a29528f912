//! Screen rendering modules

pub mod breaking;
pub mod dashboard;
pub mod help;
pub mod interface;

pub(crate) use breaking::{render_breaking, BreakingMode, BreakingScreen};
pub(crate) use dashboard::{render_dashboard, DashboardScreen};
pub(crate) use help::render_help;
pub(crate) use interface::{render_interface, InterfaceScreen};
