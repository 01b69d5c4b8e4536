//! GUI module - User interface components

mod app;
mod control_panel;
mod year_view;

pub use app::FreightDashboardApp;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use year_view::YearView;
