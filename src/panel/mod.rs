pub mod controller;
pub mod lifecycle;
pub mod render;

pub use controller::{RefreshController, ResultSet};
pub use lifecycle::{PanelEvent, PanelLifecycle, TroublePanel};
pub use render::{render, PanelBody, PanelContent, PanelRow, EMPTY_MESSAGE};
