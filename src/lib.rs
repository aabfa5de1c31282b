pub mod config;
pub mod error;
pub mod host;
pub mod panel;
pub mod plugin;
pub mod scanner;

pub use config::PanelConfig;
pub use error::{Result, TroubleError};
pub use host::{
    move_cursor_and_focus, ActiveDocument, DocumentHost, EditorWorkspace, EventBus, FileWatcher,
    FsHost, HostEvent, LineEditor, PanelView, Subscription,
};
pub use panel::{
    render, PanelBody, PanelContent, PanelEvent, PanelLifecycle, PanelRow, RefreshController,
    ResultSet, TroublePanel,
};
pub use plugin::{CommandRegistration, PanelRegistration, RibbonRegistration, TroubleTagsPlugin};
pub use scanner::{scan, Occurrence, TagKind, TagStyle};
