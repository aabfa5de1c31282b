//! Plugin entry point
//!
//! Registers the panel, its toggle command and ribbon icon with the host, and
//! mounts or tears down the panel task when either is used.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::PanelConfig;
use crate::error::{Result, TroubleError};
use crate::host::{DocumentHost, EventBus, PanelView, Subscription};
use crate::panel::{PanelEvent, RefreshController, TroublePanel};

pub const VIEW_TYPE: &str = "trouble-tags-view";
pub const DISPLAY_NAME: &str = "Trouble Tags";
pub const ICON: &str = "alert-triangle";
pub const TOGGLE_COMMAND_ID: &str = "toggle-trouble-tags";
pub const TOGGLE_COMMAND_NAME: &str = "Toggle Trouble Tags panel";

/// Panel registration handed to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelRegistration {
    pub view_type: &'static str,
    pub display_name: &'static str,
    pub icon: &'static str,
}

/// Ribbon icon that toggles the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RibbonRegistration {
    pub icon: &'static str,
    pub title: &'static str,
}

/// A user-invocable command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandRegistration {
    pub id: &'static str,
    pub name: &'static str,
}

struct MountedPanel<H: DocumentHost + ?Sized, V: PanelView> {
    sender: mpsc::UnboundedSender<PanelEvent>,
    task: JoinHandle<RefreshController<H, V>>,
    _subscription: Subscription,
}

pub struct TroubleTagsPlugin<H, V, F>
where
    H: DocumentHost + ?Sized + 'static,
    V: PanelView + 'static,
    F: Fn() -> V,
{
    host: Arc<H>,
    events: EventBus,
    config: PanelConfig,
    make_view: F,
    mounted: Option<MountedPanel<H, V>>,
}

impl<H, V, F> TroubleTagsPlugin<H, V, F>
where
    H: DocumentHost + ?Sized + 'static,
    V: PanelView + 'static,
    F: Fn() -> V,
{
    pub fn new(host: Arc<H>, events: EventBus, config: PanelConfig, make_view: F) -> Self {
        Self {
            host,
            events,
            config,
            make_view,
            mounted: None,
        }
    }

    pub fn panel() -> PanelRegistration {
        PanelRegistration {
            view_type: VIEW_TYPE,
            display_name: DISPLAY_NAME,
            icon: ICON,
        }
    }

    pub fn commands() -> Vec<CommandRegistration> {
        vec![CommandRegistration {
            id: TOGGLE_COMMAND_ID,
            name: TOGGLE_COMMAND_NAME,
        }]
    }

    pub fn ribbon() -> RibbonRegistration {
        RibbonRegistration {
            icon: ICON,
            title: DISPLAY_NAME,
        }
    }

    /// Ribbon icon clicked: same as the toggle command
    pub async fn on_ribbon_click(&mut self) -> Result<bool> {
        self.toggle().await
    }

    pub fn is_open(&self) -> bool {
        self.mounted.is_some()
    }

    /// Run a registered command. Returns `false` for unknown command ids.
    pub async fn run_command(&mut self, id: &str) -> Result<bool> {
        match id {
            TOGGLE_COMMAND_ID => {
                self.toggle().await?;
                Ok(true)
            }
            _ => {
                tracing::debug!("Unknown command {}", id);
                Ok(false)
            }
        }
    }

    /// Open the panel if it is closed, close it otherwise. Returns whether the
    /// panel is open afterwards.
    pub async fn toggle(&mut self) -> Result<bool> {
        if self.is_open() {
            self.close_panel().await?;
            Ok(false)
        } else {
            self.open_panel();
            Ok(true)
        }
    }

    /// Mount the panel: subscribe to host events and start its event loop
    pub fn open_panel(&mut self) {
        if self.is_open() {
            return;
        }

        let (sender, receiver) = mpsc::unbounded_channel();

        let forward = sender.clone();
        let subscription = self.events.subscribe(move |event| {
            // Fails only once the panel task has stopped
            let _ = forward.send(PanelEvent::Host(event.clone()));
        });

        let controller =
            RefreshController::new(self.host.clone(), (self.make_view)(), self.config.clone());
        let task = tokio::spawn(TroublePanel::new(controller).run(receiver));

        tracing::info!("{} panel opened", DISPLAY_NAME);

        self.mounted = Some(MountedPanel {
            sender,
            task,
            _subscription: subscription,
        });
    }

    /// Tear the panel down and hand back its final controller state
    pub async fn close_panel(&mut self) -> Result<Option<RefreshController<H, V>>> {
        let Some(mounted) = self.mounted.take() else {
            return Ok(None);
        };

        drop(mounted._subscription);
        // The loop also stops when the channel closes, so a failed send is fine
        let _ = mounted.sender.send(PanelEvent::Close);

        let controller = mounted
            .task
            .await
            .map_err(|e| TroubleError::Panel(e.to_string()))?;

        tracing::info!("{} panel closed", DISPLAY_NAME);
        Ok(Some(controller))
    }
}
