//! Panel lifecycle and event loop
//!
//! A [`TroublePanel`] is driven by a single task: host events arrive through
//! one channel and the debounce timer is polled next to it, so the controller
//! never sees two transitions at once.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::host::{DocumentHost, HostEvent, PanelView};

use super::controller::RefreshController;

/// Messages delivered to a running panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    Host(HostEvent),
    Close,
}

/// Lifecycle hooks a host calls on a panel it has mounted
#[async_trait]
pub trait PanelLifecycle: Send {
    async fn open(&mut self);
    async fn on_event(&mut self, event: HostEvent);
    fn close(&mut self);
}

pub struct TroublePanel<H: DocumentHost + ?Sized, V: PanelView> {
    controller: RefreshController<H, V>,
}

impl<H, V> TroublePanel<H, V>
where
    H: DocumentHost + ?Sized,
    V: PanelView,
{
    pub fn new(controller: RefreshController<H, V>) -> Self {
        Self { controller }
    }

    pub fn controller(&self) -> &RefreshController<H, V> {
        &self.controller
    }

    /// Open the panel and process events until `Close` arrives or every
    /// sender is gone. The controller is handed back once the panel is closed.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<PanelEvent>,
    ) -> RefreshController<H, V> {
        self.open().await;

        loop {
            tokio::select! {
                biased;

                event = events.recv() => match event {
                    Some(PanelEvent::Host(event)) => self.on_event(event).await,
                    Some(PanelEvent::Close) | None => break,
                },
                _ = self.controller.debounce_elapsed() => {
                    self.controller.on_debounce_fired().await;
                }
            }
        }

        self.close();
        self.controller
    }
}

#[async_trait]
impl<H, V> PanelLifecycle for TroublePanel<H, V>
where
    H: DocumentHost + ?Sized,
    V: PanelView,
{
    async fn open(&mut self) {
        tracing::debug!("Panel opened");
        self.controller.on_document_focus_changed().await;
    }

    async fn on_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::FocusChanged => self.controller.on_document_focus_changed().await,
            HostEvent::DocumentModified { path } => self.controller.on_document_edited(&path),
        }
    }

    fn close(&mut self) {
        self.controller.close();
        tracing::debug!("Panel closed");
    }
}
