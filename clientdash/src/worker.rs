//! Background network work for the TUI.
//!
//! Sheet fetches and chat posts run on a small tokio runtime so the draw
//! loop never blocks. Results come back over a channel that the main loop
//! drains every tick.

use std::sync::mpsc::Sender;
use std::time::Duration;

use anyhow::{Context, Result};
use clientdash_core::chat::{OutboundMessage, WebhookClient};
use clientdash_core::ingest::Generation;
use clientdash_core::SheetIngestor;
use tokio::task::JoinHandle;

use crate::app::{Command, TaskEvent};

/// Runs [`Command`]s off the UI thread.
pub struct Worker {
    runtime: tokio::runtime::Runtime,
    ingestor: SheetIngestor,
    chat: WebhookClient,
    events: Sender<TaskEvent>,
    /// The refresh currently in flight, if any
    refresh_task: Option<JoinHandle<()>>,
    /// The chat post currently in flight, if any
    chat_task: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn new(
        ingestor: SheetIngestor,
        chat: WebhookClient,
        events: Sender<TaskEvent>,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("clientdash-worker")
            .enable_all()
            .build()
            .context("failed to create background runtime")?;

        Ok(Self {
            runtime,
            ingestor,
            chat,
            events,
            refresh_task: None,
            chat_task: None,
        })
    }

    /// Start the work a command describes. Never blocks.
    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::Refresh(generation) => self.spawn_refresh(generation),
            Command::SendChat(outbound) => self.spawn_chat(outbound),
        }
    }

    fn spawn_refresh(&mut self, generation: Generation) {
        if let Some(previous) = self.refresh_task.take() {
            if !previous.is_finished() {
                tracing::debug!("Aborting superseded sheet refresh");
                previous.abort();
            }
        }

        let ingestor = self.ingestor.clone();
        let events = self.events.clone();
        let handle = self.runtime.spawn(async move {
            let result = ingestor.ingest().await;
            // A closed channel only means the UI is shutting down.
            let _ = events.send(TaskEvent::Ingested { generation, result });
        });
        self.refresh_task = Some(handle);
    }

    /// The session admits one message at a time, so a previous post is
    /// never aborted here; its reply must still reach the session.
    fn spawn_chat(&mut self, outbound: OutboundMessage) {
        if self.chat_task.as_ref().is_some_and(|task| !task.is_finished()) {
            tracing::warn!(
                message_id = %outbound.message_id,
                "Chat post dispatched while another is outstanding"
            );
        }

        let chat = self.chat.clone();
        let events = self.events.clone();
        let handle = self.runtime.spawn(async move {
            let outcome = chat.send(&outbound.content, outbound.sent_at).await;
            let _ = events.send(TaskEvent::ChatReplied(outcome));
        });
        self.chat_task = Some(handle);
    }

    /// Stop outstanding work without waiting on slow requests.
    pub fn shutdown(mut self) {
        for task in [self.refresh_task.take(), self.chat_task.take()]
            .into_iter()
            .flatten()
        {
            task.abort();
        }
        self.runtime.shutdown_timeout(Duration::from_millis(250));
    }
}
