//! Tray listener.
//!
//! Tray menus and the global hotkey deliver their events on background
//! threads. The listener forwards them over one channel and wakes the UI,
//! which drains the channel each frame. The editor session is only ever
//! touched on the UI thread.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayCommand {
    Toggle,
    ShowOptions,
    Exit,
}

/// Source of tray menu events.
pub trait TrayEvents: Send + 'static {
    /// Block until the next event. `None` once the tray is gone.
    fn next_command(&mut self) -> Option<TrayCommand>;
}

impl<I> TrayEvents for I
where
    I: Iterator<Item = TrayCommand> + Send + 'static,
{
    fn next_command(&mut self) -> Option<TrayCommand> {
        self.next()
    }
}

pub struct TrayListener {
    sender: Sender<TrayCommand>,
    commands: Receiver<TrayCommand>,
    handles: Vec<JoinHandle<()>>,
}

impl Default for TrayListener {
    fn default() -> Self {
        Self::new()
    }
}

impl TrayListener {
    /// A listener with no sources attached yet.
    pub fn new() -> Self {
        let (sender, commands) = mpsc::channel();
        Self {
            sender,
            commands,
            handles: Vec::new(),
        }
    }

    /// Start a listener thread for a single source. `wake` is called after
    /// every forwarded command; pass something that requests a repaint.
    pub fn spawn<E, W>(events: E, wake: W) -> std::io::Result<Self>
    where
        E: TrayEvents,
        W: Fn() + Send + Sync + 'static,
    {
        let mut listener = Self::new();
        listener.listen("tray-listener", events, Arc::new(wake))?;
        Ok(listener)
    }

    /// Forward another source into the same channel on its own thread.
    pub fn listen<E>(
        &mut self,
        name: &str,
        mut events: E,
        wake: Arc<dyn Fn() + Send + Sync>,
    ) -> std::io::Result<()>
    where
        E: TrayEvents,
    {
        let tx = self.sender.clone();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                while let Some(command) = events.next_command() {
                    debug!(?command, "tray command");
                    if tx.send(command).is_err() {
                        break;
                    }
                    wake();
                }
                info!("listener stopped");
            })?;

        self.handles.push(handle);
        Ok(())
    }

    /// Commands received since the last call, oldest first.
    pub fn drain(&self) -> Vec<TrayCommand> {
        self.commands.try_iter().collect()
    }

    pub fn is_running(&self) -> bool {
        self.handles.iter().any(|h| !h.is_finished())
    }

    /// Wait for every listener thread to end.
    pub fn join(&mut self) {
        for handle in self.handles.drain(..) {
            let name = handle.thread().name().unwrap_or("listener").to_string();
            if handle.join().is_err() {
                warn!(thread = %name, "listener thread panicked");
            }
        }
    }
}
