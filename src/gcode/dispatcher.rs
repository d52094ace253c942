// src/gcode/dispatcher.rs - Name-keyed handler registry and scheduling
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::GCodeCommand;
use super::command::{CommandError, GCodeHandler};
use super::tool::{TOOL_LABELS, ToolSelect};
use crate::config::DispatchConfig;
use crate::printer::Printer;

/// Maps command names to their registered handlers and decides, per
/// command, between immediate execution and the buffered queue that stays
/// ordered with queued motion.
pub struct Dispatcher {
    registry: HashMap<String, Arc<dyn GCodeHandler>>,
    buffer_tool_changes: bool,
    queue_tx: mpsc::UnboundedSender<GCodeCommand>,
    queue_rx: mpsc::UnboundedReceiver<GCodeCommand>,
}

impl Dispatcher {
    pub fn new(config: &DispatchConfig) -> Self {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        Self {
            registry: HashMap::new(),
            buffer_tool_changes: config.buffer_tool_changes,
            queue_tx,
            queue_rx,
        }
    }

    pub fn register(&mut self, name: impl Into<String>, handler: Arc<dyn GCodeHandler>) {
        let name = name.into();
        tracing::debug!("Registered G-code handler: {}", name);
        self.registry.insert(name, handler);
    }

    /// Install the tool-select handlers T0..T(count-1). `count` is capped by
    /// the label table; whether a given index is configured on this machine
    /// stays the planner's call. Returns how many handlers were installed.
    pub fn register_tools(&mut self, printer: &Printer, count: usize) -> usize {
        if count > TOOL_LABELS.len() {
            tracing::warn!(
                "Requested {} tool commands but only {} labels exist",
                count,
                TOOL_LABELS.len()
            );
        }
        let mut installed = 0;
        for index in 0..count {
            let Some(tool) = ToolSelect::new(printer.clone(), index) else {
                break;
            };
            self.register(tool.name(), Arc::new(tool));
            installed += 1;
        }
        installed
    }

    /// Route a parsed command: buffered commands (and tool changes, when the
    /// policy says so) go onto the in-order queue; everything else runs
    /// immediately.
    pub async fn dispatch(&self, cmd: GCodeCommand) -> Result<(), CommandError> {
        let handler = self.registry.get(&cmd.command).ok_or_else(|| {
            tracing::warn!("Unhandled G-code command: {}", cmd.command);
            CommandError::UnknownCommand(cmd.command.clone())
        })?;

        if handler.is_buffered() || (self.buffer_tool_changes && is_tool_change(&cmd.command)) {
            tracing::debug!("Queueing buffered G-code: {}", cmd.command);
            let name = cmd.command.clone();
            self.queue_tx
                .send(cmd)
                .map_err(|_| CommandError::QueueClosed(name))?;
            return Ok(());
        }

        tracing::debug!("Processing G-code: {}", cmd.command);
        handler.execute(&cmd).await
    }

    /// Wait for the next buffered command and execute it. Intended for the
    /// loop that replays buffered commands in order with motion.
    pub async fn process_next(&mut self) -> Result<(), CommandError> {
        if let Some(cmd) = self.queue_rx.recv().await {
            self.execute_buffered(cmd).await?;
        }
        Ok(())
    }

    /// Execute every command currently sitting in the buffered queue, in
    /// arrival order. Returns how many commands ran.
    pub async fn drain(&mut self) -> Result<usize, CommandError> {
        let mut ran = 0;
        while let Ok(cmd) = self.queue_rx.try_recv() {
            self.execute_buffered(cmd).await?;
            ran += 1;
        }
        Ok(ran)
    }

    async fn execute_buffered(&self, cmd: GCodeCommand) -> Result<(), CommandError> {
        let handler = self
            .registry
            .get(&cmd.command)
            .ok_or_else(|| CommandError::UnknownCommand(cmd.command.clone()))?;
        tracing::debug!("Processing buffered G-code: {}", cmd.command);
        handler.execute(&cmd).await
    }

    /// Registered command names with their descriptions, sorted by name.
    /// Backs help surfaces such as the CLI command listing.
    pub fn descriptions(&self) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = self
            .registry
            .iter()
            .map(|(name, handler)| (name.clone(), handler.description().to_string()))
            .collect();
        entries.sort();
        entries
    }

    pub fn description_of(&self, name: &str) -> Option<&str> {
        self.registry.get(name).map(|handler| handler.description())
    }
}

/// A tool-change code is 'T' followed by a bare tool number.
fn is_tool_change(name: &str) -> bool {
    name.strip_prefix('T')
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}
