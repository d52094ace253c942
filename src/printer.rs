// src/printer.rs - Shared printer handle and mutable state
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::planner::PathPlanner;

/// Mutable printer state shared between the dispatcher and any
/// motion/readback loops.
#[derive(Debug, Clone)]
pub struct PrinterState {
    /// Label of the active tool ("E", "H", "A", ...). Must agree with the
    /// path planner's active extruder index after every tool change.
    pub current_tool: String,
}

impl PrinterState {
    pub fn new() -> Self {
        Self {
            current_tool: "E".to_string(),
        }
    }
}

impl Default for PrinterState {
    fn default() -> Self {
        Self::new()
    }
}

/// Cheaply clonable handle to the shared printer. Command handlers hold one
/// of these instead of owning any printer internals; writers must take the
/// state lock before the planner lock and hold both across a tool change so
/// no reader can observe the two disagreeing.
#[derive(Clone)]
pub struct Printer {
    state: Arc<RwLock<PrinterState>>,
    path_planner: Arc<RwLock<PathPlanner>>,
}

impl Printer {
    pub fn new(config: &Config) -> Self {
        Self {
            state: Arc::new(RwLock::new(PrinterState::new())),
            path_planner: Arc::new(RwLock::new(PathPlanner::new(config.extruders.clone()))),
        }
    }

    pub fn state(&self) -> &Arc<RwLock<PrinterState>> {
        &self.state
    }

    pub fn path_planner(&self) -> &Arc<RwLock<PathPlanner>> {
        &self.path_planner
    }

    pub async fn current_tool(&self) -> String {
        self.state.read().await.current_tool.clone()
    }

    pub async fn active_extruder(&self) -> usize {
        self.path_planner.read().await.active_extruder()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fresh_printer_starts_on_t0() {
        let printer = Printer::new(&Config::default());
        assert_eq!(printer.current_tool().await, "E");
        assert_eq!(printer.active_extruder().await, 0);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let printer = Printer::new(&Config::default());
        let other = printer.clone();
        printer.state().write().await.current_tool = "H".to_string();
        assert_eq!(other.current_tool().await, "H");
    }
}
