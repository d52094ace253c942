// src/gcode/tool.rs - Tool-select commands (T0, T1, T2, ...)
use async_trait::async_trait;

use super::GCodeCommand;
use super::command::{CommandError, GCodeHandler};
use crate::planner::PlannerError;
use crate::printer::Printer;

/// Tool labels of the stock toolhead set; position in the table is the
/// extruder index the label is bound to.
pub const TOOL_LABELS: [&str; 5] = ["E", "H", "A", "B", "C"];

/// Switches the active extruder used by subsequent motion and extrusion
/// commands. One instance per tool index, with a fixed label.
pub struct ToolSelect {
    printer: Printer,
    index: usize,
    label: &'static str,
    description: String,
}

impl ToolSelect {
    /// Build the handler for tool `index`. Returns `None` for indices with
    /// no label binding; whether the index is actually configured on this
    /// machine is the path planner's call at execute time.
    pub fn new(printer: Printer, index: usize) -> Option<Self> {
        let label = *TOOL_LABELS.get(index)?;
        Some(Self {
            description: format!(
                "Select currently used extruder tool to be T{} ({})",
                index, label
            ),
            printer,
            index,
            label,
        })
    }

    /// The G-code name this handler answers to ("T0", "T1", ...)
    pub fn name(&self) -> String {
        format!("T{}", self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    fn planner_error(&self, err: PlannerError) -> CommandError {
        match err {
            PlannerError::ExtruderOutOfRange { index, count } => CommandError::UnsupportedState {
                command: self.name(),
                reason: format!("extruder {} not configured (count: {})", index, count),
            },
        }
    }
}

#[async_trait]
impl GCodeHandler for ToolSelect {
    async fn execute(&self, _cmd: &GCodeCommand) -> Result<(), CommandError> {
        // T commands take no operands; parameters on the parsed command are
        // ignored. Both write guards are held across the update so readers
        // never see `current_tool` and the planner's index disagree.
        let mut state = self.printer.state().write().await;
        let mut planner = self.printer.path_planner().write().await;

        planner
            .set_extruder(self.index)
            .map_err(|e| self.planner_error(e))?;
        state.current_tool = self.label.to_string();

        tracing::debug!("Active tool is now T{} ({})", self.index, self.label);
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn is_buffered(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ExtruderConfig};

    fn test_printer(extruder_count: usize) -> Printer {
        let config = Config {
            extruders: (0..extruder_count)
                .map(|_| ExtruderConfig::default())
                .collect(),
            ..Default::default()
        };
        Printer::new(&config)
    }

    #[tokio::test]
    async fn t1_selects_extruder_one_and_label_h() {
        let printer = test_printer(3);
        assert_eq!(printer.current_tool().await, "E");
        assert_eq!(printer.active_extruder().await, 0);

        let t1 = ToolSelect::new(printer.clone(), 1).unwrap();
        t1.execute(&GCodeCommand::new("T1")).await.unwrap();

        assert_eq!(printer.current_tool().await, "H");
        assert_eq!(printer.active_extruder().await, 1);
    }

    #[tokio::test]
    async fn every_variant_updates_both_sides() {
        let printer = test_printer(3);
        for (index, label) in [(0, "E"), (1, "H"), (2, "A")] {
            let tool = ToolSelect::new(printer.clone(), index).unwrap();
            tool.execute(&GCodeCommand::new(tool.name())).await.unwrap();
            assert_eq!(printer.current_tool().await, label);
            assert_eq!(printer.active_extruder().await, index);
        }
    }

    #[tokio::test]
    async fn unconfigured_extruder_leaves_state_unchanged() {
        let printer = test_printer(2);
        let t2 = ToolSelect::new(printer.clone(), 2).unwrap();

        let err = t2.execute(&GCodeCommand::new("T2")).await.unwrap_err();
        assert!(matches!(err, CommandError::UnsupportedState { .. }));
        assert_eq!(printer.current_tool().await, "E");
        assert_eq!(printer.active_extruder().await, 0);
    }

    #[tokio::test]
    async fn reselecting_the_same_tool_is_idempotent() {
        let printer = test_printer(2);
        let t0 = ToolSelect::new(printer.clone(), 0).unwrap();

        t0.execute(&GCodeCommand::new("T0")).await.unwrap();
        let tool_after_one = printer.current_tool().await;
        let extruder_after_one = printer.active_extruder().await;

        t0.execute(&GCodeCommand::new("T0")).await.unwrap();
        assert_eq!(printer.current_tool().await, tool_after_one);
        assert_eq!(printer.active_extruder().await, extruder_after_one);
    }

    #[tokio::test]
    async fn never_buffered_even_after_execute() {
        let printer = test_printer(3);
        for index in 0..3 {
            let tool = ToolSelect::new(printer.clone(), index).unwrap();
            assert!(!tool.is_buffered());
            tool.execute(&GCodeCommand::new(tool.name())).await.unwrap();
            assert!(!tool.is_buffered());
        }
    }

    #[test]
    fn description_is_stable_before_execute() {
        let printer = test_printer(1);
        let t0 = ToolSelect::new(printer, 0).unwrap();
        assert_eq!(
            t0.description(),
            "Select currently used extruder tool to be T0 (E)"
        );
        assert_eq!(t0.description(), t0.description());
    }

    #[tokio::test]
    async fn parameters_on_the_command_are_ignored() {
        let printer = test_printer(2);
        let t1 = ToolSelect::new(printer.clone(), 1).unwrap();
        let cmd = GCodeCommand::new("T1").with_parameter("S", "99");
        t1.execute(&cmd).await.unwrap();
        assert_eq!(printer.current_tool().await, "H");
    }

    #[test]
    fn unlabeled_index_has_no_handler() {
        let printer = test_printer(1);
        assert!(ToolSelect::new(printer, TOOL_LABELS.len()).is_none());
    }
}
