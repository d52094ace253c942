// src/planner.rs - Path planner collaborator: extruder selection and E-axis limits
use thiserror::Error;

use crate::config::ExtruderConfig;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("extruder index {index} out of range (configured count: {count})")]
    ExtruderOutOfRange { index: usize, count: usize },
}

/// Motion limits currently applied to the E axis, taken from whichever
/// extruder is selected.
#[derive(Debug, Clone, Default)]
pub struct EAxisLimits {
    pub max_feedrate: f64,
    pub max_print_accel: f64,
    pub max_travel_accel: f64,
    pub steps_per_mm: f64,
    pub max_start_feedrate: f64,
}

impl From<&ExtruderConfig> for EAxisLimits {
    fn from(extruder: &ExtruderConfig) -> Self {
        Self {
            max_feedrate: extruder.max_feedrate,
            max_print_accel: extruder.max_print_accel,
            max_travel_accel: extruder.max_travel_accel,
            steps_per_mm: extruder.steps_per_mm,
            max_start_feedrate: extruder.max_start_feedrate,
        }
    }
}

/// Holds the per-extruder limit tables and tracks which extruder the motion
/// pipeline is currently feeding. Selecting an extruder folds its limits
/// into the E axis in one step.
pub struct PathPlanner {
    extruders: Vec<ExtruderConfig>,
    active: usize,
    e_axis: EAxisLimits,
}

impl PathPlanner {
    pub fn new(extruders: Vec<ExtruderConfig>) -> Self {
        let e_axis = extruders.first().map(EAxisLimits::from).unwrap_or_default();
        Self {
            extruders,
            active: 0,
            e_axis,
        }
    }

    /// Make extruder `index` the active one. Rejects indices beyond the
    /// configured extruder count without touching any planner state.
    pub fn set_extruder(&mut self, index: usize) -> Result<(), PlannerError> {
        let count = self.extruders.len();
        let extruder = self
            .extruders
            .get(index)
            .ok_or(PlannerError::ExtruderOutOfRange { index, count })?;

        self.e_axis = EAxisLimits::from(extruder);
        self.active = index;
        tracing::debug!("Path planner switched to extruder {}", index);
        Ok(())
    }

    pub fn active_extruder(&self) -> usize {
        self.active
    }

    pub fn extruder_count(&self) -> usize {
        self.extruders.len()
    }

    pub fn e_axis_limits(&self) -> &EAxisLimits {
        &self.e_axis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_extruders() -> Vec<ExtruderConfig> {
        let second = ExtruderConfig {
            max_feedrate: 42.0,
            steps_per_mm: 510.0,
            ..Default::default()
        };
        vec![ExtruderConfig::default(), second]
    }

    #[test]
    fn starts_on_extruder_zero() {
        let planner = PathPlanner::new(two_extruders());
        assert_eq!(planner.active_extruder(), 0);
        assert_eq!(planner.extruder_count(), 2);
        assert_eq!(
            planner.e_axis_limits().max_feedrate,
            ExtruderConfig::default().max_feedrate
        );
    }

    #[test]
    fn selecting_folds_limits_into_e_axis() {
        let mut planner = PathPlanner::new(two_extruders());
        planner.set_extruder(1).unwrap();
        assert_eq!(planner.active_extruder(), 1);
        assert_eq!(planner.e_axis_limits().max_feedrate, 42.0);
        assert_eq!(planner.e_axis_limits().steps_per_mm, 510.0);
    }

    #[test]
    fn out_of_range_index_is_rejected_without_mutation() {
        let mut planner = PathPlanner::new(two_extruders());
        planner.set_extruder(1).unwrap();
        let err = planner.set_extruder(2).unwrap_err();
        match err {
            PlannerError::ExtruderOutOfRange { index, count } => {
                assert_eq!(index, 2);
                assert_eq!(count, 2);
            }
        }
        assert_eq!(planner.active_extruder(), 1);
        assert_eq!(planner.e_axis_limits().max_feedrate, 42.0);
    }
}
