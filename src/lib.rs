// src/lib.rs - Command-dispatch core of the printer controller
pub mod config;
pub mod gcode;
pub mod planner;
pub mod printer;

pub use config::Config;
pub use gcode::{CommandError, Dispatcher, GCodeCommand, GCodeHandler};
pub use printer::{Printer, PrinterState};
