//! Core functionalities: serial I/O, line accumulation, text decoding.

pub mod accumulator;
pub mod encoding;
pub mod error;
pub mod reader;
pub mod serial_service;

pub use accumulator::{LineAccumulator, LINE_CAPACITY, LINE_TERMINATOR};
pub use encoding::decode_text;
pub use error::SerialError;
pub use reader::pump_lines;
pub use serial_service::{LineEnding, SerialConfig, SerialEvent, SerialService};
