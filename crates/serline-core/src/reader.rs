//! The line reader worker loop.
//!
//! Consumes `SerialEvent`s from a `SerialService`, echoes every received
//! byte back to the device, and hands each terminator-delimited line to a
//! callback. The blocking `recv()` replaces the original reset-then-wait
//! semaphore dance: the I/O thread sending an event is the wakeup.

use crossbeam_channel::Receiver;

use crate::accumulator::LineAccumulator;
use crate::serial_service::SerialEvent;

/// Runs the accumulation loop until the event channel disconnects or a
/// `Closed` event arrives. There is no timeout: with no incoming data
/// this blocks forever, by design.
///
/// For each received byte, in order: `echo` is called, then the byte is
/// fed to the accumulator, then `emit` receives any completed line.
pub fn pump_lines<E, L>(events: &Receiver<SerialEvent>, terminator: u8, mut echo: E, mut emit: L)
where
    E: FnMut(u8),
    L: FnMut(Vec<u8>),
{
    let mut acc = LineAccumulator::new(terminator);
    while let Ok(event) = events.recv() {
        match event {
            SerialEvent::Rx(data) => {
                for &byte in &data {
                    echo(byte);
                    if let Some(line) = acc.push(byte) {
                        emit(line);
                    }
                }
            }
            SerialEvent::Tx(_) => {}
            SerialEvent::Error(e) => {
                log::warn!("serial error: {e}");
            }
            SerialEvent::Closed => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::LINE_TERMINATOR;
    use crossbeam_channel::unbounded;

    fn run(chunks: &[&[u8]]) -> (Vec<u8>, Vec<Vec<u8>>) {
        let (tx, rx) = unbounded();
        for chunk in chunks {
            tx.send(SerialEvent::Rx(chunk.to_vec())).unwrap();
        }
        drop(tx);

        let mut echoed = Vec::new();
        let mut lines = Vec::new();
        pump_lines(
            &rx,
            LINE_TERMINATOR,
            |b| echoed.push(b),
            |line| lines.push(line),
        );
        (echoed, lines)
    }

    #[test]
    fn echoes_every_byte_and_emits_line() {
        let (echoed, lines) = run(&[b"AB\r"]);
        assert_eq!(echoed, b"AB\r");
        assert_eq!(lines, vec![b"AB".to_vec()]);
    }

    #[test]
    fn terminator_is_echoed_too() {
        let (echoed, _) = run(&[b"\r"]);
        assert_eq!(echoed, b"\r");
    }

    #[test]
    fn lines_split_across_chunks() {
        let (_, lines) = run(&[b"he", b"llo", b"\rworld\r"]);
        assert_eq!(lines, vec![b"hello".to_vec(), b"world".to_vec()]);
    }

    #[test]
    fn partial_line_is_held_until_terminated() {
        let (echoed, lines) = run(&[b"pending"]);
        assert_eq!(echoed, b"pending");
        assert!(lines.is_empty());
    }

    #[test]
    fn closed_event_ends_the_loop() {
        let (tx, rx) = unbounded();
        tx.send(SerialEvent::Rx(b"x".to_vec())).unwrap();
        tx.send(SerialEvent::Closed).unwrap();
        // Never delivered: the loop returns on Closed.
        tx.send(SerialEvent::Rx(b"y\r".to_vec())).unwrap();

        let mut echoed = Vec::new();
        let mut lines = Vec::new();
        pump_lines(&rx, LINE_TERMINATOR, |b| echoed.push(b), |l| lines.push(l));
        assert_eq!(echoed, b"x");
        assert!(lines.is_empty());
    }

    #[test]
    fn device_failure_ends_the_loop_without_emitting_partial_line() {
        // A dying device reports Error followed by Closed; the worker
        // must observe that and stop instead of blocking forever.
        let (tx, rx) = unbounded();
        tx.send(SerialEvent::Rx(b"par".to_vec())).unwrap();
        tx.send(SerialEvent::Error("device gone".to_string())).unwrap();
        tx.send(SerialEvent::Closed).unwrap();

        let mut echoed = Vec::new();
        let mut lines = Vec::new();
        pump_lines(&rx, LINE_TERMINATOR, |b| echoed.push(b), |l| lines.push(l));
        assert_eq!(echoed, b"par");
        assert!(lines.is_empty());
    }

    #[test]
    fn tx_and_error_events_do_not_disturb_accumulation() {
        let (tx, rx) = unbounded();
        tx.send(SerialEvent::Rx(b"ab".to_vec())).unwrap();
        tx.send(SerialEvent::Tx(2)).unwrap();
        tx.send(SerialEvent::Error("boom".to_string())).unwrap();
        tx.send(SerialEvent::Rx(b"c\r".to_vec())).unwrap();
        drop(tx);

        let mut lines = Vec::new();
        pump_lines(&rx, LINE_TERMINATOR, |_| {}, |l| lines.push(l));
        assert_eq!(lines, vec![b"abc".to_vec()]);
    }
}
