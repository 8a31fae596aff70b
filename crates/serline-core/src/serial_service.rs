use crossbeam_channel::{unbounded, Receiver, Sender};
use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use crate::error::SerialError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineEnding {
    LF,
    CR,
    CRLF,
}

impl LineEnding {
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            LineEnding::LF => b"\n",
            LineEnding::CR => b"\r",
            LineEnding::CRLF => b"\r\n",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub port_name: String,
    pub baud_rate: u32,
    pub data_bits: serialport::DataBits,
    pub parity: serialport::Parity,
    pub stop_bits: serialport::StopBits,
    pub flow_control: serialport::FlowControl,
    pub line_ending: LineEnding,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port_name: String::new(),
            baud_rate: 115_200,
            data_bits: serialport::DataBits::Eight,
            parity: serialport::Parity::None,
            stop_bits: serialport::StopBits::One,
            flow_control: serialport::FlowControl::None,
            line_ending: LineEnding::CR,
        }
    }
}

/// Events flowing from the port I/O thread to the consumer. `Rx` doubles
/// as the readiness signal: a blocked `recv()` wakes when bytes arrive.
#[derive(Debug, Clone)]
pub enum SerialEvent {
    Rx(Vec<u8>),
    Tx(usize),
    Error(String),
    Closed,
}

enum Command {
    Send(Vec<u8>),
    Close,
}

/// Handle to an opened serial device. The device itself lives on a
/// dedicated I/O thread; the handle talks to it over channels.
pub struct SerialService {
    cfg: SerialConfig,
    tx_cmd: Sender<Command>,
    rx_evt: Receiver<SerialEvent>,
}

impl SerialService {
    /// Names of the serial ports currently present on the host.
    pub fn list_ports() -> Vec<String> {
        serialport::available_ports()
            .unwrap_or_default()
            .into_iter()
            .map(|info| info.port_name)
            .collect()
    }

    /// Checks that a device with the given name exists. Resolution
    /// failure is terminal for callers; there is no retry.
    pub fn resolve(name: &str) -> Result<(), SerialError> {
        if Self::list_ports().iter().any(|p| p == name) {
            Ok(())
        } else {
            Err(SerialError::DeviceNotFound(name.to_string()))
        }
    }

    /// Opens the device and starts its I/O thread. Open errors surface
    /// here, synchronously; only I/O after this point is reported as
    /// `SerialEvent`s.
    pub fn open(cfg: SerialConfig) -> Result<Self, SerialError> {
        let mut port = serialport::new(&cfg.port_name, cfg.baud_rate)
            .data_bits(cfg.data_bits)
            .parity(cfg.parity)
            .stop_bits(cfg.stop_bits)
            .flow_control(cfg.flow_control)
            .timeout(Duration::from_millis(50))
            .open()
            .map_err(|e| SerialError::Open {
                port: cfg.port_name.clone(),
                source: e,
            })?;

        let (tx_cmd, rx_cmd) = unbounded::<Command>();
        let (tx_evt, rx_evt) = unbounded::<SerialEvent>();

        std::thread::Builder::new()
            .name("serial-io".to_string())
            .spawn(move || {
                let mut buf = [0u8; 4096];
                loop {
                    match port.read(&mut buf) {
                        Ok(n) if n > 0 => {
                            let _ = tx_evt.send(SerialEvent::Rx(buf[..n].to_vec()));
                        }
                        Ok(_) => {}
                        Err(e) if e.kind() == ErrorKind::TimedOut => {}
                        Err(e) => {
                            // Fatal read error (device unplugged, driver gone).
                            // Report it and stop rather than spinning on a
                            // read that fails immediately.
                            log::warn!("serial read error: {e}");
                            let _ = tx_evt.send(SerialEvent::Error(e.to_string()));
                            let _ = tx_evt.send(SerialEvent::Closed);
                            return;
                        }
                    }
                    while let Ok(cmd) = rx_cmd.try_recv() {
                        match cmd {
                            Command::Send(data) => match port.write(&data) {
                                Ok(n) => {
                                    let _ = tx_evt.send(SerialEvent::Tx(n));
                                }
                                Err(e) => {
                                    let _ = tx_evt.send(SerialEvent::Error(e.to_string()));
                                }
                            },
                            Command::Close => {
                                let _ = tx_evt.send(SerialEvent::Closed);
                                return;
                            }
                        }
                    }
                }
            })
            .map_err(|e| SerialError::Spawn {
                name: "serial-io",
                source: e,
            })?;

        Ok(Self { cfg, tx_cmd, rx_evt })
    }

    pub fn send(&self, data: Vec<u8>) -> Result<(), SerialError> {
        self.tx_cmd
            .send(Command::Send(data))
            .map_err(|_| SerialError::Disconnected)
    }

    pub fn close(&self) {
        let _ = self.tx_cmd.send(Command::Close);
    }

    pub fn events(&self) -> &Receiver<SerialEvent> {
        &self.rx_evt
    }

    pub fn config(&self) -> &SerialConfig {
        &self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_unknown_device_fails() {
        let err = SerialService::resolve("serline-no-such-device").unwrap_err();
        assert!(matches!(err, SerialError::DeviceNotFound(name) if name == "serline-no-such-device"));
    }

    #[test]
    fn line_ending_bytes() {
        assert_eq!(LineEnding::CR.as_bytes(), b"\r");
        assert_eq!(LineEnding::CRLF.as_bytes(), b"\r\n");
    }

    #[test]
    fn default_config_matches_wire_contract() {
        let cfg = SerialConfig::default();
        assert_eq!(cfg.baud_rate, 115_200);
        assert_eq!(cfg.line_ending, LineEnding::CR);
    }
}
