use anyhow::{Context, Result};
use clap::{Arg, Command};
use serline_core::{decode_text, pump_lines, SerialConfig, SerialService, LINE_TERMINATOR};

const DEFAULT_DEVICE: &str = "uart2";
const GREETING: &str = "hello serline!";

fn build_cli() -> Command {
    Command::new("serline")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Reads CR-delimited lines from a serial device, echoing every byte back")
        .arg(
            Arg::new("device")
                .value_name("DEVICE")
                .help("Serial device to open")
                .required(false),
        )
}

fn main() -> Result<()> {
    env_logger::init();

    let matches = build_cli().get_matches();
    let device = matches
        .get_one::<String>("device")
        .map(String::as_str)
        .unwrap_or(DEFAULT_DEVICE);

    run(device)
}

fn run(device: &str) -> Result<()> {
    if let Err(e) = SerialService::resolve(device) {
        log::error!("{e}");
        let ports = SerialService::list_ports();
        if ports.is_empty() {
            eprintln!("no serial ports present");
        } else {
            eprintln!("available ports: {}", ports.join(", "));
        }
        return Err(e.into());
    }

    let cfg = SerialConfig {
        port_name: device.to_string(),
        ..Default::default()
    };
    let service = SerialService::open(cfg).with_context(|| format!("open {device}"))?;

    let mut greeting = GREETING.as_bytes().to_vec();
    greeting.extend_from_slice(service.config().line_ending.as_bytes());
    service.send(greeting).context("write greeting")?;

    let worker = std::thread::Builder::new()
        .name("serial".to_string())
        .spawn(move || {
            let events = service.events().clone();
            pump_lines(
                &events,
                LINE_TERMINATOR,
                // Echo is best-effort; a failed echo must not stall the reader.
                |byte| {
                    let _ = service.send(vec![byte]);
                },
                |line| println!("data = {}", decode_text(&line)),
            );
        })
        .context("spawn serial worker thread")?;

    log::info!("reading from {device}, terminator 0x0D");

    // The worker has no exit condition; this blocks for the process
    // lifetime unless the service shuts down underneath it.
    worker
        .join()
        .map_err(|_| anyhow::anyhow!("serial worker panicked"))?;
    Ok(())
}
