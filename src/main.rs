use clap::{Parser, Subcommand};
use provlink_rs::device::{LogJoiner, PressOnce, SimLine, SystemClock};
use provlink_rs::phy::{Frame, Level, OokEncoder};
use provlink_rs::role::{ReceiverMachine, SenderMachine, SenderState};
use provlink_rs::utils::consts::TX_TIMEOUT_MS;
use provlink_rs::utils::logging::init_logging;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run sender and receiver over an in-memory line
    Loopback {
        #[arg(short, long)]
        ssid: String,
        #[arg(short, long)]
        password: String,
        /// Receiver poll interval in microseconds
        #[arg(long, default_value_t = 100)]
        poll_us: u64,
    },
    /// Print the framed bytes and transmit schedule for given credentials
    Encode {
        #[arg(short, long)]
        ssid: String,
        #[arg(short, long)]
        password: String,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Loopback {
            ssid,
            password,
            poll_us,
        } => loopback(&ssid, &password, poll_us),
        Commands::Encode { ssid, password } => encode(&ssid, &password),
    }
}

/// Sender and receiver threads share one simulated line, exactly the
/// half-duplex pairing the two physical devices would form.
fn loopback(ssid: &str, password: &str, poll_us: u64) {
    let payload = format!("{ssid}:{password}");
    let mut sender = match SenderMachine::new(payload.as_bytes(), TX_TIMEOUT_MS) {
        Ok(machine) => machine,
        Err(e) => {
            error!("Cannot build frame: {}", e);
            std::process::exit(1);
        }
    };

    let line = SimLine::new();
    let stop = Arc::new(AtomicBool::new(false));
    if let Err(e) = ctrlc::set_handler({
        let stop = stop.clone();
        move || stop.store(true, Ordering::SeqCst)
    }) {
        error!("Failed to install Ctrl-C handler: {}", e);
    }

    let (creds_tx, creds_rx) = crossbeam_channel::bounded(1);

    let receiver_handle = thread::spawn({
        let mut line = line.clone();
        let stop = stop.clone();
        move || {
            let mut clock = SystemClock::new();
            let mut receiver = ReceiverMachine::new();
            let mut joiner = LogJoiner;
            while !stop.load(Ordering::SeqCst) {
                receiver.poll(&mut clock, &mut line, &mut joiner);
                if receiver.is_done() {
                    if let Some(creds) = receiver.credentials() {
                        let _ = creds_tx.send(creds.clone());
                    }
                    break;
                }
                thread::sleep(Duration::from_micros(poll_us));
            }
        }
    });

    let sender_handle = thread::spawn({
        let mut line = line.clone();
        let stop = stop.clone();
        move || {
            let mut clock = SystemClock::new();
            let mut input = line.clone();
            let mut trigger = PressOnce::new();
            while !stop.load(Ordering::SeqCst) {
                sender.poll(&mut clock, &mut line, &mut input, &mut trigger);
                if matches!(sender.state(), SenderState::Listening | SenderState::Done) {
                    break;
                }
            }
        }
    });

    match creds_rx.recv_timeout(Duration::from_millis(TX_TIMEOUT_MS + 2_000)) {
        Ok(creds) => info!(
            "Loopback provisioned: ssid=\"{}\", password of {} characters",
            creds.ssid,
            creds.password.len()
        ),
        Err(_) => error!("Loopback timed out without provisioning"),
    }

    stop.store(true, Ordering::SeqCst);
    let _ = sender_handle.join();
    let _ = receiver_handle.join();
}

fn encode(ssid: &str, password: &str) {
    let payload = format!("{ssid}:{password}");
    let frame = match Frame::build(payload.as_bytes()) {
        Ok(frame) => frame,
        Err(e) => {
            error!("Cannot build frame: {}", e);
            std::process::exit(1);
        }
    };

    let bytes = frame.to_bytes();
    let hex: Vec<String> = bytes.iter().map(|b| format!("{b:02X}")).collect();
    println!("wire bytes ({}): {}", bytes.len(), hex.join(" "));

    let steps = OokEncoder::new().encode_frame(&frame);
    let on_air: u64 = steps.iter().map(|s| s.hold_us).sum();
    println!("steps: {}, on-air time: {:.1} ms", steps.len(), on_air as f64 / 1_000.0);
    for (i, step) in steps.iter().enumerate() {
        let mark = match step.level {
            Level::High => "high",
            Level::Low => "low ",
        };
        println!("{i:4}  {mark}  {:>6} us", step.hold_us);
    }
}
