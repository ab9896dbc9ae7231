// Command-line driver for the Minitaur body and camera head

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::thread::sleep;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use minitaur_runtime::body::{BodySession, UartChannel};
use minitaur_runtime::config::{self, HeadConfig};
use minitaur_runtime::head::{HeadController, RpiHeadOutputs};
use minitaur_runtime::messages::{BodyCommand, HeadTarget, SequenceStep};

#[derive(Parser)]
#[command(about = "Drive the Minitaur body and camera head from a host computer")]
struct Cli {
    /// Serial port of the body motor controller
    #[arg(long, default_value = config::DEFAULT_PORT)]
    port: String,

    /// Serial baudrate
    #[arg(long, default_value_t = config::DEFAULT_BAUDRATE)]
    baudrate: u32,

    /// Skip GPIO setup when no head unit is attached
    #[arg(long)]
    no_head: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the built-in walk-and-look test sequence
    Demo,

    /// Point the head at the given absolute angles
    Look {
        /// Turn angle in degrees (-160 to 160)
        #[arg(long)]
        turn: Option<f64>,
        /// Tilt angle in degrees (-45 to 45)
        #[arg(long)]
        tilt: Option<f64>,
    },

    /// Send a single body command
    Drive {
        /// Behavior slot (0 to 9)
        #[arg(long)]
        behavior: Option<u8>,
        /// Forward speed in m/s (-0.9 to 0.9)
        #[arg(long)]
        forward: Option<f32>,
        /// Turn rate in rad/s (-0.9 to 0.9)
        #[arg(long)]
        turn: Option<f32>,
        /// Height offset (-0.9 to 0.9)
        #[arg(long)]
        height: Option<f32>,
    },

    /// Replay a JSON-lines sequence file, one step per line
    Sequence { file: PathBuf },
}

struct Robot {
    session: BodySession<UartChannel>,
    head: Option<HeadController<RpiHeadOutputs>>,
}

impl Robot {
    fn connect(port: &str, baudrate: u32, with_head: bool) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Opening serial port {} at {} baud", port, baudrate);
        let session = BodySession::new(UartChannel::open(port, baudrate)?);

        let head = if with_head {
            let head_config = HeadConfig::default();
            Some(HeadController::new(
                RpiHeadOutputs::new(&head_config)?,
                head_config,
            ))
        } else {
            None
        };

        Ok(Self { session, head })
    }

    fn look(&mut self, target: HeadTarget) -> Result<(), Box<dyn std::error::Error>> {
        match self.head.as_mut() {
            Some(head) => head.look(target)?,
            None => warn!("Head unit disabled, ignoring look request"),
        }
        Ok(())
    }

    /// Send a body command repeatedly at roughly 10 Hz.
    fn drive_for(
        &mut self,
        cmd: BodyCommand,
        repeats: u32,
    ) -> Result<(), Box<dyn std::error::Error>> {
        for _ in 0..repeats {
            self.session.send(&cmd)?;
            sleep(Duration::from_millis(100));
        }
        Ok(())
    }
}

/// Walk-and-look routine: walk forward looking up-right, walk tall looking
/// straight, sit, then stand back up.
fn run_demo(robot: &mut Robot) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting test sequence");

    info!("Walk, looking slightly right and up");
    robot.look(HeadTarget::both(90.0, 35.0))?;
    robot.drive_for(BodyCommand::forward(0.3), 30)?;

    info!("High walk, looking from the initial position");
    robot.look(HeadTarget::both(0.0, 0.0))?;
    robot.drive_for(
        BodyCommand {
            forward: Some(0.2),
            height: Some(0.3),
            ..BodyCommand::default()
        },
        20,
    )?;

    info!("Sit");
    robot.drive_for(BodyCommand::height(-0.9), 20)?;

    info!("Stand");
    robot.drive_for(BodyCommand::neutral(), 20)?;

    info!("Test sequence complete");
    Ok(())
}

fn run_sequence(robot: &mut Robot, file: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let reader = BufReader::new(File::open(file)?);

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let step: SequenceStep = serde_json::from_str(text)
            .map_err(|e| format!("{}:{}: {}", file.display(), lineno + 1, e))?;

        match step {
            SequenceStep::Body(cmd) => robot.session.send(&cmd)?,
            SequenceStep::Look(target) => robot.look(target)?,
            SequenceStep::Pause { secs } => sleep(Duration::from_secs_f32(secs)),
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let mut robot = Robot::connect(&cli.port, cli.baudrate, !cli.no_head)?;

    match cli.command {
        Command::Demo => run_demo(&mut robot)?,
        Command::Look { turn, tilt } => robot.look(HeadTarget { turn, tilt })?,
        Command::Drive {
            behavior,
            forward,
            turn,
            height,
        } => robot.session.send(&BodyCommand {
            behavior,
            forward,
            turn,
            height,
        })?,
        Command::Sequence { file } => run_sequence(&mut robot, &file)?,
    }

    Ok(())
}
