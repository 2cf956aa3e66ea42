mod command;

use std::io::{BufRead, Write};

use command::{Command, HELP};
use tekx_common::report::{self, ExportOutcome};
use tekx_common::SharedDevice;
use tekx_model::{DeviceReading, DeviceState, SimulatorConfig};

/// Our App struct that holds the simulated device and talks to the user.
///
/// It stands in for a device manager window: every line read from stdin is one button press or
/// form submission, and the answer is written to stdout.
struct App<W: Write> {
    device: SharedDevice,
    out: W,
}

impl<W: Write> App<W> {
    /// Create a new App with a device built from the shipped configuration.
    fn new(out: W) -> anyhow::Result<Self> {
        let config = SimulatorConfig::embedded()?;

        Ok(Self {
            device: SharedDevice::new(DeviceState::from_config(config)),
            out,
        })
    }

    /// Read commands from `input` until it ends or the user quits.
    fn run(&mut self, input: impl BufRead) -> anyhow::Result<()> {
        writeln!(self.out, "TekX Device Manager, type `help` for commands")?;
        self.show_status()?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => self.handle(command)?,
                Err(message) => writeln!(self.out, "Error: {message}")?,
            }
        }

        Ok(())
    }

    fn handle(&mut self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Status => self.show_status()?,
            Command::Perturb => {
                self.device.perturb();
                self.show_status()?;
            }
            Command::Reset => {
                self.device.reset();
                self.show_status()?;
            }
            Command::Configure { a, b } => match self.device.configure(a, b) {
                Ok(()) => {
                    writeln!(self.out, "A & B settings configured successfully.")?;
                    self.show_status()?;
                }
                Err(e) => writeln!(self.out, "Error: {e}")?,
            },
            Command::Observe { days } => {
                let trend = match days {
                    Some(days) => self.device.observe_trend(days),
                    None => self.device.observe_week(),
                };
                for record in &trend {
                    writeln!(self.out, "{record}")?;
                }
                writeln!(self.out, "Trends observed successfully.")?;
            }
            Command::Export { path, layout } => {
                let rows = report::to_rows(&self.device.observe_week());

                match report::write_spreadsheet_with(&rows, path.as_deref(), layout) {
                    Ok(ExportOutcome::Written(path)) => {
                        writeln!(self.out, "XL report exported successfully to: {}", path.display())?
                    }
                    Ok(ExportOutcome::Canceled) => writeln!(self.out, "Export canceled.")?,
                    Err(e) => writeln!(self.out, "Error: {e}")?,
                }
            }
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => {}
        }

        Ok(())
    }

    fn show_status(&mut self) -> anyhow::Result<()> {
        let reading: DeviceReading = self.device.current();

        writeln!(
            self.out,
            "[{}] A: {}  B: {}  DO1: {}  DO2: {}  Temperature: {:.2} °C / {:.2} °F",
            chrono::Local::now().format("%H:%M:%S"),
            reading.a,
            reading.b,
            reading.do1,
            reading.do2,
            reading.tx,
            reading.tx_fahrenheit(),
        )?;
        Ok(())
    }
}

/// A minimal main function that initializes the App and runs it.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = App::new(std::io::stdout().lock())?;

    app.run(std::io::stdin().lock())
}

#[test]
fn test_session_transcript() {
    let input = "status\nconfigure 1 1\nconfigure 1 5\nobserve 3\nobserve 100000000000000\nexport\nlaunch\nquit\nstatus\n";
    let mut out = Vec::new();

    App::new(&mut out).unwrap().run(input.as_bytes()).unwrap();

    let transcript = String::from_utf8(out).unwrap();
    assert!(transcript.contains("A & B settings configured successfully."));
    assert!(transcript.contains("Error: invalid value 5 for B, enter 0 or 1"));
    assert_eq!(transcript.matches("Date: ").count(), 3);
    assert!(transcript.contains("Error: at most 36500 days can be observed"));
    assert!(transcript.contains("Export canceled."));
    assert!(transcript.contains("Error: unknown command: launch"));
    // Nothing after `quit` is processed: one banner status, one explicit, one after configure.
    assert_eq!(transcript.matches("Temperature:").count(), 3);
}
