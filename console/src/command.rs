use std::path::PathBuf;

use tekx_common::report::ColumnLayout;
use tekx_model::MAX_TREND_DAYS;

/// A line typed by the user, parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Status,
    Perturb,
    Configure { a: i64, b: i64 },
    Observe { days: Option<usize> },
    Export { path: Option<PathBuf>, layout: ColumnLayout },
    Reset,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  status                  show the current reading
  configure <a> <b>       set inputs A and B (0 or 1)
  perturb                 apply one random step
  observe [days]          observe a trend (default 7 days)
  export [path] [--flat]  observe a trend and export it, an empty path cancels
  reset                   restore the initial reading
  help                    show this text
  quit                    leave";

impl std::str::FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err("empty command".into());
        };
        let args = words.collect::<Vec<_>>();

        match (name, args.as_slice()) {
            ("status", []) => Ok(Self::Status),
            ("perturb", []) => Ok(Self::Perturb),
            ("reset", []) => Ok(Self::Reset),
            ("help", []) => Ok(Self::Help),
            ("quit" | "exit", []) => Ok(Self::Quit),
            ("configure", [a, b]) => Ok(Self::Configure {
                a: parse_level_input("A", a)?,
                b: parse_level_input("B", b)?,
            }),
            ("observe", []) => Ok(Self::Observe { days: None }),
            ("observe", [days]) => parse_days(days).map(|days| Self::Observe { days: Some(days) }),
            ("export", args) => Ok(parse_export(args)),
            _ => Err(format!("unknown command: {}", line.trim())),
        }
    }
}

fn parse_level_input(channel: &str, text: &str) -> Result<i64, String> {
    text.parse()
        .map_err(|_| format!("Invalid input for {channel}. Please enter 0 or 1."))
}

fn parse_days(text: &str) -> Result<usize, String> {
    match text.parse::<usize>() {
        Ok(days) if days <= MAX_TREND_DAYS => Ok(days),
        Ok(_) => Err(format!("at most {MAX_TREND_DAYS} days can be observed")),
        Err(_) => Err(format!("invalid number of days: {text}")),
    }
}

fn parse_export(args: &[&str]) -> Command {
    let mut layout = ColumnLayout::Composite;
    let mut path = None;

    for arg in args {
        if *arg == "--flat" {
            layout = ColumnLayout::Flattened;
        } else {
            path = Some(PathBuf::from(arg));
        }
    }

    Command::Export { path, layout }
}

#[test]
fn test_parse_configure() {
    assert_eq!("configure 1 0".parse(), Ok(Command::Configure { a: 1, b: 0 }));
    // Range checks belong to the device, only the number format is checked here.
    assert_eq!("configure 2 0".parse(), Ok(Command::Configure { a: 2, b: 0 }));
    assert!("configure x 0".parse::<Command>().is_err());
    assert!("configure 1".parse::<Command>().is_err());
}

#[test]
fn test_parse_observe_and_export() {
    assert_eq!("observe".parse(), Ok(Command::Observe { days: None }));
    assert_eq!("  observe 3 ".parse(), Ok(Command::Observe { days: Some(3) }));
    assert_eq!(
        "export".parse(),
        Ok(Command::Export { path: None, layout: ColumnLayout::Composite })
    );
    assert_eq!(
        "export report.xlsx --flat".parse(),
        Ok(Command::Export {
            path: Some(PathBuf::from("report.xlsx")),
            layout: ColumnLayout::Flattened,
        })
    );
}

#[test]
fn test_parse_observe_rejects_oversized_count() {
    assert_eq!(
        "observe 36500".parse(),
        Ok(Command::Observe { days: Some(MAX_TREND_DAYS) })
    );
    assert_eq!(
        "observe 36501".parse::<Command>(),
        Err("at most 36500 days can be observed".to_string())
    );
    assert!("observe 100000000000000".parse::<Command>().is_err());
    assert!("observe 99999999999999999999999".parse::<Command>().is_err());
}

#[test]
fn test_parse_unknown() {
    assert!("".parse::<Command>().is_err());
    assert!("launch".parse::<Command>().is_err());
}
