//! cw - Main entry point
//!
//! Creates a window with the given background color and logs its events

use std::env;
use std::path::Path;
use std::process;

use cw::{parse_color, Argb, ColorError};

#[derive(Debug, PartialEq)]
enum ArgsError {
    /// Wrong number of arguments
    Usage,
    /// The color argument did not parse
    InvalidColor(String, ColorError),
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [color]", program);
}

fn program_name(args: &[String]) -> String {
    args.first()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cw".to_string())
}

/// Background color from the arguments following the program name
fn parse_args(args: &[String]) -> Result<Argb, ArgsError> {
    match args {
        [] => Ok(Argb::OPAQUE_WHITE),
        [color] => {
            parse_color(color).map_err(|err| ArgsError::InvalidColor(color.clone(), err))
        }
        _ => Err(ArgsError::Usage),
    }
}

#[cfg(feature = "backend-x11")]
fn run(background: Argb) -> i32 {
    use cw::client::{Client, ClientConfig};
    use cw::transport::X11Transport;

    let transport = match X11Transport::connect(None) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        }
    };

    let config = ClientConfig::default().with_background(background);
    let mut client = Client::new(transport, std::io::stderr(), config);

    if let Err(e) = client.setup() {
        eprintln!("Error: {}", e);
        return 1;
    }

    match client.run() {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

#[cfg(not(feature = "backend-x11"))]
fn run(_background: Argb) -> i32 {
    eprintln!("Error: No backends available!");
    eprintln!("Please compile with the backend-x11 feature enabled.");
    1
}

fn main() {
    // Initialize logger; report lines are not log records
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let program = program_name(&args);

    let background = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(color) => color,
        Err(ArgsError::InvalidColor(arg, err)) => {
            log::debug!("{:?}: {}", arg, err);
            eprintln!("Invalid color: {}", arg);
            process::exit(1);
        }
        Err(ArgsError::Usage) => {
            print_usage(&program);
            process::exit(1);
        }
    };

    log::info!("cw v{}, background {}", cw::VERSION, background);

    process::exit(run(background));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_arguments_default_white() {
        assert_eq!(parse_args(&[]), Ok(Argb(0xffff_ffff)));
    }

    #[test]
    fn test_single_color_argument() {
        assert_eq!(parse_args(&strings(&["#0abc"])), Ok(Argb(0x00aa_bbcc)));
    }

    #[test]
    fn test_invalid_color_argument() {
        assert_eq!(
            parse_args(&strings(&["zzz"])),
            Err(ArgsError::InvalidColor(
                "zzz".to_string(),
                ColorError::InvalidDigit("zzz".to_string())
            ))
        );
    }

    #[test]
    fn test_too_many_arguments() {
        assert_eq!(parse_args(&strings(&["fff", "000"])), Err(ArgsError::Usage));
    }

    #[test]
    fn test_program_name_is_basename() {
        assert_eq!(program_name(&strings(&["/usr/local/bin/cw"])), "cw");
        assert_eq!(program_name(&strings(&["./target/debug/mywin"])), "mywin");
        assert_eq!(program_name(&[]), "cw");
    }
}
