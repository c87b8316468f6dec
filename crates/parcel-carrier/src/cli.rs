//! # Pack Command
//!
//! Argument parsing and input handling behind the `pack` binary.
//!
//! ## Limit Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Input shape                 Limits used                                │
//! │  ───────────                 ───────────                                │
//! │  [ item, ... ]           ──► carrier config (file + env, or defaults)   │
//! │  { items, maxWeight,     ──► the request's own limits                   │
//! │    maxVolume }                                                          │
//! │                                                                         │
//! │  --max-weight / --max-volume override either source.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use parcel_core::{PackRequest, PackRequestItem};
use serde::Deserialize;
use tracing::debug;

use crate::config::CarrierConfig;
use crate::error::{CarrierError, CarrierResult};

pub const USAGE: &str = "\
Parcel Quote Packer

Usage: pack [OPTIONS]

Options:
  -i, --items <PATH>       Items JSON file (default: read stdin)
  -w, --max-weight <N>     Per-parcel weight cap
  -v, --max-volume <N>     Per-parcel volume cap
  -c, --config <PATH>      Carrier config file
  -h, --help               Show this help message";

/// Options of one `pack` run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackArgs {
    pub items_path: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub max_weight: Option<f64>,
    pub max_volume: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Pack(PackArgs),
    Help,
}

/// Accepted input shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum PackInput {
    Request(PackRequest),
    Items(Vec<PackRequestItem>),
}

/// Parses arguments, program name excluded.
pub fn parse_args<I>(args: I) -> CarrierResult<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = PackArgs::default();
    let mut args = args.into_iter();

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--items" | "-i" => parsed.items_path = Some(value_of(&flag, args.next())?.into()),
            "--config" | "-c" => parsed.config_path = Some(value_of(&flag, args.next())?.into()),
            "--max-weight" | "-w" => {
                parsed.max_weight = Some(parse_number(&flag, value_of(&flag, args.next())?)?)
            }
            "--max-volume" | "-v" => {
                parsed.max_volume = Some(parse_number(&flag, value_of(&flag, args.next())?)?)
            }
            "--help" | "-h" => return Ok(Command::Help),
            other => {
                return Err(CarrierError::InvalidArgument(format!(
                    "unknown argument {}",
                    other
                )))
            }
        }
    }

    Ok(Command::Pack(parsed))
}

/// Builds the pack request from raw JSON input and the resolved limits.
pub fn build_request(raw: &str, args: &PackArgs) -> CarrierResult<PackRequest> {
    let mut request = match serde_json::from_str::<PackInput>(raw)? {
        PackInput::Request(request) => request,
        PackInput::Items(items) => match (args.max_weight, args.max_volume) {
            (Some(max_weight), Some(max_volume)) => PackRequest {
                items,
                max_weight,
                max_volume,
            },
            _ => {
                let limits =
                    CarrierConfig::load_or_default(args.config_path.clone()).parcel_limits()?;
                PackRequest {
                    items,
                    max_weight: limits.max_weight(),
                    max_volume: limits.max_volume(),
                }
            }
        },
    };

    if let Some(max_weight) = args.max_weight {
        debug!(max_weight, "Weight cap set from command line");
        request.max_weight = max_weight;
    }
    if let Some(max_volume) = args.max_volume {
        debug!(max_volume, "Volume cap set from command line");
        request.max_volume = max_volume;
    }

    Ok(request)
}

fn value_of(flag: &str, value: Option<String>) -> CarrierResult<String> {
    value.ok_or_else(|| CarrierError::InvalidArgument(format!("missing value for {}", flag)))
}

fn parse_number(flag: &str, value: String) -> CarrierResult<f64> {
    value
        .parse()
        .map_err(|_| CarrierError::InvalidArgument(format!("{} expects a number, got {}", flag, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_env;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn pack_args(list: &[&str]) -> PackArgs {
        match parse_args(args(list)).unwrap() {
            Command::Pack(parsed) => parsed,
            Command::Help => panic!("unexpected help"),
        }
    }

    #[test]
    fn test_parse_args() {
        let parsed = pack_args(&["-i", "cart.json", "--max-weight", "20", "-v", "1000.5"]);
        assert_eq!(parsed.items_path, Some(PathBuf::from("cart.json")));
        assert_eq!(parsed.max_weight, Some(20.0));
        assert_eq!(parsed.max_volume, Some(1000.5));
        assert_eq!(parsed.config_path, None);

        assert_eq!(parse_args(args(&["-w", "1", "--help"])).unwrap(), Command::Help);
        assert_eq!(pack_args(&[]), PackArgs::default());
    }

    #[test]
    fn test_parse_args_rejects_bad_input() {
        assert!(matches!(
            parse_args(args(&["--max-weight"])),
            Err(CarrierError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_args(args(&["--max-volume", "big"])),
            Err(CarrierError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_args(args(&["--verbose"])),
            Err(CarrierError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_item_array_with_flag_limits() {
        let raw = r#"[{"weight":10,"volume":5,"quantity":2},{"weight":8,"volume":3,"quantity":1}]"#;
        let parsed = pack_args(&["-w", "20", "-v", "10"]);

        let request = build_request(raw, &parsed).unwrap();
        assert_eq!(request.items.len(), 2);
        assert_eq!((request.max_weight, request.max_volume), (20.0, 10.0));

        let response = request.respond();
        assert_eq!(response.error, None);
        assert_eq!(response.parcels.len(), 2);
    }

    #[test]
    fn test_item_array_takes_limits_from_config() {
        let env = test_env::guard();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carrier.toml");
        std::fs::write(&path, "[limits]\nmax_weight = 15.0\nmax_volume = 40.0\n").unwrap();
        let config = path.to_string_lossy().to_string();
        let raw = r#"[{"weight":5,"volume":1,"quantity":1,"isSimpleProduct":false}]"#;

        let request = build_request(raw, &pack_args(&["-c", &config])).unwrap();
        assert_eq!((request.max_weight, request.max_volume), (15.0, 40.0));
        assert!(!request.items[0].is_simple_product);

        // One flag overrides only its own limit.
        let request = build_request(raw, &pack_args(&["-c", &config, "-w", "9"])).unwrap();
        assert_eq!((request.max_weight, request.max_volume), (9.0, 40.0));

        env.set("PARCEL_MAX_VOLUME", "55");
        let request = build_request(raw, &pack_args(&["-c", &config])).unwrap();
        assert_eq!(request.max_volume, 55.0);
    }

    #[test]
    fn test_full_request_limits_can_be_overridden() {
        let raw = r#"{"items":[{"weight":5,"volume":2,"quantity":3}],"maxWeight":20,"maxVolume":10}"#;

        let request = build_request(raw, &PackArgs::default()).unwrap();
        assert_eq!((request.max_weight, request.max_volume), (20.0, 10.0));

        let request = build_request(raw, &pack_args(&["--max-volume", "5"])).unwrap();
        assert_eq!((request.max_weight, request.max_volume), (20.0, 5.0));
        assert_eq!(request.respond().parcels.len(), 2);
    }

    #[test]
    fn test_unreadable_input_is_a_json_error() {
        let err = build_request(r#"{"parcels": []}"#, &PackArgs::default()).unwrap_err();
        assert!(matches!(err, CarrierError::Json(_)));
    }
}
