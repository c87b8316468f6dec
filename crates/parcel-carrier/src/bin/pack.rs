//! Command-line packer.
//!
//! Reads cart items as JSON and prints the parcels they pack into.
//!
//! ## Input
//! ```text
//! [ { "weight": 2.5, "volume": 100, "quantity": 3, "isSimpleProduct": true }, ... ]
//!
//! or a full request:
//!
//! { "items": [...], "maxWeight": 20, "maxVolume": 1000 }
//! ```
//!
//! ## Usage
//! ```bash
//! pack --items cart.json
//! cat cart.json | pack --max-weight 20 --max-volume 1000
//! ```

use std::env;
use std::fs;
use std::io::{self, Read};

use parcel_carrier::cli::{build_request, parse_args, Command, USAGE};
use parcel_carrier::init_tracing;
use parcel_core::PackResponse;
use tracing::{debug, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = match parse_args(env::args().skip(1))? {
        Command::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        Command::Pack(args) => args,
    };

    let raw = match &args.items_path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let request = build_request(&raw, &args)?;
    debug!(
        lines = request.items.len(),
        max_weight = request.max_weight,
        max_volume = request.max_volume,
        "Packing"
    );

    let response: PackResponse = request.respond();
    match &response.error {
        Some(e) => info!(error = %e, "Cart could not be packed"),
        None => info!(parcels = response.parcels.len(), "Cart packed"),
    }

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
