use config::Config;

mod args;
mod config;
mod file;
mod generators;

use crate::{args::get_command, generators::generate_vol};

pub fn main() {
    let args = get_command().get_matches();

    let cfg = match Config::from_args(args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return;
        }
    };

    println!("Generating volume...");
    println!("{:?}", cfg);

    if let Err(e) = generate_vol(cfg) {
        eprintln!("Error: {e}");
    }
}
