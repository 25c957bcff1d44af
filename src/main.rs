use std::process;

use xkits::cli::{commands, output};
use xkits::config::Settings;
use xkits::interrupt;

fn main() {
    if let Err(e) = interrupt::install() {
        output::warning(&format!("cannot install interrupt handler: {e}"));
    }
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            output::error(&e);
            output::warning("falling back to default settings");
            Settings::default()
        }
    };
    process::exit(commands::run(std::env::args_os().skip(1), settings));
}
