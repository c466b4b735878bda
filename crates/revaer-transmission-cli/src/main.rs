//! `revaer-tr` entrypoint.

use std::process;

fn main() {
    let exit_code = revaer_transmission_cli::run();
    if exit_code != 0 {
        process::exit(exit_code);
    }
}
