use std::process::ExitCode;

use gltut_client::{demos::BlendPulse, driver};

fn main() -> ExitCode {
    driver::launch(BlendPulse::new)
}
