use std::process::ExitCode;

use gltut_client::{demos::OffscreenBlur, driver};

fn main() -> ExitCode {
    driver::launch(OffscreenBlur::new)
}
