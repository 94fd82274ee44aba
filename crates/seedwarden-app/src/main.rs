//! Binary entry point for the seedwarden pipelines.

use std::process;

#[tokio::main]
async fn main() {
    let exit_code = seedwarden_app::run().await;
    if exit_code != 0 {
        process::exit(exit_code);
    }
}
