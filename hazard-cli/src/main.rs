//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on standard error"
)]
fn main() {
    pretty_env_logger::init();
    if let Err(err) = hazard_cli::run() {
        eprintln!("hazard: {err}");
        std::process::exit(1);
    }
}
