//! Entry point for the `kidspot` command-line interface.
#![forbid(unsafe_code)]

#[expect(clippy::print_stderr, reason = "fatal CLI errors are reported on stderr")]
fn main() {
    if let Err(err) = kidspot_cli::run() {
        eprintln!("kidspot: {err}");
        std::process::exit(1);
    }
}
