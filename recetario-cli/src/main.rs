//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    env_logger::init();
    if let Err(err) = recetario_cli::run() {
        eprintln!("recetario: {err}");
        std::process::exit(1);
    }
}
