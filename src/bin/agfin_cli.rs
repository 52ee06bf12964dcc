use agfin_core::cli::{output, run_cli};

fn main() {
    agfin_core::init();
    if let Err(err) = run_cli(std::env::args().skip(1)) {
        output::error(&err);
        std::process::exit(1);
    }
}
