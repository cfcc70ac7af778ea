use std::process;

fn main() {
    if let Err(e) = migrator::run() {
        eprintln!("Error: {e:?}");
        process::exit(1);
    }
}
