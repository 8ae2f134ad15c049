use std::process;

use service_record::config::Config;
use service_record::storage::Storage;
use service_record::{cli, logging};

fn main() {
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    if let Err(e) = logging::init_tracing(&config.log) {
        eprintln!("{e}");
        process::exit(1);
    }

    let root = config
        .storage_root
        .clone()
        .or_else(Storage::default_root)
        .unwrap_or_else(|| {
            eprintln!("Could not determine home directory.");
            process::exit(1);
        });

    let storage = match Storage::new(root) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to initialize storage: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = cli::run(&config, &storage) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
