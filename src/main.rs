// src/main.rs

use camus::{cli, logging, run};

fn main() {
    let args = match cli::parse() {
        Ok(args) => args,
        Err(err) => {
            // Help and version go to stdout and are not failures.
            let _ = err.print();
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("camus error: {err:#}");
        std::process::exit(1);
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("camus error: failed to start runtime: {err}");
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(run(args));
    // An interrupted startup may still be blocked in a filesystem call.
    runtime.shutdown_background();

    if let Err(err) = result {
        eprintln!("camus error: {err}");
        std::process::exit(err.exit_code());
    }
}
