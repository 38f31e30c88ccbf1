use std::env;
use std::process;

use huffman_coding::cli::{self, Args};
use huffman_coding::report::Direction;
use log::{error, info};

fn main() {
    env_logger::init();

    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "encode".to_owned());

    let args = match Args::parse(args) {
        Ok(args) => args,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", cli::usage(&program));
            process::exit(2);
        }
    };

    info!(
        "--- Start Encoding (memoize: {}, tie-break: {:?}) ---",
        args.build.memoize, args.build.tie_break
    );

    let performance = match cli::run(&args, Direction::Encode) {
        Ok(performance) => performance,
        Err(e) => {
            error!("Encoding failed: {}", e);
            process::exit(1);
        }
    };

    println!(
        "\r\n✅ Encoding finished.\n\
         📂  Input:     {}\n\
         💾  Output:    {}\n\
         ℹ️  Lines:     {} encoded, {} failed",
        args.input.display(),
        args.output.display(),
        performance.num_successes(),
        performance.num_errors()
    );

    info!("--- End ---");
}
