use std::env;
use std::process;

use huffman_coding::cli::{self, Args};
use huffman_coding::report::Direction;
use log::{error, info};

fn main() {
    env_logger::init();

    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "decode".to_owned());

    let args = match Args::parse(args) {
        Ok(args) => args,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", cli::usage(&program));
            eprintln!("  📂 <input_file>:  lines of 0/1 bits, whitespace between codes.");
            eprintln!("  💾 <output_file>: path to write the decoded report.");
            process::exit(2);
        }
    };

    info!(
        "--- Start Decoding (tie-break: {:?}) ---",
        args.build.tie_break
    );

    let performance = match cli::run(&args, Direction::Decode) {
        Ok(performance) => performance,
        Err(e) => {
            error!("Decoding failed: {}", e);
            process::exit(1);
        }
    };

    println!(
        "\r\n✅ Decoding finished.\n\
         📂 input file:  {}\n\
         💾 output file: {}\n\
         ℹ️ lines:       {} decoded, {} failed",
        args.input.display(),
        args.output.display(),
        performance.num_successes(),
        performance.num_errors()
    );

    info!("--- End ---");
}
