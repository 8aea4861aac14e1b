use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

argslot::define! {
    /// This program will print a message a number of times.
    ///
    /// Here are the possible settings:
    struct Args {
        /// The message to print.
        msg: String = ("msg", "m", required = true),
        /// The number of times the message is printed.
        times: u32 = ("times", "t", default = 1),
        /// Print line numbers for the message.
        num: bool = ("num", "n"),
    }
}

fn main() -> anyhow::Result<ExitCode> {
    // Parser diagnostics are shown with `RUST_LOG=argslot=trace`.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = Args::new()?;

    match args.args() {
        argslot::Parsed::Matched { .. } => {}
        argslot::Parsed::Help => {
            print!("{}", args.help());
            return Ok(ExitCode::SUCCESS);
        }
        argslot::Parsed::Failed { .. } => {
            println!("{}\n\n{}", args.error_message(), args.help());
            return Ok(ExitCode::FAILURE);
        }
    }

    for n in 0..args.times.get() {
        if args.num.get() {
            print!("{:>3}: ", n + 1);
        }

        args.msg.with(|msg| println!("{}", msg));
    }

    Ok(ExitCode::SUCCESS)
}
