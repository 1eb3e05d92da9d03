use clap::Parser;
use tr_cli::cli::Cli;
use tr_cli::messages::print_error;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    // RUST_LOG still wins when set
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = tr_cli::commands::run(cli).await {
        let causes: Vec<String> = e.chain().skip(1).map(|c| c.to_string()).collect();
        let causes: Vec<&str> = causes.iter().map(String::as_str).collect();
        print_error(&e.to_string(), &causes);
        std::process::exit(1);
    }
}
