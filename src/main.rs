use anyhow::Result;
use log::{error, info};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use shaon::day::detect_day;
use shaon::{Config, Extraction, TimeExtractor};

fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("No .env file loaded: {}", e);
    }

    let config = Config::load()?;
    shaon::init_logger(&config.logging.level);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("serve") => {
            info!("Starting shaon webhook server");
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(shaon::api_server::start_api_server(&config))
        }
        Some("extract") => {
            let extractor = TimeExtractor::from_config(&config.extractor);
            println!("{}", extractor.extract(&args[1..].join(" ")));
            Ok(())
        }
        Some("help") | Some("--help") => {
            print_help();
            Ok(())
        }
        Some(other) => {
            error!("Unknown command: {}", other);
            print_help();
            Ok(())
        }
        None => run_repl(&config),
    }
}

fn print_help() {
    println!("Usage:");
    println!("  shaon                 - Interactive mode, one message per line");
    println!("  shaon extract <text>  - Print the time found in <text>");
    println!("  shaon serve           - Run the WhatsApp webhook server");
}

fn run_repl(config: &Config) -> Result<()> {
    let extractor = TimeExtractor::from_config(&config.extractor);
    let mut rl = DefaultEditor::new()?;
    println!("Type a Hebrew message to see the time it mentions. CTRL-D to exit.");

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                match extractor.extract(&line) {
                    Extraction::Time(time) => match detect_day(&line) {
                        Some(day) => println!("{} ({})", time, day.label()),
                        None => println!("{}", time),
                    },
                    Extraction::NoMatch => println!("no match"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
