//! domq - query HTML files with CSS selectors

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use domq::{Selection, Window, bind};

#[derive(Parser)]
#[command(name = "domq")]
#[command(version, about = "Query HTML files with CSS selectors", long_about = None)]
#[command(after_help = "EXAMPLES:
    domq page.html 'ul > li'          Print matching elements
    domq page.html '.price' --text    Print their text
    domq page.html a --count          Count links
    domq page.html '#nav a' --json    Describe matches as JSON")]
struct Cli {
    /// Input HTML file
    #[arg(value_name = "INPUT")]
    input: String,

    /// CSS selector, or markup to parse
    #[arg(value_name = "SELECTOR")]
    selector: String,

    /// Print text content instead of HTML
    #[arg(short, long, conflicts_with_all = ["count", "json"])]
    text: bool,

    /// Print the number of matches
    #[arg(short, long, conflicts_with = "json")]
    count: bool,

    /// Print matches as a JSON array
    #[arg(short, long)]
    json: bool,

    /// Suppress diagnostics
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Serialize)]
struct Match {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    text: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> domq::Result<()> {
    let window = Window::open(&cli.input)?;
    let matches = bind(&window).select(cli.selector.as_str());

    if cli.count {
        println!("{}", matches.len());
    } else if cli.json {
        println!("{}", serde_json::to_string_pretty(&describe(&window, &matches))?);
    } else {
        for id in matches.node_ids() {
            let dom = window.dom();
            if cli.text {
                println!("{}", dom.text_content(id));
            } else {
                println!("{}", dom.outer_html(id));
            }
        }
    }
    Ok(())
}

fn describe(window: &Window, matches: &Selection) -> Vec<Match> {
    let dom = window.dom();
    matches
        .node_ids()
        .into_iter()
        .filter(|&id| dom.is_element(id))
        .map(|id| Match {
            tag: dom.local_name(id).unwrap_or_default().to_string(),
            id: dom.element_id(id).map(str::to_string),
            classes: dom.element_classes(id).to_vec(),
            text: dom.text_content(id).trim().to_string(),
        })
        .collect()
}
