//! Simple CLI that reads markup from stdin, resolves a selector chain and
//! outputs the matches as JSON to stdout.
//!
//! Usage: `select_stdin [--keep <tags>] [--replace <from>=<to>] [--config <file.json>] <selector[=index]>...`
//!
//! Set `RUST_LOG=debug` to see which chain step failed.

use rs_dom_chain::{Dom, SelectorChain, TextOptions};
use serde::Serialize;
use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct Match {
    name: String,
    text: String,
    html: String,
}

#[derive(Serialize)]
struct Output {
    failed: Option<String>,
    matches: Vec<Match>,
}

struct Args {
    options: TextOptions,
    chain: SelectorChain,
}

/// `"li=-1"` is step `li` at index -1; an index that does not parse keeps
/// the whole argument as the selector (`[a=b]`).
fn parse_step(arg: &str) -> (String, Option<isize>) {
    match arg.rsplit_once('=') {
        Some((selector, index)) if !selector.is_empty() => match index.parse::<isize>() {
            Ok(index) => (selector.to_string(), Some(index)),
            Err(_) => (arg.to_string(), None),
        },
        _ => (arg.to_string(), None),
    }
}

fn parse_args(raw: impl Iterator<Item = String>) -> Result<Args, Box<dyn Error>> {
    let mut options = TextOptions::default();
    let mut chain = SelectorChain::new();
    let mut raw = raw;

    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--config" => {
                let path = raw.next().ok_or("--config needs a file")?;
                let file_options: TextOptions = serde_json::from_str(&fs::read_to_string(path)?)?;
                options.keep_tags.extend(file_options.keep_tags);
                options.replace_tags.extend(file_options.replace_tags);
            }
            "--keep" => {
                let tags = raw.next().ok_or("--keep needs a tag list")?;
                options.keep_tags.extend(TextOptions::keep(&tags).keep_tags);
            }
            "--replace" => {
                let pair = raw.next().ok_or("--replace needs <from>=<to>")?;
                let (from, to) = pair.split_once('=').ok_or("--replace needs <from>=<to>")?;
                options = options.with_replace(from, to.replace("\\n", "\n"));
            }
            _ => {
                let (selector, index) = parse_step(&arg);
                chain.push(selector, index);
            }
        }
    }

    if chain.is_empty() {
        return Err("no selector given".into());
    }
    Ok(Args { options, chain })
}

fn run() -> Result<Output, Box<dyn Error>> {
    let args = parse_args(env::args().skip(1))?;

    let mut markup = Vec::new();
    io::stdin().read_to_end(&mut markup)?;

    let dom = Dom::from_bytes(&markup)?;
    let resolution = dom.lister(args.chain, None)?;

    let matches = resolution
        .value
        .iter()
        .map(|node| Match {
            name: node.qualified_name(),
            text: node.text(&args.options),
            html: node.outer_markup(),
        })
        .collect();

    Ok(Output {
        failed: resolution.failed,
        matches,
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(output) => {
            println!("{}", serde_json::to_string(&output).unwrap_or_default());
        }
        Err(e) => {
            eprintln!("select_stdin: {e}");
            std::process::exit(1);
        }
    }
}
