use std::io::Read;

use anyhow::Context;
use misinfo_risk_lib::init_console_only_logging;
use misinfo_risk_lib::services::detection::{analyze, AssistantAnalyzer};
use misinfo_risk_lib::services::AppConfig;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage:\n  score_text [--assistant] [--out <json_path>] [text ...]\n\nNotes:\n  - Without text arguments the text is read from stdin.\n  - `--assistant` uses the text-generation assistant (needs OPENAI_API_KEY).";

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

/// Positional arguments, with flags and their values removed
fn positional_text(args: &[String]) -> String {
    let mut words = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        match arg.as_str() {
            "--out" => skip_next = true,
            "--assistant" => {}
            _ => words.push(arg.as_str()),
        }
    }
    words.join(" ")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        eprintln!("{}", USAGE);
        return Ok(());
    }

    init_console_only_logging(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    );

    let use_assistant = has_flag(&args, "--assistant");
    let out_path = parse_arg_value(&args, "--out");

    let mut text = positional_text(&args);
    if text.trim().is_empty() {
        std::io::stdin()
            .read_to_string(&mut text)
            .context("read stdin failed")?;
    }

    let json = if use_assistant {
        let config = AppConfig::resolve().map_err(anyhow::Error::msg)?;
        let analyzer = AssistantAnalyzer::from_config(&config.assistant);
        let outcome = analyzer.analyze(&text).await?;
        serde_json::to_string_pretty(&outcome)?
    } else {
        serde_json::to_string_pretty(&analyze(&text)?)?
    };

    match out_path {
        Some(path) => {
            std::fs::write(&path, &json).with_context(|| format!("write {} failed", path))?;
            eprintln!("Wrote: {}", path);
        }
        None => println!("{}", json),
    }

    Ok(())
}
