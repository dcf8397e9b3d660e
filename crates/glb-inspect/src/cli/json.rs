use std::fs::File;
use std::io::BufReader;

use anyhow::Context;
use glb_parser::StreamSource;
use tracing::debug;

use crate::cli::{GlobalArgs, JsonArgs};
use crate::config::AppConfig;

pub fn execute(global: &GlobalArgs, args: JsonArgs) -> anyhow::Result<()> {
    let cfg = AppConfig::load_or_default()?;
    let start = global.start_offset(&cfg);

    let file = File::open(&args.path)
        .with_context(|| format!("failed to open {}", args.path.display()))?;
    let mut reader = BufReader::new(file);

    if args.compact || !cfg.pretty {
        let json = glb_parser::read_json_text(&mut StreamSource::new(&mut reader), start)
            .with_context(|| format!("failed to read JSON from {}", args.path.display()))?;
        debug!(is_glb = json.is_glb, bytes = json.text.len(), "read JSON text");
        println!("{}", json.text);
    } else {
        let parsed = glb_parser::parse_reader::<serde_json::Value, _>(&mut reader, start)
            .with_context(|| format!("failed to parse JSON from {}", args.path.display()))?;
        debug!(is_glb = parsed.is_glb, "parsed JSON document");
        println!("{}", serde_json::to_string_pretty(&parsed.document)?);
    }
    Ok(())
}
