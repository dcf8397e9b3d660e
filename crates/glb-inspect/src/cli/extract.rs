use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use crate::cli::{ExtractArgs, GlobalArgs};
use crate::config::AppConfig;

pub fn execute(global: &GlobalArgs, args: ExtractArgs) -> anyhow::Result<()> {
    let cfg = AppConfig::load_or_default()?;
    let start = global.start_offset(&cfg);

    let file = File::open(&args.path)
        .with_context(|| format!("failed to open {}", args.path.display()))?;
    let mut reader = BufReader::new(file);

    let payload = glb_parser::read_binary_chunk(&mut reader, args.index, start).with_context(|| {
        format!(
            "failed to extract binary chunk {} from {}",
            args.index,
            args.path.display()
        )
    })?;

    let output = args
        .output
        .unwrap_or_else(|| default_output(&args.path, args.index, cfg.output_dir.as_deref()));
    std::fs::write(&output, &payload)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        index = args.index,
        bytes = payload.len(),
        output = %output.display(),
        "binary chunk extracted"
    );
    println!("Wrote {} bytes to {}", payload.len(), output.display());
    Ok(())
}

/// `<stem>.bin<index>` in `output_dir`, or next to the input file.
fn default_output(input: &Path, index: usize, output_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{stem}.bin{index}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_sits_next_to_input() {
        let out = default_output(Path::new("models/box.glb"), 0, None);
        assert_eq!(out, PathBuf::from("models/box.bin0"));
    }

    #[test]
    fn default_output_honours_configured_dir() {
        let out = default_output(Path::new("models/box.glb"), 2, Some(Path::new("/tmp/chunks")));
        assert_eq!(out, PathBuf::from("/tmp/chunks/box.bin2"));
    }
}
