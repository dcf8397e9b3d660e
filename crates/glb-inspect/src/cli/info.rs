use anyhow::Context;
use glb_parser::InspectReport;

use crate::cli::{GlobalArgs, InfoArgs};
use crate::config::AppConfig;

pub fn execute(global: &GlobalArgs, args: InfoArgs) -> anyhow::Result<()> {
    let cfg = AppConfig::load_or_default()?;
    let start = global.start_offset(&cfg);

    let report = glb_parser::inspect_file(&args.path, start)
        .with_context(|| format!("failed to inspect {}", args.path.display()))?;

    if args.json {
        let out = if cfg.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        println!("{out}");
    } else {
        print!("{}", render_table(&report));
    }
    Ok(())
}

fn render_table(report: &InspectReport) -> String {
    let mut out = format!(
        "{} ({})\n",
        report.file_path.display(),
        human_size(report.file_size)
    );

    let Some(header) = report.header else {
        out.push_str("Not a GLB container (bare JSON document).\n");
        return out;
    };

    out.push_str(&format!(
        "glTF version {}, declared length {} bytes\n\n",
        header.version, header.total_length
    ));
    out.push_str(&format!(
        "{:<4} {:<12} {:<12} {:<12}\n",
        "#", "Type", "Offset", "Length"
    ));
    out.push_str(&format!("{}\n", "-".repeat(42)));
    for (i, chunk) in report.chunks.iter().enumerate() {
        out.push_str(&format!(
            "{:<4} {:<12} {:<12} {:<12}\n",
            i,
            chunk.kind.name(),
            chunk.start_offset,
            chunk.payload_length
        ));
    }
    out.push_str(&format!("\n{} chunk(s) found.\n", report.chunks.len()));
    out
}

fn human_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB"];
    let mut size = bytes as f64;
    for &unit in UNITS {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} PiB")
}
