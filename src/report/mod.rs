//! Terminal summary of a snapshot.
//!
//! Formatting lives here so the extraction code stays free of presentation.

use crate::app::pipeline::OIL_KEY;
use crate::data::INDICATORS;
use crate::domain::{Observation, Snapshot};

/// Human label for an indicator key, falling back to the key itself.
pub fn label_for(key: &str) -> &str {
    if key == OIL_KEY {
        return "Petróleo (FRED)";
    }
    INDICATORS
        .iter()
        .find(|spec| spec.key == key)
        .map(|spec| spec.label)
        .unwrap_or(key)
}

/// Format the snapshot as a short multi-line summary.
pub fn format_snapshot_summary(snapshot: &Snapshot) -> String {
    let mut out = String::new();

    out.push_str("=== indicadores - snapshot ===\n");
    out.push_str(&format!("Generated (UTC): {}\n", snapshot.generated_at_utc));
    out.push('\n');

    let width = snapshot
        .indicators
        .iter()
        .map(|(key, _)| label_for(key).chars().count())
        .max()
        .unwrap_or(0);

    for (key, value) in &snapshot.indicators {
        let label = label_for(key);
        let pad = width.saturating_sub(label.chars().count());
        out.push_str(&format!(
            "{label}{}  {}\n",
            " ".repeat(pad),
            format_observation(value.latest())
        ));

        let window = value.window();
        if window.len() > 1 {
            let values: Vec<String> = window.iter().map(|o| o.valor.to_string()).collect();
            out.push_str(&format!(
                "{}  last {}: {}\n",
                " ".repeat(width),
                window.len(),
                values.join(", ")
            ));
        }
    }

    if !snapshot.sources.is_empty() {
        out.push_str("\nSources:\n");
        for (key, source) in &snapshot.sources {
            out.push_str(&format!("  {key}: {source}\n"));
        }
    }

    out.trim_end().to_string()
}

fn format_observation(obs: &Observation) -> String {
    format!("{} ({})", obs.valor, obs.fecha_display)
}
