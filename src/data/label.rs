use crate::error::{PipelineError, Result};

/// Pick the display label for one series.
///
/// A non-empty override wins; otherwise the label read from the data is used.
pub fn resolve(explicit: Option<&str>, default_label: &str) -> String {
    match explicit {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => default_label.to_string(),
    }
}

/// Line up a parallel list of label overrides with `sources` data files.
///
/// With no overrides every source falls back to its own default label. A list
/// of the wrong length is rejected as a whole.
pub fn resolve_batch(overrides: Option<&[String]>, sources: usize) -> Result<Vec<Option<String>>> {
    match overrides {
        None => Ok(vec![None; sources]),
        Some(labels) if labels.len() != sources => Err(PipelineError::LabelCountMismatch {
            labels: labels.len(),
            sources,
        }),
        Some(labels) => Ok(labels.iter().map(|l| Some(l.clone())).collect()),
    }
}

/// Title (or y-axis text) for a whole plot: the explicit value if given,
/// else the default label of the first source.
pub fn resolve_title(explicit: Option<&str>, first_default: Option<&str>) -> String {
    resolve(explicit, first_default.unwrap_or_default())
}

/// Split a comma-delimited command-line list, trimming each entry.
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',').map(|s| s.trim().to_string()).collect()
}
