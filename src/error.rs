use crate::validate::GraphIssue;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid graph JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config file: {0}")]
    Config(#[from] json5::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid chart dimensions {width}x{height}: both sides must be finite and positive")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("graph failed validation:\n{}", format_issues(.0))]
    InvalidGraph(Vec<GraphIssue>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

fn format_issues(issues: &[GraphIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {issue}"))
        .collect::<Vec<_>>()
        .join("\n")
}
