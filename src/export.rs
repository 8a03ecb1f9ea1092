//! Markdown export ("divination scrolls") for analysis and simplification
//! results. Written next to the working directory; the path is echoed in the
//! UI status line.

use crate::analysis::{AnalysisResult, ScoreDimension, SimplificationSet, SimplifyMode};
use crate::error::{OracleError, OracleResult};
use std::path::{Path, PathBuf};

/// Render an analysis result as Markdown.
pub fn analysis_markdown(res: &AnalysisResult, game_title: Option<&str>) -> String {
    let game = game_title.unwrap_or("Unknown Game");
    let mut md = format!("# Oracle Divination: {game}\n\n");
    md.push_str(&format!("## Risk: {}\n", res.risk.label()));
    if res.degraded {
        md.push_str("*(degraded result: the Oracle's response could not be parsed)*\n");
    }
    if !res.risk_note.is_empty() {
        md.push_str(&format!("**Risk Explanation:** {}\n\n", res.risk_note));
    }
    if !res.summary.is_empty() {
        md.push_str(&format!("**Summary:** {}\n\n", res.summary));
    }
    md.push_str("### Impact Scores\n");
    for dim in ScoreDimension::ALL {
        md.push_str(&format!("- {}: {}/10\n", dim.label(), res.score(dim)));
    }
    if !res.deep_dive.is_empty() {
        md.push_str("\n### Deep Dive\n");
        for finding in &res.deep_dive {
            md.push_str(&format!("- {finding}\n"));
        }
    }
    if !res.suggestions.is_empty() {
        md.push_str("\n### Refinements\n");
        for s in &res.suggestions {
            md.push_str(&format!("- **{}** — {}\n", s.rule, s.explanation));
        }
    }
    md
}

/// Render a simplification set as Markdown.
pub fn simplification_markdown(set: &SimplificationSet, game_title: Option<&str>) -> String {
    let game = game_title.unwrap_or("Unknown Game");
    let mut md = format!("# Rule Simplification: {game}\n\n");
    if !set.summary.is_empty() {
        md.push_str(&format!("**Overview:** {}\n\n", set.summary));
    }
    for mode in SimplifyMode::ALL {
        md.push_str(&format!("## {} Rules\n{}\n\n", mode.label(), set.text_for(mode)));
    }
    md
}

/// Write `markdown` to `<stem>_<game>.md` under `dir` and return the path.
pub fn write_scroll(
    dir: &Path,
    stem: &str,
    game_title: Option<&str>,
    markdown: &str,
) -> OracleResult<PathBuf> {
    let game = game_title
        .unwrap_or("game")
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>();
    let path = dir.join(format!("{stem}_{game}.md"));
    std::fs::write(&path, markdown)
        .map_err(|e| OracleError::Input(format!("could not write {}: {e}", path.display())))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisResult, RiskLevel, Suggestion};

    #[test]
    fn analysis_markdown_lists_all_dimensions() {
        let mut res = AnalysisResult::degraded();
        res.degraded = false;
        res.risk = RiskLevel::Risky;
        res.summary = "Moderate impact.".into();
        res.suggestions = vec![Suggestion { rule: "Once per session".into(), explanation: "tension".into() }];
        let md = analysis_markdown(&res, Some("Catan"));
        assert!(md.contains("# Oracle Divination: Catan"));
        assert!(md.contains("Risk: Risky"));
        for label in ["Balance", "Complexity", "Fun Factor", "Pacing", "Clarity"] {
            assert!(md.contains(label));
        }
        assert!(md.contains("Once per session"));
    }

    #[test]
    fn degraded_marker_is_visible_in_export() {
        let md = analysis_markdown(&AnalysisResult::degraded(), None);
        assert!(md.contains("degraded result"));
        assert!(md.contains("analysis unavailable"));
    }

    #[test]
    fn scroll_filename_is_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_scroll(dir.path(), "oracle_results", Some("D&D 5e"), "# hi").unwrap();
        assert!(path.ends_with("oracle_results_D_D_5e.md"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# hi");
    }
}
