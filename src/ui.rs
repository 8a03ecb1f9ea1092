//! UI共通部品（リスクバッジ、スコアバー、エラー行など）

use crate::analysis::{AnalysisResult, RiskLevel, ScoreDimension, SCORE_MAX};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

/// リスクレベルに応じた表示色
pub fn risk_color(risk: RiskLevel) -> Color {
    match risk {
        RiskLevel::Safe => Color::Green,
        RiskLevel::Risky => Color::Yellow,
        RiskLevel::GameBreaking => Color::Red,
    }
}

/// リスクバッジ行を構築（劣化結果には unverified マーカーを付ける）
pub fn risk_badge(res: &AnalysisResult) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!(" {} ", res.risk.label()),
        Style::default().fg(Color::Black).bg(risk_color(res.risk)),
    )];
    if res.degraded {
        spans.push(Span::raw(" "));
        spans.push(Span::styled("(unverified)", Style::default().fg(Color::DarkGray)));
    }
    if !res.risk_note.is_empty() {
        spans.push(Span::raw(format!(" {}", res.risk_note)));
    }
    Line::from(spans)
}

/// 1次元分のスコアバー（例: "Fun Factor ████████░░  8.0"）
pub fn score_bar(dim: ScoreDimension, score: f64) -> Line<'static> {
    let filled = score.round().clamp(0.0, SCORE_MAX) as usize;
    let empty = SCORE_MAX as usize - filled;
    Line::from(vec![
        Span::raw(format!("{:<11}", dim.label())),
        Span::styled("█".repeat(filled), Style::default().fg(Color::Cyan)),
        Span::styled("░".repeat(empty), Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {score:>4.1}")),
    ])
}

/// 5次元すべてのスコアバー（レーダーチャート相当の表示）
pub fn score_chart(res: &AnalysisResult) -> Vec<Line<'static>> {
    ScoreDimension::ALL
        .iter()
        .map(|dim| score_bar(*dim, res.score(*dim)))
        .collect()
}

/// 枠付きの段落を描画するヘルパー
pub fn render_block_paragraph(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>) {
    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(widget, area);
}

/// インラインエラー行（失敗を明示表示し、古い結果は見せない）
pub fn error_line(message: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("⚠ {message}"),
        Style::default().fg(Color::Red),
    ))
}

/// 処理中スピナー行
pub fn pending_line(label: &str) -> Line<'static> {
    Line::from(label.to_string().italic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_bar_is_always_ten_cells() {
        for score in [0.0, 3.3, 5.0, 9.6, 10.0] {
            let line = score_bar(ScoreDimension::Balance, score);
            let bar: String = line.spans[1].content.to_string() + &line.spans[2].content;
            assert_eq!(bar.chars().count(), 10, "score {score}");
        }
    }

    #[test]
    fn risk_badge_marks_degraded_results() {
        let res = AnalysisResult::degraded();
        let badge = risk_badge(&res);
        let text: String = badge.spans.iter().map(|s| s.content.to_string()).collect();
        assert!(text.contains("Safe"));
        assert!(text.contains("unverified"));
    }

    #[test]
    fn chart_has_five_bars() {
        assert_eq!(score_chart(&AnalysisResult::degraded()).len(), 5);
    }
}
