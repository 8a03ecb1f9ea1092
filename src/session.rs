//! セッション状態（明示的に受け渡す。グローバル可変状態は持たない）

use std::path::PathBuf;

/// 1セッション分の共有コンテキスト。メニューで編集し、各モードへ渡す。
/// 結果は各モードが保持し、次の送信で破棄される（永続化はしない）。
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// ゲームタイトル（任意）
    pub game_title: Option<String>,
    /// 読み込み済みルールブック本文（PDFから抽出済み）
    pub rulebook_text: Option<String>,
    /// 読み込んだPDFのパス（表示用）
    pub rulebook_path: Option<PathBuf>,
}

impl Session {
    /// タイトルの表示用文字列
    pub fn title_label(&self) -> &str {
        self.game_title.as_deref().unwrap_or("(未設定)")
    }

    /// ルールブックの読み込み状態ラベル
    pub fn rulebook_label(&self) -> String {
        match (&self.rulebook_path, &self.rulebook_text) {
            (Some(p), Some(t)) => format!("{} ({} chars)", p.display(), t.chars().count()),
            _ => "(未読込)".to_string(),
        }
    }

    /// ルールブックが読み込まれているか
    pub fn has_rulebook(&self) -> bool {
        self.rulebook_text.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_reflect_state() {
        let mut s = Session::default();
        assert_eq!(s.title_label(), "(未設定)");
        assert_eq!(s.rulebook_label(), "(未読込)");
        assert!(!s.has_rulebook());

        s.game_title = Some("Terraforming Mars".into());
        s.rulebook_text = Some("setup gameplay".into());
        s.rulebook_path = Some(PathBuf::from("rules.pdf"));
        assert_eq!(s.title_label(), "Terraforming Mars");
        assert!(s.rulebook_label().contains("rules.pdf"));
        assert!(s.has_rulebook());
    }
}
