use serde::{Deserialize, Serialize};

use crate::*;

/// How long a mismatched pair stays visible before both pieces are turned back.
pub const MISMATCH_DELAY_MS: u32 = 1000;
/// Duration of the completion fade of pieces, banner and message.
pub const FADE_MS: u32 = 500;
/// Time between the completion signal and leaving for the results page.
pub const REDIRECT_DELAY_MS: u32 = 5000;
/// Opacity the pieces fade to once the game is completed.
pub const COMPLETED_PIECE_ALPHA: f64 = 0.2;

/// Sound effects played on click outcomes
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Win,
    Match,
    Miss,
}

fn default_time_text() -> String {
    "Time".to_string()
}

fn default_round_text() -> String {
    "Round".to_string()
}

fn default_splash_text() -> String {
    "Well done!".to_string()
}

fn default_api_url() -> String {
    contest_url(API_PAGE)
}

/// Everything the page hands to the game when it boots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    pub name: String,
    pub rows: Coord,
    pub cols: Coord,
    /// Image URL for each card id
    pub pieces: Vec<String>,
    #[serde(rename = "backPiece")]
    pub back_piece: String,
    pub font_url: String,
    pub font_family: String,
    pub audio_win: String,
    pub audio_hit: String,
    pub audio_miss: String,
    #[serde(alias = "csrfToken")]
    pub csrf_token: String,
    #[serde(default = "default_time_text")]
    pub time_text: String,
    #[serde(default = "default_round_text")]
    pub round_text: String,
    #[serde(default = "default_splash_text")]
    pub splash_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_score: Option<serde_json::Value>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl GameData {
    pub fn from_json(text: &str) -> Result<Self> {
        let data: Self =
            serde_json::from_str(text).map_err(|err| GameError::InvalidGameData(err.to_string()))?;
        data.validate()?;
        Ok(data)
    }

    fn validate(&self) -> Result<()> {
        BoardLayout::new(self.rows, self.cols)?;
        if self.pieces.is_empty() {
            return Err(GameError::InvalidGameData("no piece images".to_string()));
        }
        if piece_count(self.size()) % 2 != 0 {
            log::warn!(
                "{}x{} board has an odd number of pieces, it cannot be completed",
                self.rows,
                self.cols
            );
        }
        Ok(())
    }

    pub fn size(&self) -> BoardSize {
        (self.rows, self.cols)
    }

    /// Image shown on the front of a piece holding `card`.
    pub fn card_image(&self, card: CardId) -> Result<&str> {
        self.pieces
            .get(card)
            .map(String::as_str)
            .ok_or(GameError::UnknownCard(card))
    }

    pub fn cue_url(&self, cue: Cue) -> &str {
        match cue {
            Cue::Win => &self.audio_win,
            Cue::Match => &self.audio_hit,
            Cue::Miss => &self.audio_miss,
        }
    }
}
