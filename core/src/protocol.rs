//! Wire types for the match service.
//!
//! The service owns the playfield. Every click is posted as a form with the CSRF token and a JSON encoded
//! [`ClickRequest`], and the service answers with a [`MatchResponse`] telling which card sits under the click and
//! whether the pair matched or finished the game.

use serde::{Deserialize, Serialize};

use crate::*;

pub const API_PAGE: &str = "api";
pub const HIGHSCORE_PAGE: &str = "highscore";

/// Form field carrying the CSRF token.
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";
/// Form field carrying the JSON encoded click.
pub const CLICK_FIELD: &str = "click";

/// Path of a page under the contest namespace, always with a trailing slash.
pub fn contest_url(page: &str) -> String {
    ["", "contests", page, ""].join("/")
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickRequest {
    pub row: Coord,
    pub column: Coord,
}

impl ClickRequest {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Both form fields of a click post
    pub fn form_fields(&self, csrf_token: &str) -> serde_json::Result<[(&'static str, String); 2]> {
        Ok([
            (CSRF_FIELD, csrf_token.to_string()),
            (CLICK_FIELD, self.to_json()?),
        ])
    }
}

impl From<PiecePos> for ClickRequest {
    fn from(pos: PiecePos) -> Self {
        Self {
            row: pos.row,
            column: pos.column,
        }
    }
}

/// One evaluated click as reported back by the service, only the card is guaranteed to be present.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<Coord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<Coord>,
    pub card: CardId,
}

impl ClickResult {
    pub fn new(pos: PiecePos, card: CardId) -> Self {
        Self {
            row: Some(pos.row),
            column: Some(pos.column),
            card,
        }
    }

    /// Position of the evaluated click, when the service reported both coordinates.
    pub fn pos(&self) -> Option<PiecePos> {
        Some(PiecePos::new(self.row?, self.column?))
    }
}

const fn default_success() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    /// Results of the clicks of the current turn, the last one belongs to the click just posted.
    #[serde(default)]
    pub click: Vec<ClickResult>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, rename = "match")]
    pub is_match: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
    /// Either a number or a decimal string, depending on how the server encodes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl MatchResponse {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Fails with the server message when the service flagged the request as unsuccessful.
    pub fn check_success(&self) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(GameError::Rejected(
                self.msg.clone().unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }

    /// Takes the result record for the click just posted, each response is consumed once.
    pub fn take_click(&mut self) -> Result<ClickResult> {
        self.click.pop().ok_or(GameError::MissingClickResult)
    }

    pub fn score(&self) -> Option<f64> {
        use serde_json::Value;
        match self.score.as_ref()? {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}
