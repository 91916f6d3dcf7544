use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Idle -> AwaitingFirstPick
/// - AwaitingFirstPick -> AwaitingSecondPick
/// - AwaitingSecondPick -> AwaitingFirstPick
/// - AwaitingSecondPick -> Completed
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionState {
    /// No click accepted yet, the clock is not running
    Idle,
    /// No piece is waiting for a partner
    AwaitingFirstPick,
    /// One piece is revealed and waiting for the second click
    AwaitingSecondPick,
    /// The service reported the game as completed
    Completed,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Why a click did not reach the match service
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    Completed,
    OutOfBounds,
    Revealed,
    Throttled,
    InFlight,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClickDecision {
    /// Post this request, then feed the answer to [`GameSession::apply_response`]
    Send(ClickRequest),
    Ignored(IgnoreReason),
}

impl ClickDecision {
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Send(_))
    }
}

/// What the controller has to do after a response was applied
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ClickEffect {
    /// The piece is now pending, nothing else happens
    FirstPick { card: CardId },
    Match { pair: [PiecePos; 2] },
    /// Input is throttled until [`GameSession::finish_mismatch`] is called with `pair`
    Mismatch { pair: [PiecePos; 2] },
    /// Terminal, run the completion sequence
    Completed { score: Option<f64> },
}

impl ClickEffect {
    pub const fn cue(self) -> Option<Cue> {
        match self {
            Self::FirstPick { .. } => None,
            Self::Match { .. } => Some(Cue::Match),
            Self::Mismatch { .. } => Some(Cue::Miss),
            Self::Completed { .. } => Some(Cue::Win),
        }
    }
}

/// Deferred work the controller runs once its delay has passed
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Followup {
    /// Turn the pair face down with [`GameSession::finish_mismatch`]
    HideMismatch([PiecePos; 2]),
    /// Leave for the highscore page
    Redirect,
}

impl Followup {
    pub const fn delay_ms(self) -> u32 {
        match self {
            Self::HideMismatch(_) => MISMATCH_DELAY_MS,
            Self::Redirect => REDIRECT_DELAY_MS,
        }
    }
}

/// One game from the first click to completion.
///
/// The session is the single owner of the selection state: at most one pending piece, at most one click waiting
/// for the service, and the throttle gate raised while a mismatched pair is on display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    board: Board,
    card_count: usize,
    turns: u32,
    pending: Option<PiecePos>,
    in_flight: Option<PiecePos>,
    throttled: bool,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    redirect_scheduled: bool,
}

impl GameSession {
    /// `card_count` is the number of known card images, answers naming other cards are refused.
    pub fn new(board: Board, card_count: usize) -> Self {
        Self {
            board,
            card_count,
            turns: 0,
            pending: None,
            in_flight: None,
            throttled: false,
            started_at: None,
            ended_at: None,
            redirect_scheduled: false,
        }
    }

    pub fn from_game_data(data: &GameData) -> Result<Self> {
        let board = Board::with_size(data.rows, data.cols)?;
        Ok(Self::new(board, data.pieces.len()))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn pending(&self) -> Option<PiecePos> {
        self.pending
    }

    pub fn in_flight(&self) -> Option<PiecePos> {
        self.in_flight
    }

    pub fn is_throttled(&self) -> bool {
        self.throttled
    }

    pub fn is_done(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Whether a click on a hidden piece would be sent right now.
    pub fn accepts_clicks(&self) -> bool {
        !self.is_done() && !self.throttled && self.in_flight.is_none()
    }

    pub fn state(&self) -> SessionState {
        if self.is_done() {
            SessionState::Completed
        } else if self.started_at.is_none() {
            SessionState::Idle
        } else if self.pending.is_some() {
            SessionState::AwaitingSecondPick
        } else {
            SessionState::AwaitingFirstPick
        }
    }

    /// Gate a piece click, an accepted click starts the clock and becomes the one click in flight.
    pub fn begin_click(&mut self, pos: PiecePos, now: DateTime<Utc>) -> ClickDecision {
        use IgnoreReason::*;

        let reason = if self.is_done() {
            Some(Completed)
        } else {
            match self.board.is_revealed(pos) {
                Err(_) => Some(OutOfBounds),
                Ok(true) => Some(Revealed),
                Ok(false) if self.throttled => Some(Throttled),
                Ok(false) if self.in_flight.is_some() => Some(InFlight),
                Ok(false) => None,
            }
        };
        if let Some(reason) = reason {
            log::trace!("click on {:?} ignored: {:?}", pos, reason);
            return ClickDecision::Ignored(reason);
        }

        if self.started_at.is_none() {
            log::debug!("started at {:?}", now);
            self.started_at = Some(now);
        }
        self.in_flight = Some(pos);
        ClickDecision::Send(pos.into())
    }

    /// Apply the service answer for the click in flight at `pos`.
    ///
    /// The click is released whatever the outcome, so a failed answer leaves the piece hidden and clickable.
    pub fn apply_response(
        &mut self,
        pos: PiecePos,
        mut response: MatchResponse,
        now: DateTime<Utc>,
    ) -> Result<ClickEffect> {
        self.release(pos)?;
        response.check_success()?;

        let result = response.take_click()?;
        if let Some(answered) = result.pos().filter(|&answered| answered != pos) {
            log::warn!("service answered for {:?} but {:?} was clicked", answered, pos);
        }
        if result.card >= self.card_count {
            return Err(GameError::UnknownCard(result.card));
        }
        self.board.reveal(pos, result.card)?;

        let Some(first) = self.pending else {
            log::debug!("first pick {:?} shows card {}", pos, result.card);
            self.pending = Some(pos);
            return Ok(ClickEffect::FirstPick { card: result.card });
        };

        self.turns = self.turns.saturating_add(1);
        let pair = [first, pos];

        Ok(if response.completed {
            self.pending = None;
            self.complete(now);
            ClickEffect::Completed {
                score: response.score(),
            }
        } else if !response.is_match {
            log::debug!("mismatch {:?}, throttling input", pair);
            self.throttled = true;
            ClickEffect::Mismatch { pair }
        } else {
            log::debug!("match {:?}", pair);
            self.pending = None;
            ClickEffect::Match { pair }
        })
    }

    /// Give up on the click in flight at `pos` without touching the board.
    pub fn abort_click(&mut self, pos: PiecePos) -> Result<()> {
        self.release(pos)
    }

    /// Turn a mismatched pair face down again and reopen input.
    pub fn finish_mismatch(&mut self, pair: [PiecePos; 2]) -> Result<()> {
        if !self.throttled {
            log::warn!("finishing mismatch {:?} while not throttled", pair);
        }
        for pos in pair {
            self.board.hide(pos)?;
        }
        self.pending = None;
        self.throttled = false;
        Ok(())
    }

    /// Mark the game as done and freeze the clock, only the first call has an effect.
    pub fn complete(&mut self, now: DateTime<Utc>) -> bool {
        if self.ended_at.is_some() {
            return false;
        }
        log::debug!("ended at {:?}", now);
        self.ended_at = Some(now);
        true
    }

    /// What has to be scheduled after `effect`, the redirect is handed out only once per game.
    pub fn followup(&mut self, effect: ClickEffect) -> Option<Followup> {
        match effect {
            ClickEffect::FirstPick { .. } | ClickEffect::Match { .. } => None,
            ClickEffect::Mismatch { pair } => Some(Followup::HideMismatch(pair)),
            ClickEffect::Completed { .. } if self.redirect_scheduled => None,
            ClickEffect::Completed { .. } => {
                self.redirect_scheduled = true;
                Some(Followup::Redirect)
            }
        }
    }

    /// Hundredths of a second since the first accepted click, frozen once done.
    pub fn elapsed_hundredths(&self, now: DateTime<Utc>) -> u64 {
        if let Some(started_at) = self.started_at {
            let millis = (self.ended_at.unwrap_or(now) - started_at)
                .num_milliseconds()
                .max(0);
            (millis / 10) as u64
        } else {
            0
        }
    }

    pub fn clock_text(&self, now: DateTime<Utc>) -> String {
        format_clock(self.elapsed_hundredths(now))
    }

    pub fn hud_text(&self, data: &GameData, now: DateTime<Utc>) -> HudText {
        HudText {
            name: data.name.clone(),
            time_label: data.time_text.clone(),
            time: self.clock_text(now),
            round_label: data.round_text.clone(),
            round: pad2(self.turns.into()),
        }
    }

    fn release(&mut self, pos: PiecePos) -> Result<()> {
        match self.in_flight {
            Some(in_flight) if in_flight == pos => {
                self.in_flight = None;
                Ok(())
            }
            _ => Err(GameError::NoClickInFlight(pos)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(millis: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(millis).unwrap()
    }

    fn session() -> GameSession {
        GameSession::new(Board::with_size(2, 3).unwrap(), 10)
    }

    fn answer(pos: PiecePos, card: CardId, is_match: bool, completed: bool) -> MatchResponse {
        MatchResponse {
            success: true,
            click: vec![ClickResult::new(pos, card)],
            completed,
            is_match,
            csrf_token: None,
            score: None,
            msg: None,
        }
    }

    fn click(session: &mut GameSession, pos: PiecePos, response: MatchResponse) -> ClickEffect {
        assert!(session.begin_click(pos, at(0)).is_accepted());
        session.apply_response(pos, response, at(0)).unwrap()
    }

    #[test]
    fn first_accepted_click_starts_the_clock() {
        let mut session = session();
        let pos = PiecePos::new(0, 0);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.clock_text(at(5_000)), CLOCK_ZERO);

        assert_eq!(
            session.begin_click(pos, at(1_000)),
            ClickDecision::Send(ClickRequest { row: 0, column: 0 })
        );
        assert_eq!(session.state(), SessionState::AwaitingFirstPick);
        assert_eq!(session.elapsed_hundredths(at(2_345)), 134);
    }

    #[test]
    fn first_pick_is_pending_without_a_turn() {
        let mut session = session();
        let pos = PiecePos::new(1, 2);

        let effect = click(&mut session, pos, answer(pos, 3, false, false));

        assert_eq!(effect, ClickEffect::FirstPick { card: 3 });
        assert_eq!(effect.cue(), None);
        assert_eq!(session.pending(), Some(pos));
        assert_eq!(session.turns(), 0);
        assert_eq!(session.state(), SessionState::AwaitingSecondPick);
        assert_eq!(session.board().piece_at(pos).unwrap().face, PieceFace::Front(3));
    }

    #[test]
    fn clicks_while_in_flight_are_dropped() {
        let mut session = session();

        assert!(session.accepts_clicks());
        assert!(session.begin_click(PiecePos::new(0, 0), at(0)).is_accepted());
        assert!(!session.accepts_clicks());
        assert_eq!(
            session.begin_click(PiecePos::new(0, 1), at(0)),
            ClickDecision::Ignored(IgnoreReason::InFlight)
        );

        session.abort_click(PiecePos::new(0, 0)).unwrap();
        assert!(session.accepts_clicks());
    }

    #[test]
    fn revealed_and_out_of_bounds_pieces_are_ignored() {
        let mut session = session();
        let pos = PiecePos::new(0, 0);
        click(&mut session, pos, answer(pos, 1, false, false));

        assert_eq!(
            session.begin_click(pos, at(0)),
            ClickDecision::Ignored(IgnoreReason::Revealed)
        );
        assert_eq!(
            session.begin_click(PiecePos::new(9, 9), at(0)),
            ClickDecision::Ignored(IgnoreReason::OutOfBounds)
        );
    }

    #[test]
    fn card_only_answers_reveal_the_clicked_piece() {
        let mut session = session();
        let pos = PiecePos::new(1, 0);
        let response = MatchResponse::from_json(r#"{"success": true, "click": [{"card": 3}]}"#).unwrap();

        let effect = click(&mut session, pos, response);

        assert_eq!(effect, ClickEffect::FirstPick { card: 3 });
        assert_eq!(session.pending(), Some(pos));
        assert_eq!(session.board().piece_at(pos).unwrap().face, PieceFace::Front(3));
    }

    #[test]
    fn match_clears_pending_and_counts_a_turn() {
        let mut session = session();
        let first = PiecePos::new(0, 0);
        let second = PiecePos::new(1, 1);
        click(&mut session, first, answer(first, 2, false, false));

        let effect = click(&mut session, second, answer(second, 2, true, false));

        assert_eq!(effect, ClickEffect::Match { pair: [first, second] });
        assert_eq!(effect.cue(), Some(Cue::Match));
        assert_eq!(session.followup(effect), None);
        assert_eq!(session.pending(), None);
        assert_eq!(session.turns(), 1);
        assert_eq!(session.board().revealed_count(), 2);
    }

    #[test]
    fn mismatch_throttles_until_pair_is_hidden() {
        let mut session = session();
        let first = PiecePos::new(0, 0);
        let second = PiecePos::new(0, 1);
        click(&mut session, first, answer(first, 2, false, false));

        let effect = click(&mut session, second, answer(second, 5, false, false));
        assert_eq!(effect, ClickEffect::Mismatch { pair: [first, second] });
        assert_eq!(effect.cue(), Some(Cue::Miss));
        let followup = session.followup(effect);
        assert_eq!(followup, Some(Followup::HideMismatch([first, second])));
        assert_eq!(followup.map(Followup::delay_ms), Some(MISMATCH_DELAY_MS));
        assert!(session.is_throttled());
        assert!(!session.accepts_clicks());
        assert_eq!(session.turns(), 1);
        assert_eq!(
            session.begin_click(PiecePos::new(1, 0), at(0)),
            ClickDecision::Ignored(IgnoreReason::Throttled)
        );

        session.finish_mismatch([first, second]).unwrap();
        assert!(!session.is_throttled());
        assert!(session.accepts_clicks());
        assert_eq!(session.pending(), None);
        assert_eq!(session.board().revealed_count(), 0);
        assert!(session.begin_click(PiecePos::new(1, 0), at(0)).is_accepted());
    }

    #[test]
    fn completion_freezes_clock_and_blocks_clicks() {
        let mut session = session();
        let first = PiecePos::new(0, 0);
        let second = PiecePos::new(0, 1);
        assert!(session.begin_click(first, at(1_000)).is_accepted());
        session
            .apply_response(first, answer(first, 0, false, false), at(1_500))
            .unwrap();
        assert!(session.begin_click(second, at(2_000)).is_accepted());

        let mut done = answer(second, 0, true, true);
        done.score = Some(serde_json::json!("512.250"));
        let effect = session.apply_response(second, done, at(3_000)).unwrap();

        assert_eq!(effect, ClickEffect::Completed { score: Some(512.25) });
        assert_eq!(effect.cue(), Some(Cue::Win));
        assert_eq!(session.state(), SessionState::Completed);
        assert!(!session.accepts_clicks());
        assert_eq!(session.turns(), 1);
        assert_eq!(session.clock_text(at(60_000)), "00:02:00");
        assert!(!session.complete(at(70_000)));
        assert_eq!(session.followup(effect), Some(Followup::Redirect));
        assert_eq!(Followup::Redirect.delay_ms(), REDIRECT_DELAY_MS);
        assert_eq!(session.followup(effect), None);
        assert_eq!(
            session.begin_click(PiecePos::new(1, 0), at(0)),
            ClickDecision::Ignored(IgnoreReason::Completed)
        );
    }

    #[test]
    fn failed_answers_release_the_click() {
        let mut session = session();
        let pos = PiecePos::new(1, 1);

        assert!(session.begin_click(pos, at(0)).is_accepted());
        assert_eq!(
            session.apply_response(pos, MatchResponse::from_json("{}").unwrap(), at(0)),
            Err(GameError::MissingClickResult)
        );
        assert_eq!(session.in_flight(), None);
        assert_eq!(session.board().is_revealed(pos), Ok(false));

        assert!(session.begin_click(pos, at(0)).is_accepted());
        assert_eq!(
            session.apply_response(pos, answer(pos, 42, false, false), at(0)),
            Err(GameError::UnknownCard(42))
        );
        assert_eq!(session.pending(), None);

        assert!(session.begin_click(pos, at(0)).is_accepted());
        session.abort_click(pos).unwrap();
        assert_eq!(session.abort_click(pos), Err(GameError::NoClickInFlight(pos)));
    }

    #[test]
    fn hud_text_pads_turns() {
        let mut session = session();
        let data = GameData {
            name: "Memory".to_string(),
            rows: 2,
            cols: 3,
            pieces: vec![String::new(); 10],
            back_piece: String::new(),
            font_url: String::new(),
            font_family: String::new(),
            audio_win: String::new(),
            audio_hit: String::new(),
            audio_miss: String::new(),
            csrf_token: String::new(),
            time_text: "Tid".to_string(),
            round_text: "Runda".to_string(),
            splash_text: String::new(),
            best_score: None,
            api_url: String::new(),
        };
        session.turns = 7;

        let hud = session.hud_text(&data, at(0));
        assert_eq!(hud.round, "07");
        assert_eq!(hud.time, CLOCK_ZERO);
        assert_eq!(hud.text(HudSlot::TimeLabel), "Tid");
        assert_eq!(hud.iter().count(), 5);
    }
}
