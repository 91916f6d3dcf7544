use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::{Interval, Timeout};
use memorino_core as game;
use memorino_core::{ClickDecision, ClickEffect, Followup, GameData, GameSession, PiecePos};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::{ApiError, MatchClient};
use crate::audio::SoundBank;
use crate::utils::*;

/// Redraw period of the clock, fine enough for hundredths to look alive.
const TICK_MS: u32 = 40;

const BACKGROUND_COLOR: &str = "#182d3b";

fn style() -> String {
    format!(
        r#"
.memorino-frame {{ position: relative; overflow: hidden; margin: 0 auto; }}
.memorino {{ position: relative; overflow: hidden; color: #fff; user-select: none; transform-origin: top left; }}
.memorino .hud {{ position: absolute; white-space: pre; }}
.memorino .piece {{ position: absolute; transition: opacity {fade}ms linear; }}
.memorino .piece.clickable {{ cursor: pointer; }}
.memorino .banner, .memorino .splash {{ position: absolute; left: 0; opacity: 0; animation: memorino-fade-in {fade}ms linear forwards; }}
.memorino .banner {{ background: rgba(0, 0, 0, 0.7); }}
.memorino .splash {{ display: flex; align-items: center; justify-content: center; font-weight: bold; font-size: 32px; }}
@keyframes memorino-fade-in {{ from {{ opacity: 0; }} to {{ opacity: 1; }} }}
"#,
        fade = game::FADE_MS,
    )
}

/// Run `notify` with `followup` once its delay has passed, dropping the handle cancels it.
fn schedule(followup: Followup, notify: impl FnOnce(Followup) + 'static) -> Timeout {
    Timeout::new(followup.delay_ms(), move || notify(followup))
}

pub(crate) enum Msg {
    PieceClick(PiecePos),
    ClickAnswered(PiecePos, Result<game::MatchResponse, ApiError>),
    Followup(Followup),
    UpdateTime,
    Resize,
}

#[derive(Properties, Clone, PartialEq)]
struct PieceProps {
    piece: game::Piece,
    image: AttrValue,
    done: bool,
    clickable: bool,
    callback: Callback<PiecePos>,
}

#[function_component(PieceView)]
fn piece_component(props: &PieceProps) -> Html {
    let PieceProps {
        piece,
        image,
        done,
        clickable,
        callback,
    } = props.clone();

    let size = px(piece.scale * game::REFERENCE_PIECE_SIZE);
    let opacity = if done { game::COMPLETED_PIECE_ALPHA } else { 1.0 };
    let style = format!(
        "left: {}; top: {}; width: {size}; height: {size}; opacity: {opacity};",
        px(piece.x),
        px(piece.y),
    );
    let class = classes!("piece", clickable.then_some("clickable"));

    let onmousedown = Callback::from(move |_: MouseEvent| {
        log::trace!("{:?} mouse down", piece.pos);
        callback.emit(piece.pos);
    });

    html! {
        <img {class} {style} src={image} draggable="false" {onmousedown}/>
    }
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct BoardProps {
    pub data: Rc<GameData>,
    pub session: GameSession,
    #[prop_or_default]
    pub mute: bool,
}

#[derive(Debug)]
pub(crate) struct BoardView {
    session: GameSession,
    client: MatchClient,
    sounds: Option<SoundBank>,
    clock: String,
    fit: f64,
    _timer_interval: Interval,
    _resize_listener: EventListener,
    mismatch_timer: Option<Timeout>,
    redirect_timer: Option<Timeout>,
}

impl BoardView {
    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(TICK_MS, move || link.send_message(Msg::UpdateTime))
    }

    fn create_resize_listener(ctx: &Context<Self>) -> EventListener {
        let link = ctx.link().clone();
        EventListener::new(&gloo::utils::window(), "resize", move |_| {
            link.send_message(Msg::Resize)
        })
    }

    fn click_piece(&mut self, ctx: &Context<Self>, pos: PiecePos) -> bool {
        let ClickDecision::Send(request) = self.session.begin_click(pos, utc_now()) else {
            return false;
        };

        let client = self.client.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            let answer = client.post_click(request).await;
            link.send_message(Msg::ClickAnswered(pos, answer));
        });
        true
    }

    fn answer_click(
        &mut self,
        ctx: &Context<Self>,
        pos: PiecePos,
        answer: Result<game::MatchResponse, ApiError>,
    ) -> bool {
        let response = match answer {
            Ok(response) => response,
            Err(err) => {
                log::error!("click on {:?} got no answer: {}", pos, err);
                if let Err(err) = self.session.abort_click(pos) {
                    log::warn!("{}", err);
                }
                return true;
            }
        };

        match self.session.apply_response(pos, response, utc_now()) {
            Ok(effect) => self.run_effect(ctx, effect),
            Err(err) => log::error!("click on {:?} could not be applied: {}", pos, err),
        }
        true
    }

    fn run_effect(&mut self, ctx: &Context<Self>, effect: ClickEffect) {
        if let (Some(sounds), Some(cue)) = (self.sounds.as_ref(), effect.cue()) {
            sounds.play(cue);
        }

        if let ClickEffect::Completed { score } = effect {
            log::info!(
                "completed in {} rounds, {}, score {:?}",
                self.session.turns(),
                self.session.clock_text(utc_now()),
                score
            );
        }

        let Some(followup) = self.session.followup(effect) else {
            return;
        };
        let link = ctx.link().clone();
        let timer = schedule(followup, move |followup| {
            link.send_message(Msg::Followup(followup))
        });
        match followup {
            Followup::HideMismatch(_) => self.mismatch_timer = Some(timer),
            Followup::Redirect => self.redirect_timer = Some(timer),
        }
    }

    fn run_followup(&mut self, followup: Followup) -> bool {
        match followup {
            Followup::HideMismatch(pair) => {
                self.mismatch_timer.take();
                if let Err(err) = self.session.finish_mismatch(pair) {
                    log::error!("could not hide {:?}: {}", pair, err);
                }
                true
            }
            Followup::Redirect => {
                self.redirect_timer.take();
                navigate(&game::contest_url(game::HIGHSCORE_PAGE));
                false
            }
        }
    }

    fn piece_image(data: &GameData, piece: &game::Piece) -> AttrValue {
        let url = piece
            .face
            .card()
            .and_then(|card| data.card_image(card).ok())
            .unwrap_or(data.back_piece.as_str());
        AttrValue::from(url.to_string())
    }
}

impl Component for BoardView {
    type Message = Msg;
    type Properties = BoardProps;

    fn create(ctx: &Context<Self>) -> Self {
        let BoardProps {
            data,
            session,
            mute,
        } = ctx.props();

        let sounds = if *mute {
            None
        } else {
            SoundBank::load(data)
                .inspect_err(|err| log::warn!("audio disabled: {:?}", err))
                .ok()
        };

        Self {
            session: session.clone(),
            client: MatchClient::new(&data.api_url, &data.csrf_token),
            sounds,
            clock: game::CLOCK_ZERO.to_string(),
            fit: window_fit_scale(),
            _timer_interval: BoardView::create_timer(ctx),
            _resize_listener: BoardView::create_resize_listener(ctx),
            mismatch_timer: None,
            redirect_timer: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::PieceClick(pos) => self.click_piece(ctx, pos),
            Msg::ClickAnswered(pos, answer) => self.answer_click(ctx, pos, answer),
            Msg::Followup(followup) => self.run_followup(followup),
            Msg::UpdateTime => {
                let clock = self.session.clock_text(utc_now());
                if self.clock != clock {
                    self.clock = clock;
                    true
                } else {
                    false
                }
            }
            Msg::Resize => {
                let fit = window_fit_scale();
                let changed = fit != self.fit;
                self.fit = fit;
                changed
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let data = &ctx.props().data;
        let done = self.session.is_done();
        let accepts_clicks = self.session.accepts_clicks();
        let hud = self.session.hud_text(data, utc_now());
        let callback = ctx.link().callback(Msg::PieceClick);

        let frame_style = format!(
            "width: {}; height: {};",
            px(game::CANVAS_WIDTH * self.fit),
            px(game::CANVAS_HEIGHT * self.fit),
        );
        let canvas_style = format!(
            "width: {}; height: {}; background: {}; font-family: '{}'; transform: scale({});",
            px(game::CANVAS_WIDTH),
            px(game::CANVAS_HEIGHT),
            BACKGROUND_COLOR,
            data.font_family,
            self.fit,
        );
        let banner_style = format!(
            "top: {}; width: {}; height: 100px;",
            px(game::CANVAS_HEIGHT / 2.0 - 50.0),
            px(game::CANVAS_WIDTH),
        );

        html! {
            <div class="memorino-frame" style={frame_style}>
                <style>{style()}</style>
                <link rel="stylesheet" href={data.font_url.clone()}/>
                <div class="memorino" style={canvas_style}>
                    {
                        for hud.iter().map(|(slot, text)| {
                            let (x, y) = slot.position();
                            let style = format!(
                                "left: {}; top: {}; font-size: {};",
                                px(x),
                                px(y),
                                px(game::HUD_FONT_SIZE),
                            );
                            html! { <span class="hud" {style}>{text}</span> }
                        })
                    }
                    {
                        for self.session.board().iter().map(|piece| {
                            let image = Self::piece_image(data, piece);
                            let clickable = accepts_clicks && !piece.is_revealed();
                            html! {
                                <PieceView
                                    piece={*piece}
                                    {image}
                                    {done}
                                    {clickable}
                                    callback={callback.clone()}
                                />
                            }
                        })
                    }
                    if done {
                        <>
                            <div class="banner" style={banner_style.clone()}/>
                            <div class="splash" style={banner_style}>{&data.splash_text}</div>
                        </>
                    }
                </div>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> GameData {
        GameData::from_json(
            r#"{
                "name": "Memory", "rows": 2, "cols": 2,
                "pieces": ["/img/1.jpg", "/img/2.jpg"],
                "backPiece": "/img/back.png",
                "font_url": "", "font_family": "Press Start 2P",
                "audio_win": "", "audio_hit": "", "audio_miss": "",
                "csrf_token": "token"
            }"#,
        )
        .unwrap()
    }

    fn piece(face: game::PieceFace) -> game::Piece {
        game::Piece {
            pos: PiecePos::new(0, 1),
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            face,
        }
    }

    #[test]
    fn hidden_pieces_show_the_back_image() {
        let image = BoardView::piece_image(&data(), &piece(game::PieceFace::Back));
        assert_eq!(image.as_str(), "/img/back.png");
    }

    #[test]
    fn revealed_pieces_show_their_card() {
        let image = BoardView::piece_image(&data(), &piece(game::PieceFace::Front(1)));
        assert_eq!(image.as_str(), "/img/2.jpg");
    }

    #[test]
    fn fades_follow_the_fade_duration() {
        let style = style();
        let fade = format!("{}ms linear", game::FADE_MS);
        assert_eq!(style.matches(fade.as_str()).count(), 2);
    }
}
