use memorino_core::{Cue, GameData};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::HtmlAudioElement;

/// Preloaded audio elements for the three cues.
#[derive(Debug)]
pub(crate) struct SoundBank {
    win: HtmlAudioElement,
    hit: HtmlAudioElement,
    miss: HtmlAudioElement,
}

impl SoundBank {
    pub(crate) fn load(data: &GameData) -> Result<Self, JsValue> {
        let load = |cue| {
            let audio = HtmlAudioElement::new_with_src(data.cue_url(cue))?;
            audio.set_preload("auto");
            Ok::<_, JsValue>(audio)
        };
        Ok(Self {
            win: load(Cue::Win)?,
            hit: load(Cue::Match)?,
            miss: load(Cue::Miss)?,
        })
    }

    pub(crate) fn play(&self, cue: Cue) {
        let audio = match cue {
            Cue::Win => &self.win,
            Cue::Match => &self.hit,
            Cue::Miss => &self.miss,
        };
        audio.set_current_time(0.0);
        match audio.play() {
            // rejected when the autoplay policy blocks the cue
            Ok(promise) => spawn_local(async move {
                if let Err(err) = JsFuture::from(promise).await {
                    log::warn!("{:?} cue was not played: {:?}", cue, err);
                }
            }),
            Err(err) => log::warn!("could not play {:?}: {:?}", cue, err),
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use gloo::timers::future::TimeoutFuture;
    use wasm_bindgen_test::*;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test(async)]
    async fn unplayable_cues_are_only_logged() {
        let data = GameData::from_json(
            r#"{
                "name": "Memory", "rows": 1, "cols": 2,
                "pieces": ["/img/1.jpg"],
                "backPiece": "/img/back.png",
                "font_url": "", "font_family": "",
                "audio_win": "/missing/win.mp3", "audio_hit": "/missing/hit.mp3",
                "audio_miss": "/missing/miss.mp3",
                "csrf_token": "token"
            }"#,
        )
        .unwrap();
        let sounds = SoundBank::load(&data).unwrap();

        for cue in [Cue::Win, Cue::Match, Cue::Miss] {
            sounds.play(cue);
        }
        TimeoutFuture::new(200).await;
    }
}
