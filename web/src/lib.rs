use std::rc::Rc;

use clap::Parser;
use memorino_core::{GameError, GameSession};
use thiserror::Error;
use wasm_bindgen::prelude::*;

mod api;
mod audio;
mod board;
mod utils;

/// Id of the element the board is rendered into.
const ROOT_ID: &str = "game";
/// Id of the `application/json` script element carrying the game data.
const GAME_DATA_ID: &str = "game-data";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Do not play sound cues
    #[arg(short, long)]
    mute: bool,
}

#[derive(Error, Debug)]
pub(crate) enum BootError {
    #[error("could not parse args: {0}")]
    Args(#[from] clap::Error),
    #[error("could not find id=\"{0}\" element")]
    MissingElement(&'static str),
    #[error(transparent)]
    Game(#[from] GameError),
}

impl From<BootError> for JsValue {
    fn from(err: BootError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[wasm_bindgen(start)]
pub fn run_app() -> Result<(), JsValue> {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window().location().hash().unwrap_or_default();

    let args = Args::try_parse_from(location_hash.split(['#', '&'])).map_err(BootError::from)?;
    if let Some(log_level) = args.verbose.log_level() {
        if let Err(err) = console_log::init_with_level(log_level) {
            gloo::console::error!(format!("Error initializing logger: {}", err));
        }
    }

    let data = utils::read_game_data(GAME_DATA_ID)?;
    let session = GameSession::from_game_data(&data).map_err(BootError::from)?;
    log::debug!("{}x{} board, {} cards", data.rows, data.cols, data.pieces.len());

    let root = document()
        .get_element_by_id(ROOT_ID)
        .ok_or(BootError::MissingElement(ROOT_ID))?;

    let props = board::BoardProps {
        data: Rc::new(data),
        session,
        mute: args.mute,
    };

    log::debug!("App started");
    yew::Renderer::<board::BoardView>::with_root_and_props(root, props).render();
    Ok(())
}
