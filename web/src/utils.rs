use chrono::prelude::*;
use memorino_core::GameData;

use crate::BootError;

pub(crate) fn utc_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

/// Read the game data the page embeds as JSON inside the element `id`.
pub(crate) fn read_game_data(id: &'static str) -> Result<GameData, BootError> {
    use gloo::utils::document;

    let text = document()
        .get_element_by_id(id)
        .and_then(|element| element.text_content())
        .ok_or(BootError::MissingElement(id))?;
    Ok(GameData::from_json(&text)?)
}

pub(crate) fn navigate(path: &str) {
    log::info!("leaving for {}", path);
    if let Err(err) = gloo::utils::window().location().set_href(path) {
        log::error!("failed to navigate to {}: {:?}", path, err);
    }
}

/// Scale that fits the canvas into the browser window.
pub(crate) fn window_fit_scale() -> f64 {
    let window = gloo::utils::window();
    let dimension = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        value.ok().and_then(|value| value.as_f64()).unwrap_or_default()
    };
    memorino_core::fit_scale(dimension(window.inner_width()), dimension(window.inner_height()))
}

pub(crate) fn px(value: f64) -> String {
    format!("{:.2}px", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn px_rounds_to_two_decimals() {
        assert_eq!(px(0.0), "0.00px");
        assert_eq!(px(207.0), "207.00px");
        assert_eq!(px(1.0 / 3.0), "0.33px");
    }
}
