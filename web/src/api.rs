use std::cell::RefCell;
use std::rc::Rc;

use gloo::net::http::Request;
use memorino_core::{ClickRequest, MatchResponse};
use thiserror::Error;
use web_sys::UrlSearchParams;

#[derive(Error, Debug)]
pub(crate) enum ApiError {
    #[error("request failed: {0}")]
    Net(#[from] gloo::net::Error),
    #[error("match service answered {status}: {msg}")]
    Status { status: u16, msg: String },
    #[error("could not encode click: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("could not build form: {0}")]
    Form(String),
}

/// HTTP client of the match service, clones share the CSRF token.
#[derive(Clone, Debug)]
pub(crate) struct MatchClient {
    url: Rc<str>,
    csrf_token: Rc<RefCell<String>>,
}

impl MatchClient {
    pub(crate) fn new(url: &str, csrf_token: &str) -> Self {
        Self {
            url: url.into(),
            csrf_token: Rc::new(RefCell::new(csrf_token.to_string())),
        }
    }

    /// The service may rotate the token with any answer.
    pub(crate) fn refresh_csrf_token(&self, token: &str) {
        let mut current = self.csrf_token.borrow_mut();
        if *current != token {
            log::debug!("csrf token rotated");
            *current = token.to_string();
        }
    }

    pub(crate) async fn post_click(&self, request: ClickRequest) -> Result<MatchResponse, ApiError> {
        let params =
            UrlSearchParams::new().map_err(|err| ApiError::Form(format!("{:?}", err)))?;
        let token = self.csrf_token.borrow().clone();
        for (name, value) in request.form_fields(&token)? {
            params.append(name, &value);
        }

        log::debug!("posting {:?} to {}", request, self.url);
        let response = Request::post(&self.url).body(params)?.send().await?;

        if !response.ok() {
            let status = response.status();
            let msg = match response.json::<MatchResponse>().await {
                Ok(MatchResponse { msg: Some(msg), .. }) => msg,
                _ => response.status_text(),
            };
            return Err(ApiError::Status { status, msg });
        }

        let answer: MatchResponse = response.json().await?;
        if let Some(token) = answer.csrf_token.as_deref() {
            self.refresh_csrf_token(token);
        }
        Ok(answer)
    }
}
