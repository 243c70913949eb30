//! Level intro text
//!
//! Each level opens with a one-line comic-book narration. A text service may
//! supply it; whenever it can't, a fixed line built from the level's theme
//! is used instead. Callers never see an error.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::NarrativeError;

/// Themes for the hand-tuned levels, indexed by level - 1
pub const THEMES: [&str; 10] = [
    "The Evil Wolves are invading",
    "Super Pig is fighting Wolf clones",
    "Wolves in the sewers",
    "Robo-Wolves are attacking",
    "Flying Wolves with jetpacks",
    "A swarm of Mini-Wolves",
    "The Wolf Pack has united",
    "Unbreakable Wolf Fortress",
    "Total Wolf Chaos",
    "The Alpha Wolf Boss Battle",
];

/// Theme for levels past the hand-tuned set
pub const GENERIC_THEME: &str = "Villains attacking";

pub fn theme(level: u32) -> &'static str {
    level
        .checked_sub(1)
        .and_then(|i| THEMES.get(i as usize))
        .copied()
        .unwrap_or(GENERIC_THEME)
}

/// Intro used whenever the service is unavailable or fails
pub fn fallback_intro(level: u32) -> String {
    format!("Level {}: {}! Super Pig to the rescue!", level, theme(level))
}

/// Prompt sent to a text-generation service
pub fn prompt(level: u32) -> String {
    format!(
        "Write a short, funny, comic-book narrator intro (max 25 words) for Level {} of a \
         \"Super Pig vs Evil Wolves\" brick breaker game. Scenario: {}. Style: exciting, \
         using words like \"Oink\", \"Howl\", \"Epic\", or sound effects like \"KA-BLAM!\". \
         Target audience: 9 year old kids. Make it sound like a dramatic comic book \
         narration box.",
        level,
        theme(level)
    )
}

/// Request body posted to the text service
#[derive(Debug, Serialize)]
pub struct IntroRequest {
    pub level: u32,
    pub theme: String,
    pub prompt: String,
}

impl IntroRequest {
    pub fn new(level: u32) -> Self {
        Self {
            level,
            theme: theme(level).to_string(),
            prompt: prompt(level),
        }
    }
}

/// Reply from the text service
#[derive(Debug, Deserialize)]
pub struct IntroResponse {
    pub text: String,
}

/// Decode a service reply, rejecting blank text
pub fn parse_response(body: &str) -> Result<String, NarrativeError> {
    let response: IntroResponse = serde_json::from_str(body)?;
    let text = response.text.trim();
    if text.is_empty() {
        return Err(NarrativeError::EmptyResponse);
    }
    Ok(text.to_string())
}

/// Something that can produce intro text for a level
pub trait NarrativeSource {
    fn generate(
        &self,
        level: u32,
        theme: &str,
    ) -> impl Future<Output = Result<String, NarrativeError>>;
}

/// Source used when no service is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineNarrator;

impl NarrativeSource for OfflineNarrator {
    async fn generate(&self, _level: u32, _theme: &str) -> Result<String, NarrativeError> {
        Err(NarrativeError::Unavailable)
    }
}

/// Fetch the intro for a level. Failures and blank replies resolve to
/// [`fallback_intro`]; there is no retry.
pub async fn fetch_intro<S: NarrativeSource>(source: &S, level: u32) -> String {
    match source.generate(level, theme(level)).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            log::warn!("Level {} intro: {}, using fallback", level, NarrativeError::EmptyResponse);
            fallback_intro(level)
        }
        Err(NarrativeError::Unavailable) => {
            log::debug!("Level {} intro: no narrator, using fallback", level);
            fallback_intro(level)
        }
        Err(e) => {
            log::warn!("Level {} intro: {}, using fallback", level, e);
            fallback_intro(level)
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::HttpNarrator;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Headers, Request, RequestInit, Response};

    use super::{IntroRequest, NarrativeSource, parse_response};
    use crate::error::NarrativeError;

    /// Posts the intro prompt to an HTTP endpoint and reads `{"text": ...}` back
    #[derive(Debug, Clone)]
    pub struct HttpNarrator {
        endpoint: String,
    }

    impl HttpNarrator {
        pub fn new(endpoint: impl Into<String>) -> Self {
            Self {
                endpoint: endpoint.into(),
            }
        }
    }

    fn js_err(e: JsValue) -> NarrativeError {
        NarrativeError::Request(format!("{:?}", e))
    }

    impl NarrativeSource for HttpNarrator {
        async fn generate(&self, level: u32, _theme: &str) -> Result<String, NarrativeError> {
            let window = web_sys::window().ok_or(NarrativeError::Unavailable)?;
            let body = serde_json::to_string(&IntroRequest::new(level))?;

            let headers = Headers::new().map_err(js_err)?;
            headers
                .set("Content-Type", "application/json")
                .map_err(js_err)?;

            let init = RequestInit::new();
            init.set_method("POST");
            init.set_headers(&headers);
            init.set_body(&JsValue::from_str(&body));

            let request = Request::new_with_str_and_init(&self.endpoint, &init).map_err(js_err)?;
            let response: Response = JsFuture::from(window.fetch_with_request(&request))
                .await
                .map_err(js_err)?
                .dyn_into()
                .map_err(js_err)?;

            if !response.ok() {
                return Err(NarrativeError::Request(format!("HTTP {}", response.status())));
            }

            let text = JsFuture::from(response.text().map_err(js_err)?)
                .await
                .map_err(js_err)?
                .as_string()
                .ok_or(NarrativeError::EmptyResponse)?;

            parse_response(&text)
        }
    }
}
