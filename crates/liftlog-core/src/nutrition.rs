//! Meal photo nutrition analysis.
//!
//! Photos are sent to an OpenAI-compatible chat-completions endpoint as a
//! base64 data URI. The model answers with a JSON object, sometimes wrapped in
//! a markdown code fence; the parsed summary is stored on the log as JSON text.

use std::fmt;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{LiftLogError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const MAX_TOKENS: u32 = 500;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

const PROMPT: &str = r#"この食事画像を分析して、以下のJSON形式で返してください：
{
  "calories": 数値（カロリー）,
  "protein": 数値（タンパク質、g）,
  "fat": 数値（脂質、g）,
  "carbs": 数値（炭水化物、g）,
  "missing_nutrients": ["不足している栄養素1", "不足している栄養素2"]
}

ウエイトリフティング選手向けの分析をお願いします。"#;

/// Estimated nutrition for one meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionSummary {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    #[serde(default)]
    pub missing_nutrients: Vec<String>,
}

impl NutritionSummary {
    /// Parse model output, stripping any code fence first.
    pub fn parse_response(content: &str) -> Result<Self> {
        let json = strip_code_fences(content);
        serde_json::from_str(&json).map_err(|e| {
            LiftLogError::Remote(format!("Could not parse nutrition response: {}", e))
        })
    }

    /// Parse the text stored on a log. Malformed text is logged and ignored.
    pub fn from_stored(text: &str) -> Option<Self> {
        match serde_json::from_str(text) {
            Ok(summary) => Some(summary),
            Err(e) => {
                log::warn!("Ignoring malformed nutrition summary: {}", e);
                None
            }
        }
    }

    /// Serialize for storage on a log.
    pub fn to_stored(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for NutritionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.0} kcal  P {:.1} g  F {:.1} g  C {:.1} g",
            self.calories, self.protein, self.fat, self.carbs
        )?;
        if !self.missing_nutrients.is_empty() {
            write!(f, "  不足: {}", self.missing_nutrients.join(", "))?;
        }
        Ok(())
    }
}

/// Remove a leading ```json or ``` fence and every closing fence.
pub fn strip_code_fences(content: &str) -> String {
    let trimmed = content.trim();
    let stripped = if trimmed.starts_with("```json") {
        trimmed
            .replace("```json\n", "")
            .replace("```json", "")
            .replace("```\n", "")
            .replace("```", "")
    } else if trimmed.starts_with("```") {
        trimmed.replace("```\n", "").replace("```", "")
    } else {
        trimmed.to_string()
    };
    stripped.trim().to_string()
}

/// MIME type for a photo, from its extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

/// Pick the API key. The environment takes precedence over configuration.
pub fn resolve_api_key(configured: Option<&str>) -> Option<String> {
    pick_api_key(std::env::var(API_KEY_ENV).ok(), configured)
}

fn pick_api_key(env: Option<String>, configured: Option<&str>) -> Option<String> {
    env.filter(|k| !k.trim().is_empty())
        .or_else(|| configured.map(str::to_string))
        .filter(|k| !k.trim().is_empty())
}

/// Service that estimates nutrition from a meal photo.
pub trait NutritionClient {
    fn analyze(&self, image: &[u8], mime: &str) -> Result<NutritionSummary>;
}

/// Read a photo from disk and analyze it.
pub fn analyze_file<C: NutritionClient + ?Sized>(
    client: &C,
    path: &Path,
) -> Result<NutritionSummary> {
    let image = std::fs::read(path).map_err(|e| {
        LiftLogError::InvalidInput(format!("Cannot read photo {}: {}", path.display(), e))
    })?;
    client.analyze(&image, mime_for_path(path))
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Chat-completions client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpNutritionClient {
    base_url: String,
    model: String,
    api_key: String,
}

impl HttpNutritionClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn request_body(&self, image: &[u8], mime: &str) -> serde_json::Value {
        let data_uri = format!("data:{};base64,{}", mime, STANDARD.encode(image));
        json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": PROMPT },
                    { "type": "image_url", "image_url": { "url": data_uri } }
                ]
            }],
            "max_tokens": MAX_TOKENS
        })
    }
}

impl NutritionClient for HttpNutritionClient {
    fn analyze(&self, image: &[u8], mime: &str) -> Result<NutritionSummary> {
        if image.is_empty() {
            return Err(LiftLogError::InvalidInput("No image provided".to_string()));
        }

        log::info!("Requesting nutrition analysis from {}", self.endpoint());
        let response = ureq::post(&self.endpoint())
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Accept", "application/json")
            .send_json(self.request_body(image, mime));

        let response = match response {
            Ok(r) => r,
            Err(ureq::Error::Status(code, r)) => {
                let body = r.into_string().unwrap_or_default();
                return Err(LiftLogError::Remote(format!(
                    "Nutrition service returned HTTP {}: {}",
                    code, body
                )));
            }
            Err(e) => return Err(LiftLogError::Remote(e.to_string())),
        };

        let chat: ChatResponse = response
            .into_json()
            .map_err(|e| LiftLogError::Remote(format!("Invalid response body: {}", e)))?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| LiftLogError::Remote("No content in response".to_string()))?;

        NutritionSummary::parse_response(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const SUMMARY_JSON: &str = r#"{"calories":650,"protein":42.5,"fat":18,"carbs":80,"missing_nutrients":["ビタミンC"]}"#;

    fn chat_reply(content: &str) -> serde_json::Value {
        json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
    }

    #[test]
    fn test_strip_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```\n"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn test_parse_response() {
        let summary = NutritionSummary::parse_response(&format!("```json\n{}\n```", SUMMARY_JSON))
            .unwrap();
        assert_eq!(summary.calories, 650.0);
        assert_eq!(summary.protein, 42.5);
        assert_eq!(summary.missing_nutrients, vec!["ビタミンC".to_string()]);

        let err = NutritionSummary::parse_response("not json").unwrap_err();
        assert!(matches!(err, LiftLogError::Remote(_)));
    }

    #[test]
    fn test_stored_round_trip_and_malformed() {
        let summary = NutritionSummary::parse_response(SUMMARY_JSON).unwrap();
        let stored = summary.to_stored().unwrap();
        assert_eq!(NutritionSummary::from_stored(&stored), Some(summary));
        assert_eq!(NutritionSummary::from_stored("{broken"), None);
    }

    #[test]
    fn test_display() {
        let summary = NutritionSummary::parse_response(SUMMARY_JSON).unwrap();
        assert_eq!(
            summary.to_string(),
            "650 kcal  P 42.5 g  F 18.0 g  C 80.0 g  不足: ビタミンC"
        );
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("meal.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("meal.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("meal")), "application/octet-stream");
    }

    #[test]
    fn test_env_key_takes_precedence() {
        assert_eq!(
            pick_api_key(Some("env".into()), Some("config")).as_deref(),
            Some("env")
        );
        assert_eq!(pick_api_key(None, Some("config")).as_deref(), Some("config"));
        assert_eq!(pick_api_key(Some("".into()), None), None);
    }

    #[test]
    fn test_analyze_sends_image_and_parses_reply() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("Authorization", "Bearer test-key")
                .body_contains("data:image/jpeg;base64,/9j/")
                .body_contains("\"max_tokens\":500")
                .body_contains("gpt-4o");
            then.status(200)
                .json_body(chat_reply(&format!("```json\n{}\n```", SUMMARY_JSON)));
        });

        let client = HttpNutritionClient::new("test-key").with_base_url(server.url("/v1"));
        let summary = client.analyze(&[0xff, 0xd8, 0xff], "image/jpeg").unwrap();

        assert_eq!(summary.fat, 18.0);
        m.assert();
    }

    #[test]
    fn test_analyze_empty_content_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(json!({ "choices": [] }));
        });

        let client = HttpNutritionClient::new("k").with_base_url(server.base_url());
        let err = client.analyze(b"img", "image/png").unwrap_err();
        assert!(matches!(err, LiftLogError::Remote(_)));
    }

    #[test]
    fn test_analyze_http_error_is_remote() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(401).body("bad key");
        });

        let client = HttpNutritionClient::new("k").with_base_url(server.base_url());
        match client.analyze(b"img", "image/png").unwrap_err() {
            LiftLogError::Remote(msg) => assert!(msg.contains("401") && msg.contains("bad key")),
            e => panic!("unexpected error: {e:?}"),
        }
    }

    #[test]
    fn test_analyze_without_image_is_invalid_input() {
        let client = HttpNutritionClient::new("k").with_base_url("http://127.0.0.1:1");
        let err = client.analyze(&[], "image/png").unwrap_err();
        assert!(matches!(err, LiftLogError::InvalidInput(_)));
    }
}
