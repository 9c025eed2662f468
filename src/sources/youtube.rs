//! Transcript retrieval from YouTube caption tracks.

use std::sync::LazyLock;

use async_trait::async_trait;
use log::{debug, info};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

use super::video::VideoId;
use super::{FetchError, TranscriptSource};

const CAPTION_TRACKS_MARKER: &str = "\"captionTracks\":";

static TEXT_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<text[^>]*>(.*?)</text>").expect("valid regex"));

static NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("valid regex"));

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    /// `"asr"` for auto-generated tracks.
    #[serde(default)]
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Fetches transcripts in the first available preferred language.
#[derive(Clone)]
pub struct YouTubeTranscripts {
    client: Client,
    languages: Vec<String>,
}

impl YouTubeTranscripts {
    pub fn new(languages: Vec<String>) -> Self {
        Self {
            client: Client::new(),
            languages,
        }
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    async fn fetch_video(&self, video: &VideoId) -> Result<String, FetchError> {
        let page = self
            .client
            .get(video.watch_url())
            .header("Accept-Language", "en-US,en;q=0.8")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let tracks = parse_caption_tracks(&page)?
            .ok_or_else(|| FetchError::TranscriptsDisabled(video.clone()))?;
        debug!("Video {} has {} caption tracks", video, tracks.len());

        let track = choose_track(&tracks, &self.languages).ok_or_else(|| {
            FetchError::NoTranscript {
                video: video.clone(),
                wanted: self.languages.clone(),
                available: tracks.iter().map(|t| t.language_code.clone()).collect(),
            }
        })?;
        info!(
            "Fetching {} transcript ({}) for video {}",
            track.language_code,
            if track.is_generated() { "generated" } else { "manual" },
            video
        );

        let xml = self
            .client
            .get(&track.base_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let text = transcript_text(&xml);
        if text.is_empty() {
            return Err(FetchError::Empty(video.clone()));
        }
        Ok(text)
    }
}

#[async_trait]
impl TranscriptSource for YouTubeTranscripts {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let video = VideoId::from_url(url)?;
        self.fetch_video(&video).await
    }
}

/// Pull the caption track list out of a watch page.
///
/// Returns `Ok(None)` when the page carries no caption tracks at all.
fn parse_caption_tracks(page: &str) -> Result<Option<Vec<CaptionTrack>>, FetchError> {
    let Some(start) = page.find(CAPTION_TRACKS_MARKER) else {
        return Ok(None);
    };
    let rest = &page[start + CAPTION_TRACKS_MARKER.len()..];

    // The array is followed by the rest of the player JSON; read one value only.
    let tracks = serde_json::Deserializer::from_str(rest)
        .into_iter::<Vec<CaptionTrack>>()
        .next()
        .ok_or_else(|| FetchError::Malformed("caption track list is missing".to_string()))?
        .map_err(|e| FetchError::Malformed(e.to_string()))?;

    Ok(Some(tracks).filter(|tracks| !tracks.is_empty()))
}

/// Language preference order first, then manual tracks over generated ones.
fn choose_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|language| {
        let mut candidates = tracks.iter().filter(|t| &t.language_code == language);
        let first = candidates.next()?;
        if !first.is_generated() {
            return Some(first);
        }
        Some(candidates.find(|t| !t.is_generated()).unwrap_or(first))
    })
}

/// Join every `<text>` entry of a timed-text document with single spaces.
fn transcript_text(xml: &str) -> String {
    TEXT_ELEMENT
        .captures_iter(xml)
        .filter_map(|caps| caps.get(1))
        .map(|m| decode_entities(m.as_str()))
        .flat_map(|entry| {
            entry
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_entities(text: &str) -> String {
    // Caption text is escaped twice: `&amp;#39;` only becomes `'` after two passes.
    decode_once(&decode_once(text))
}

fn decode_once(text: &str) -> String {
    let named = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'");

    NUMERIC_ENTITY
        .replace_all(&named, |caps: &regex::Captures<'_>| {
            let code = &caps[1];
            let value = match code.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => code.parse().ok(),
            };
            value
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(language: &str, kind: Option<&str>) -> CaptionTrack {
        CaptionTrack {
            base_url: format!("https://example.test/{}/{}", language, kind.unwrap_or("manual")),
            language_code: language.to_string(),
            kind: kind.map(str::to_string),
        }
    }

    fn langs(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_parse_caption_tracks_from_page() {
        let page = r#"<script>var ytInitialPlayerResponse = {"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc&lang=fr","name":{"simpleText":"French"},"languageCode":"fr","kind":"asr"},{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc&lang=en","languageCode":"en"}],"audioTracks":[]}}};</script>"#;

        let tracks = parse_caption_tracks(page).unwrap().unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].language_code, "fr");
        assert!(tracks[0].is_generated());
        assert!(!tracks[1].is_generated());
    }

    #[test]
    fn test_parse_caption_tracks_absent() {
        assert!(parse_caption_tracks("<html>no captions</html>").unwrap().is_none());
        assert!(parse_caption_tracks(r#"{"captionTracks":[]}"#).unwrap().is_none());
        assert!(matches!(
            parse_caption_tracks(r#"{"captionTracks":[{"oops":1}]}"#),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn test_choose_track_follows_language_order() {
        let tracks = vec![track("en", None), track("fr", Some("asr"))];

        let chosen = choose_track(&tracks, &langs(&["fr", "en"])).unwrap();
        assert_eq!(chosen.language_code, "fr");

        let chosen = choose_track(&tracks, &langs(&["de", "en"])).unwrap();
        assert_eq!(chosen.language_code, "en");

        assert!(choose_track(&tracks, &langs(&["de"])).is_none());
    }

    #[test]
    fn test_choose_track_prefers_manual() {
        let tracks = vec![track("fr", Some("asr")), track("fr", None)];
        let chosen = choose_track(&tracks, &langs(&["fr"])).unwrap();
        assert!(!chosen.is_generated());
    }

    #[test]
    fn test_transcript_text_decodes_and_joins() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.5" dur="2.1">Bonjour &amp;amp; bienvenue</text><text start="2.6" dur="1.9">c&amp;#39;est   la
vie</text><text start="4.5" dur="1"></text><text start="5" dur="1">&#xe9;t&#233;</text></transcript>"#;

        assert_eq!(
            transcript_text(xml),
            "Bonjour & bienvenue c'est la vie été"
        );
    }
}
