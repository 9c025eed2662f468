use std::fmt;

use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    #[error("not a valid URL: {0}")]
    Malformed(String),
    #[error("not a YouTube video link")]
    UnsupportedHost,
    #[error("the link does not name a video")]
    MissingVideoId,
}

/// A YouTube video identifier extracted from a link.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Extract the video id from a `youtu.be` or `youtube.com` link.
    pub fn from_url(input: &str) -> Result<Self, UrlError> {
        let url = Url::parse(input.trim()).map_err(|e| UrlError::Malformed(e.to_string()))?;

        let id = match url.host_str() {
            Some("youtu.be") => url
                .path_segments()
                .and_then(|mut segments| segments.next())
                .map(str::to_string),
            Some("youtube.com" | "www.youtube.com" | "m.youtube.com") => {
                let mut segments = url.path_segments().into_iter().flatten();
                match segments.next() {
                    Some("watch") => url
                        .query_pairs()
                        .find(|(key, _)| key == "v")
                        .map(|(_, value)| value.into_owned()),
                    Some("shorts" | "embed" | "live") => segments.next().map(str::to_string),
                    _ => None,
                }
            }
            _ => return Err(UrlError::UnsupportedHost),
        };

        match id {
            Some(id) if !id.is_empty() => Ok(Self(id)),
            _ => Err(UrlError::MissingVideoId),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
