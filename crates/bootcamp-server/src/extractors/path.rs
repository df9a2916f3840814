//! Path extractors that reject with the API error envelope

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequestParts, MatchedPath, Path},
    http::request::Parts,
};
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;

/// Like `axum::extract::Path`, but a segment that fails to deserialize
/// produces a 422 `{"detail": ...}` instead of a plain-text 400.
///
/// Segments are percent-decoded and otherwise taken verbatim.
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(ApiPath(value))
    }
}

/// Path parameters taken as free text.
///
/// Each segment is cut from the raw request path and percent-decoded
/// lossily, so bytes that are not UTF-8 become U+FFFD instead of failing the
/// request. Encoded slashes stay inside their segment.
pub struct TextPath {
    params: Vec<(String, String)>,
}

impl TextPath {
    fn from_pattern(pattern: &str, path: &str) -> Self {
        let params = pattern
            .split('/')
            .zip(path.split('/'))
            .filter_map(|(pattern, raw)| {
                let name = pattern.strip_prefix(':')?;
                let value = percent_decode_str(raw).decode_utf8_lossy().into_owned();
                Some((name.to_string(), value))
            })
            .collect();
        Self { params }
    }

    /// Remove a parameter by its route name. Unknown names yield "".
    pub fn take(&mut self, name: &str) -> String {
        match self.params.iter().position(|(n, _)| n == name) {
            Some(i) => self.params.swap_remove(i).1,
            None => String::new(),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for TextPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let matched = MatchedPath::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::InvalidInput(rejection.body_text()))?;
        Ok(TextPath::from_pattern(matched.as_str(), parts.uri.path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_path_decodes_segments() {
        let mut params = TextPath::from_pattern("/cache/:key/:value", "/cache/hello%20world/a%2Fb");
        assert_eq!(params.take("value"), "a/b");
        assert_eq!(params.take("key"), "hello world");
        assert_eq!(params.take("key"), "");
    }

    #[test]
    fn test_text_path_invalid_utf8_is_lossy() {
        let mut params = TextPath::from_pattern("/note/:note", "/note/caf%C3%A9%FF");
        assert_eq!(params.take("note"), "café\u{FFFD}");
    }
}
