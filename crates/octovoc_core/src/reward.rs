//! Helpers for the rewards shown when a module is completed.

/// Extracts the video id from a YouTube link.
///
/// Understands `youtube.com/watch?v=`, `youtu.be/`, `youtube.com/embed/` and `youtube.com/shorts/` links.
pub fn youtube_video_id(url: &str) -> Option<&str> {
    const PREFIXES: [&str; 4] = [
        "youtube.com/watch?v=",
        "youtu.be/",
        "youtube.com/embed/",
        "youtube.com/shorts/",
    ];

    PREFIXES.iter().find_map(|prefix| {
        let start = url.find(prefix)? + prefix.len();
        let rest = &url[start..];
        let end = rest
            .find(|c| matches!(c, '&' | '\n' | '?' | '#'))
            .unwrap_or(rest.len());
        let id = &rest[..end];
        (!id.is_empty()).then_some(id)
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn finds_watch_id() {
        assert_eq!(
            youtube_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn finds_short_link_id() {
        assert_eq!(youtube_video_id("https://youtu.be/dQw4w9WgXcQ?si=abc"), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn finds_embed_and_shorts_id() {
        assert_eq!(
            youtube_video_id("https://www.youtube.com/embed/abc123#start"),
            Some("abc123")
        );
        assert_eq!(youtube_video_id("https://youtube.com/shorts/xyz"), Some("xyz"));
    }

    #[test]
    fn ignores_other_links() {
        assert_eq!(youtube_video_id("https://vimeo.com/123"), None);
        assert_eq!(youtube_video_id("https://youtu.be/"), None);
    }
}
