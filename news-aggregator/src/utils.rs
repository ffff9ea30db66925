/// Text processing utilities for headlines
pub mod text {
    /// Remove every `<...>` tag with a non-empty body. A lone `<` is kept.
    pub fn strip_tags(html: &str) -> String {
        let mut out = String::with_capacity(html.len());
        let mut rest = html;

        while let Some(start) = rest.find('<') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            match after.find('>') {
                Some(end) if end > 0 => rest = &after[end + 1..],
                _ => {
                    out.push('<');
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }

    /// Decode the five entities feeds commonly leave in titles.
    /// Decoding is sequential, so `&amp;lt;` ends up as `<`.
    pub fn decode_entities(text: &str) -> String {
        text.replace("&amp;", "&")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
    }

    /// Turn a raw feed title into plain text.
    pub fn clean_title(title: &str) -> String {
        decode_entities(&strip_tags(title)).trim().to_string()
    }

    /// Minimum length (exclusive) of a word that counts towards a title key.
    const SIGNIFICANT_WORD_LEN: usize = 3;
    const KEY_WORDS: usize = 5;

    /// Deduplication key for a headline: lowercase, punctuation as word
    /// breaks, short words dropped, first five remaining words.
    ///
    /// Titles with no significant word are the exception: keying them on
    /// significant words alone would give all of them the empty key, so "Oil
    /// up" and "Gas up" would merge. They key on all of their words instead.
    /// Only a title with no words at all gets the empty key.
    pub fn title_key(title: &str) -> String {
        let folded: String = title
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();

        let words: Vec<&str> = folded.split_whitespace().collect();
        let significant: Vec<&str> = words
            .iter()
            .copied()
            .filter(|word| word.chars().count() > SIGNIFICANT_WORD_LEN)
            .take(KEY_WORDS)
            .collect();

        if significant.is_empty() {
            words.join(" ")
        } else {
            significant.join(" ")
        }
    }
}

/// Time utilities for publication dates
pub mod time {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

    pub const DATE_PLACEHOLDER: &str = "Date unavailable";

    /// Parse a feed date. Accepts RFC 3339, RFC 2822, and the
    /// `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DD` forms conversion endpoints emit
    /// (taken as UTC).
    pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            return Some(naive.and_utc());
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }

        None
    }

    /// Relative age of an item as shown next to the headline.
    pub fn format_time_ago(published: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
        let Some(published) = published else {
            return DATE_PLACEHOLDER.to_string();
        };

        let minutes = now.signed_duration_since(published).num_minutes();
        let hours = minutes / 60;
        let days = hours / 24;

        if minutes < 1 {
            "Just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if hours < 24 {
            format!("{}h ago", hours)
        } else if days < 7 {
            format!("{}d ago", days)
        } else {
            published.format("%b %-d").to_string()
        }
    }
}

/// URL utilities for feed sources
pub mod url {
    use url::Url;

    /// Validate feed URL format
    pub fn is_valid_feed_url(url_str: &str) -> bool {
        if let Ok(url) = Url::parse(url_str) {
            url.scheme() == "http" || url.scheme() == "https"
        } else {
            false
        }
    }

    /// Address of `feed_url` behind a format-conversion endpoint.
    pub fn proxied_feed_url(proxy: &str, feed_url: &str) -> Result<Url, url::ParseError> {
        Url::parse_with_params(proxy, &[("rss_url", feed_url)])
    }
}
