//! Rendering use case - turns accepted items into an HTML digest

use std::collections::BTreeMap;

use html_escape::{encode_double_quoted_attribute, encode_text};
use time::Date;

use crate::model::{Item, RenderedDigest};

/// Configuration for the renderer
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Heading shown at the top of the digest
    pub title: String,
    /// Subject line prefix; the date is appended
    pub subject_prefix: String,
    /// Keywords listed per item before collapsing into "+N more"
    pub max_keywords_shown: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "Defence & Security Intelligence Digest".to_string(),
            subject_prefix: "Defence Intelligence Digest".to_string(),
            max_keywords_shown: 5,
        }
    }
}

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; }
        h2 { color: #2c3e50; border-bottom: 2px solid #3498db; padding-bottom: 10px; }
        h3 { color: #34495e; margin-top: 30px; }
        .article { margin: 20px 0; padding: 15px; background-color: #f8f9fa; border-left: 4px solid #3498db; }
        .article-title { font-size: 16px; font-weight: bold; color: #2c3e50; margin-bottom: 8px; }
        .article-title a { color: #2c3e50; text-decoration: none; }
        .article-meta { font-size: 12px; color: #7f8c8d; margin-bottom: 8px; }
        .article-summary { font-size: 14px; color: #34495e; line-height: 1.6; }
        .keywords { font-size: 11px; color: #16a085; font-weight: bold; margin-top: 8px; }
        .stats { background-color: #ecf0f1; padding: 15px; border-radius: 5px; margin-bottom: 20px; }
"#;

/// Renderer for the digest document
pub struct DigestRenderer {
    config: RenderConfig,
}

impl DigestRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render `items` into one digest stamped with `today`
    pub fn render(&self, items: &[Item], today: Date) -> RenderedDigest {
        let date = format_date(today);
        let subject = format!("{} - {}", self.config.subject_prefix, date);

        if items.is_empty() {
            return RenderedDigest {
                subject,
                html: self.render_empty(&date),
                item_count: 0,
                source_count: 0,
            };
        }

        // BTreeMap orders sources by name; Vec keeps ingestion order within one
        let mut by_source: BTreeMap<&str, Vec<&Item>> = BTreeMap::new();
        for item in items {
            by_source.entry(item.source.as_str()).or_default().push(item);
        }

        let mut html = format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <style>{style}</style>
</head>
<body>
    <h2>{title}</h2>
    <p><em>{date}</em></p>

    <div class="stats">
        <strong>{count} new articles</strong> across {sources} sources
    </div>
"#,
            style = STYLE,
            title = encode_text(&self.config.title),
            date = date,
            count = items.len(),
            sources = by_source.len(),
        );

        for (source, source_items) in &by_source {
            html.push_str(&format!(
                "\n    <h3>{} ({})</h3>\n",
                encode_text(source),
                source_items.len()
            ));
            for item in source_items {
                self.render_item(&mut html, item);
            }
        }

        html.push_str("</body>\n</html>\n");

        RenderedDigest {
            subject,
            html,
            item_count: items.len(),
            source_count: by_source.len(),
        }
    }

    fn render_empty(&self, date: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<body>
    <h2>{title}</h2>
    <p><em>{date}</em></p>
    <p>No new articles matching your keywords today.</p>
</body>
</html>
"#,
            title = encode_text(&self.config.title),
            date = date,
        )
    }

    fn render_item(&self, html: &mut String, item: &Item) {
        html.push_str(&format!(
            r#"
    <div class="article">
        <div class="article-title">
            <a href="{link}" target="_blank">{title}</a>
        </div>
        <div class="article-meta">{published}</div>
        <div class="article-summary">{summary}</div>
        <div class="keywords">Matched: {keywords}</div>
    </div>
"#,
            link = encode_double_quoted_attribute(&item.link),
            title = encode_text(&item.title),
            published = encode_text(&item.published),
            summary = encode_text(&item.summary),
            keywords = encode_text(&self.format_keywords(&item.matched_keywords)),
        ));
    }

    /// First keywords verbatim, the remainder as a count (e.g. "a, b +2 more")
    fn format_keywords(&self, keywords: &[String]) -> String {
        let max = self.config.max_keywords_shown;
        let shown = keywords.iter().take(max).cloned().collect::<Vec<_>>().join(", ");
        if keywords.len() > max && shown.is_empty() {
            format!("+{} more", keywords.len())
        } else if keywords.len() > max {
            format!("{} +{} more", shown, keywords.len() - max)
        } else {
            shown
        }
    }
}

/// Format a date as "19 October 2026"
pub fn format_date(date: Date) -> String {
    format!("{:02} {} {}", date.day(), date.month(), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemId;
    use time::Month;

    fn today() -> Date {
        Date::from_calendar_date(2026, Month::October, 19).unwrap()
    }

    fn item(source: &str, title: &str, keywords: &[&str]) -> Item {
        Item {
            id: ItemId::derive(title, "https://example.com"),
            source: source.to_string(),
            title: title.to_string(),
            link: format!("https://example.com/{}", title.replace(' ', "-")),
            summary: "Summary text".to_string(),
            published: "Mon, 19 Oct 2026 08:00:00 +0000".to_string(),
            matched_keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn test_render_empty_digest() {
        let renderer = DigestRenderer::new(RenderConfig::default());
        let digest = renderer.render(&[], today());

        assert!(digest.html.contains("No new articles matching your keywords today."));
        assert!(digest.html.contains("19 October 2026"));
        assert_eq!(digest.subject, "Defence Intelligence Digest - 19 October 2026");
        assert_eq!(digest.item_count, 0);
        assert_eq!(digest.source_count, 0);
    }

    #[test]
    fn test_render_orders_sources_by_name() {
        let renderer = DigestRenderer::new(RenderConfig::default());
        let items = vec![
            item("Zeta", "Zeta story", &["ISR"]),
            item("Alpha", "Alpha story", &["ISR"]),
        ];
        let digest = renderer.render(&items, today());

        let alpha = digest.html.find("<h3>Alpha (1)</h3>").unwrap();
        let zeta = digest.html.find("<h3>Zeta (1)</h3>").unwrap();
        assert!(alpha < zeta);
    }

    #[test]
    fn test_render_keeps_item_order_within_source() {
        let renderer = DigestRenderer::new(RenderConfig::default());
        let items = vec![
            item("Alpha", "Later first", &["ISR"]),
            item("Beta", "Other", &["ISR"]),
            item("Alpha", "Earlier second", &["ISR"]),
        ];
        let digest = renderer.render(&items, today());

        let first = digest.html.find("Later first").unwrap();
        let second = digest.html.find("Earlier second").unwrap();
        assert!(first < second);
        assert!(digest.html.contains("<h3>Alpha (2)</h3>"));
    }

    #[test]
    fn test_render_summary_line() {
        let renderer = DigestRenderer::new(RenderConfig::default());
        let items = vec![
            item("Alpha", "One", &["ISR"]),
            item("Alpha", "Two", &["ISR"]),
            item("Beta", "Three", &["ISR"]),
        ];
        let digest = renderer.render(&items, today());

        assert!(digest.html.contains("<strong>3 new articles</strong> across 2 sources"));
        assert_eq!(digest.item_count, 3);
        assert_eq!(digest.source_count, 2);
    }

    #[test]
    fn test_render_keyword_overflow() {
        let renderer = DigestRenderer::new(RenderConfig::default());
        let items = vec![item(
            "Alpha",
            "Busy",
            &["k1", "k2", "k3", "k4", "k5", "k6", "k7"],
        )];
        let digest = renderer.render(&items, today());

        assert!(digest.html.contains("Matched: k1, k2, k3, k4, k5 +2 more"));
        assert!(!digest.html.contains("k6"));
    }

    #[test]
    fn test_render_exactly_max_keywords_has_no_suffix() {
        let renderer = DigestRenderer::new(RenderConfig::default());
        let items = vec![item("Alpha", "Five", &["k1", "k2", "k3", "k4", "k5"])];
        let digest = renderer.render(&items, today());

        assert!(digest.html.contains("Matched: k1, k2, k3, k4, k5</div>"));
    }

    #[test]
    fn test_render_zero_keywords_shown_lists_only_count() {
        let renderer = DigestRenderer::new(RenderConfig {
            max_keywords_shown: 0,
            ..RenderConfig::default()
        });
        let items = vec![item(
            "Alpha",
            "Busy",
            &["k1", "k2", "k3", "k4", "k5", "k6", "k7"],
        )];
        let digest = renderer.render(&items, today());

        assert!(digest.html.contains("Matched: +7 more</div>"));
        assert!(!digest.html.contains("Matched:  "));
    }

    #[test]
    fn test_render_escapes_feed_content() {
        let renderer = DigestRenderer::new(RenderConfig::default());
        let mut hostile = item("A&B <News>", "<script>alert(1)</script>", &["ISR"]);
        hostile.link = "https://example.com/?a=1&b=\"2\"".to_string();
        let digest = renderer.render(&[hostile], today());

        assert!(!digest.html.contains("<script>"));
        assert!(digest.html.contains("&lt;script&gt;"));
        assert!(digest.html.contains("A&amp;B &lt;News&gt;"));
        assert!(digest.html.contains("href=\"https://example.com/?a=1&amp;b=&quot;2&quot;\""));
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = DigestRenderer::new(RenderConfig::default());
        let items = vec![item("Alpha", "One", &["ISR"])];
        assert_eq!(renderer.render(&items, today()), renderer.render(&items, today()));
    }

    #[test]
    fn test_format_date_pads_day() {
        let date = Date::from_calendar_date(2026, Month::March, 5).unwrap();
        assert_eq!(format_date(date), "05 March 2026");
    }
}
