use std::fmt::Write;

use tracing::debug;

use crate::error::ConvertError;
use crate::report::model::{Finding, Report, Turn};
use crate::report::summary::SeveritySummary;

const STYLESHEET: &str = include_str!("assets/report.css");

pub const DEFAULT_TITLE: &str = "Snyk AI Red Teaming Report";
pub const DEFAULT_HEADING: &str = "Security Testing Report";
pub const DEFAULT_LOGO_URL: &str = "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcTTo9xa5PaelKqiwn19sGlbme64pSprOrzzgTt3OvUc-sLafDhiDLmC6c2Far3PmOxhrN0&usqp=CAU";
pub const DEFAULT_PRODUCT_LABEL: &str = "Generated by Snyk Security Testing Tool";

/// Static parts of the document that do not come from the report itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Document `<title>`
    pub title: String,
    /// Header heading next to the logo
    pub heading: String,
    pub logo_url: String,
    /// Footer label naming the producing tool
    pub product_label: String,
    /// Footer timestamp, already formatted
    pub generated_at: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            title: DEFAULT_TITLE.to_string(),
            heading: DEFAULT_HEADING.to_string(),
            logo_url: DEFAULT_LOGO_URL.to_string(),
            product_label: DEFAULT_PRODUCT_LABEL.to_string(),
            generated_at: chrono::Local::now().format("%Y-%m-%d").to_string(),
        }
    }
}

/// Render a parsed report into a self-contained HTML document.
///
/// Every value taken from the report is escaped before it reaches the output.
pub fn render(
    report: &Report,
    summary: &SeveritySummary,
    options: &RenderOptions,
) -> Result<String, ConvertError> {
    let mut html = String::with_capacity(STYLESHEET.len() + 4096 * (report.results.len() + 1));
    write_document(&mut html, report, summary, options).map_err(ConvertError::Render)?;
    debug!("Rendered {} result cards ({} bytes)", report.results.len(), html.len());
    Ok(html)
}

fn write_document(
    out: &mut String,
    report: &Report,
    summary: &SeveritySummary,
    options: &RenderOptions,
) -> std::fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "    <meta charset=\"UTF-8\">")?;
    writeln!(out, "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">")?;
    writeln!(out, "    <title>{}</title>", escape(&options.title))?;
    writeln!(out, "    <style>\n{}    </style>", STYLESHEET)?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "    <div class=\"container\">")?;

    // Header
    writeln!(out, "        <div class=\"header\">")?;
    writeln!(
        out,
        "            <img src=\"{}\" alt=\"Logo\" class=\"logo\">",
        escape(&options.logo_url)
    )?;
    writeln!(out, "            <div class=\"header-content\">")?;
    writeln!(out, "                <h1>{}</h1>", escape(&options.heading))?;
    writeln!(
        out,
        "                <div class=\"report-id\">Report ID: {}</div>",
        escape(&report.id)
    )?;
    writeln!(out, "            </div>")?;
    writeln!(out, "        </div>")?;

    // Summary
    writeln!(out, "        <div class=\"summary\">")?;
    for (label, count) in [
        ("Total Findings", summary.total),
        ("High Severity", summary.high),
        ("Medium Severity", summary.medium),
        ("Low Severity", summary.low),
    ] {
        writeln!(out, "            <div class=\"summary-item\">")?;
        writeln!(out, "                <h3>{}</h3>", label)?;
        writeln!(out, "                <div class=\"number\">{}</div>", count)?;
        writeln!(out, "            </div>")?;
    }
    writeln!(out, "        </div>")?;

    for finding in &report.results {
        write_result_card(out, finding)?;
    }

    // Footer
    writeln!(out, "        <div class=\"footer\">")?;
    writeln!(out, "            <p>{}</p>", escape(&options.product_label))?;
    writeln!(
        out,
        "            <p>Report generated on {}</p>",
        escape(&options.generated_at)
    )?;
    writeln!(out, "        </div>")?;
    writeln!(out, "    </div>")?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}

fn write_result_card(out: &mut String, finding: &Finding) -> std::fmt::Result {
    writeln!(out, "        <div class=\"result-card\">")?;
    writeln!(out, "            <div class=\"result-header\">")?;
    writeln!(
        out,
        "                <span class=\"severity-badge severity-{}\">{}</span>",
        severity_class(&finding.severity),
        escape(&finding.severity)
    )?;
    writeln!(out, "                <div class=\"result-title\">")?;
    writeln!(out, "                    <h2>{}</h2>", escape(&finding.definition.name))?;
    writeln!(
        out,
        "                    <p class=\"result-description\">{}</p>",
        escape(&finding.definition.description)
    )?;
    writeln!(
        out,
        "                    <p class=\"result-id\">Definition ID: {}</p>",
        escape(&finding.definition.id)
    )?;
    writeln!(
        out,
        "                    <p class=\"result-id\">Result ID: {}</p>",
        escape(&finding.id)
    )?;
    writeln!(out, "                </div>")?;
    writeln!(out, "            </div>")?;

    writeln!(out, "            <div class=\"section\">")?;
    writeln!(out, "                <div class=\"section-title\">Target URL</div>")?;
    if is_linkable(&finding.url) {
        writeln!(
            out,
            "                <a href=\"{url}\" class=\"url-link\" target=\"_blank\" rel=\"noopener noreferrer\">{url}</a>",
            url = escape(&finding.url)
        )?;
    } else {
        writeln!(
            out,
            "                <span class=\"url-link\">{}</span>",
            escape(&finding.url)
        )?;
    }
    writeln!(out, "            </div>")?;

    if !finding.turns.is_empty() {
        write_turns(out, &finding.turns)?;
    }

    if let Some(reason) = finding.evidence_reason() {
        writeln!(out, "            <div class=\"section\">")?;
        writeln!(out, "                <div class=\"section-title\">Evidence</div>")?;
        writeln!(out, "                <div class=\"evidence\">")?;
        writeln!(out, "                    <div class=\"evidence-title\">Analysis Reason</div>")?;
        writeln!(
            out,
            "                    <div class=\"evidence-reason\">{}</div>",
            escape(reason)
        )?;
        writeln!(out, "                </div>")?;
        writeln!(out, "            </div>")?;
    }

    writeln!(out, "        </div>")
}

fn write_turns(out: &mut String, turns: &[Turn]) -> std::fmt::Result {
    writeln!(out, "            <div class=\"section\">")?;
    writeln!(
        out,
        "                <div class=\"section-title\">Conversation Turns ({})</div>",
        turns.len()
    )?;
    writeln!(out, "                <div class=\"turns-container\">")?;
    for (index, turn) in turns.iter().enumerate() {
        let number = index + 1;
        for (label, text) in [("Request", &turn.request), ("Response", &turn.response)] {
            writeln!(out, "                    <div class=\"turn\">")?;
            writeln!(
                out,
                "                        <div class=\"turn-label\">{} {}</div>",
                label, number
            )?;
            // turn-content is pre-wrap, so the text goes in without added indentation
            writeln!(
                out,
                "                        <div class=\"turn-content\">{}</div>",
                escape(text)
            )?;
            writeln!(out, "                    </div>")?;
        }
    }
    writeln!(out, "                </div>")?;
    writeln!(out, "            </div>")
}

/// Escape markup-significant characters for use in text and attribute values
pub fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// CSS class suffix for a severity badge.
///
/// Unknown severities still produce a class, it just has no matching style.
pub fn severity_class(severity: &str) -> String {
    severity
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Web URLs and scheme-less (relative) values become live links. Any other
/// scheme, such as `javascript:` or `data:`, is shown as text only.
fn is_linkable(url: &str) -> bool {
    // Browsers drop tabs, newlines and leading controls before reading the scheme
    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect::<String>()
        .to_ascii_lowercase();

    if cleaned.is_empty() {
        return false;
    }

    match url_scheme(&cleaned) {
        Some(scheme) => scheme == "http" || scheme == "https",
        None => true,
    }
}

/// Scheme of a URL, if the text before the first `:` forms one
fn url_scheme(url: &str) -> Option<&str> {
    let end = url.find([':', '/', '?', '#'])?;
    if !url[end..].starts_with(':') {
        return None;
    }
    let scheme = &url[..end];
    let valid = scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::model::{Definition, Evidence, EvidenceContent};

    fn options() -> RenderOptions {
        RenderOptions {
            generated_at: "2025-11-10".to_string(),
            ..Default::default()
        }
    }

    fn finding(id: &str, severity: &str) -> Finding {
        Finding {
            id: id.to_string(),
            definition: Definition {
                id: format!("def-{}", id),
                name: format!("Finding {}", id),
                description: "Model follows injected instructions".to_string(),
            },
            severity: severity.to_string(),
            url: "https://target.example/chat".to_string(),
            ..Default::default()
        }
    }

    fn render_report(report: &Report) -> String {
        let summary = SeveritySummary::from_findings(&report.results);
        render(report, &summary, &options()).unwrap()
    }

    fn summary_number(html: &str, label: &str) -> String {
        let start = html.find(&format!("<h3>{}</h3>", label)).unwrap();
        let rest = &html[start..];
        let open = rest.find("<div class=\"number\">").unwrap() + "<div class=\"number\">".len();
        let close = rest[open..].find("</div>").unwrap();
        rest[open..open + close].to_string()
    }

    #[test]
    fn test_empty_report() {
        let report = Report {
            id: "r1".to_string(),
            results: vec![],
        };
        let html = render_report(&report);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Report ID: r1"));
        assert_eq!(summary_number(&html, "Total Findings"), "0");
        assert_eq!(summary_number(&html, "High Severity"), "0");
        assert_eq!(summary_number(&html, "Medium Severity"), "0");
        assert_eq!(summary_number(&html, "Low Severity"), "0");
        assert_eq!(html.matches("class=\"result-card\"").count(), 0);
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_card_count_matches_total() {
        let report = Report {
            id: "r2".to_string(),
            results: vec![finding("a", "high"), finding("b", "weird"), finding("c", "Low")],
        };
        let html = render_report(&report);
        assert_eq!(summary_number(&html, "Total Findings"), "3");
        assert_eq!(html.matches("class=\"result-card\"").count(), 3);
    }

    #[test]
    fn test_cards_follow_input_order() {
        let report = Report {
            id: "r".to_string(),
            results: vec![finding("zeta", "low"), finding("alpha", "high")],
        };
        let html = render_report(&report);
        let zeta = html.find("Result ID: zeta").unwrap();
        let alpha = html.find("Result ID: alpha").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn test_mixed_case_severity_keeps_badge_text() {
        let report = Report {
            id: "r".to_string(),
            results: vec![finding("a", "High")],
        };
        let html = render_report(&report);
        assert_eq!(summary_number(&html, "High Severity"), "1");
        assert!(html.contains("<span class=\"severity-badge severity-high\">High</span>"));
    }

    #[test]
    fn test_unknown_severity_still_renders() {
        let report = Report {
            id: "r".to_string(),
            results: vec![finding("a", "Critical \"x\"")],
        };
        let html = render_report(&report);
        assert!(html.contains("severity-badge severity-critical--x-\">Critical &#34;x&#34;</span>"));
        assert_eq!(summary_number(&html, "High Severity"), "0");
    }

    #[test]
    fn test_turns_and_evidence_rendered() {
        let mut f = finding("a", "medium");
        f.turns = vec![
            Turn {
                request: "first question".to_string(),
                response: "first answer".to_string(),
            },
            Turn {
                request: "second question".to_string(),
                response: "second answer".to_string(),
            },
        ];
        f.evidence = Evidence {
            kind: "llm".to_string(),
            content: EvidenceContent {
                reason: "The model revealed its instructions".to_string(),
            },
        };
        let report = Report {
            id: "r".to_string(),
            results: vec![f],
        };
        let html = render_report(&report);

        assert!(html.contains("Conversation Turns (2)"));
        assert_eq!(html.matches("<div class=\"turn\">").count(), 4);
        assert_eq!(html.matches("<div class=\"evidence\">").count(), 1);
        assert!(html.contains("The model revealed its instructions"));

        let positions: Vec<usize> = [
            "Request 1</div>",
            "first question",
            "Response 1</div>",
            "first answer",
            "Request 2</div>",
            "second question",
            "Response 2</div>",
            "second answer",
        ]
        .iter()
        .map(|needle| html.find(needle).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(!html.contains("Request 3"));
        assert!(!html.contains("Request 0"));
    }

    #[test]
    fn test_empty_sections_omitted() {
        let report = Report {
            id: "r".to_string(),
            results: vec![finding("a", "low")],
        };
        let html = render_report(&report);
        assert!(!html.contains("Conversation Turns"));
        assert!(!html.contains("<div class=\"turns-container\">"));
        assert!(!html.contains("<div class=\"evidence\">"));
        assert!(!html.contains("Analysis Reason"));
    }

    #[test]
    fn test_untrusted_text_is_escaped() {
        let payload = "<script>alert('x')</script> & \"quoted\"";
        let mut f = finding("a", "high");
        f.definition.name = payload.to_string();
        f.definition.description = payload.to_string();
        f.turns = vec![Turn {
            request: payload.to_string(),
            response: payload.to_string(),
        }];
        f.evidence.content.reason = payload.to_string();
        let report = Report {
            id: payload.to_string(),
            results: vec![f],
        };
        let html = render_report(&report);

        assert!(!html.contains("<script>"));
        assert!(!html.contains("alert('x')"));
        let escaped = "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; &#34;quoted&#34;";
        // report id, name, description, request, response, reason
        assert_eq!(html.matches(escaped).count(), 6);
    }

    #[test]
    fn test_whitespace_preserved_in_turns() {
        let mut f = finding("a", "low");
        f.turns = vec![Turn {
            request: "line one\n    indented\nline three".to_string(),
            response: String::new(),
        }];
        let report = Report {
            id: "r".to_string(),
            results: vec![f],
        };
        let html = render_report(&report);
        assert!(html.contains("<div class=\"turn-content\">line one\n    indented\nline three</div>"));
    }

    #[test]
    fn test_url_link_only_for_web_schemes() {
        let mut safe = finding("a", "low");
        safe.url = "https://target.example/?q=1&r=\"2\"".to_string();
        let mut unsafe_url = finding("b", "low");
        unsafe_url.url = "javascript:alert(1)".to_string();
        let report = Report {
            id: "r".to_string(),
            results: vec![safe, unsafe_url],
        };
        let html = render_report(&report);
        assert!(html.contains("<a href=\"https://target.example/?q=1&amp;r=&#34;2&#34;\""));
        assert!(!html.contains("href=\"javascript:"));
        assert!(html.contains("<span class=\"url-link\">javascript:alert(1)</span>"));
    }

    #[test]
    fn test_scheme_less_url_is_linked() {
        let mut relative = finding("a", "low");
        relative.url = "target.example/chat".to_string();
        let mut hidden_scheme = finding("b", "low");
        hidden_scheme.url = " java\tscript:alert(1)".to_string();
        let mut data_url = finding("c", "low");
        data_url.url = "DATA:text/html,<b>x</b>".to_string();
        let report = Report {
            id: "r".to_string(),
            results: vec![relative, hidden_scheme, data_url],
        };
        let html = render_report(&report);
        assert!(html.contains("<a href=\"target.example/chat\""));
        assert_eq!(html.matches("<a href=").count(), 1);
        assert!(html.contains("<span class=\"url-link\">DATA:text/html,&lt;b&gt;x&lt;/b&gt;</span>"));
    }

    #[test]
    fn test_is_linkable() {
        assert!(is_linkable("https://target.example"));
        assert!(is_linkable("HTTP://target.example"));
        assert!(is_linkable("/relative/path?next=javascript:x"));
        assert!(is_linkable("target.example/chat"));
        assert!(!is_linkable(""));
        assert!(!is_linkable("javascript:alert(1)"));
        assert!(!is_linkable("vbscript:msgbox"));
        assert!(!is_linkable("data:text/html,hi"));
    }

    #[test]
    fn test_footer_uses_options() {
        let report = Report::default();
        let opts = RenderOptions {
            product_label: "Internal <build>".to_string(),
            generated_at: "2024-01-02".to_string(),
            ..Default::default()
        };
        let html = render(&report, &SeveritySummary::default(), &opts).unwrap();
        assert!(html.contains("<p>Internal &lt;build&gt;</p>"));
        assert!(html.contains("Report generated on 2024-01-02"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let mut f = finding("a", "High");
        f.turns = vec![Turn::default()];
        let report = Report {
            id: "r".to_string(),
            results: vec![f, finding("b", "low")],
        };
        assert_eq!(render_report(&report), render_report(&report));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain text"), "plain text");
        assert_eq!(escape("a<b>&'\""), "a&lt;b&gt;&amp;&#39;&#34;");
    }

    #[test]
    fn test_severity_class() {
        assert_eq!(severity_class("High"), "high");
        assert_eq!(severity_class("very high"), "very-high");
        assert_eq!(severity_class("x\" onclick=\"y"), "x--onclick--y");
    }
}
