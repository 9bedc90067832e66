use lettre::Address;

use crate::assessment::{ScoredCategory, ScoredResult};

pub const RESULTS_SUBJECT: &str = "Your Wheel of Life Results";
pub const HIGHLIGHT_COUNT: usize = 3;

const INTRO: &str =
    "Thanks for completing the Wheel of Life assessment. Based on your answers, these are the areas where focused effort should make the biggest difference:";
const CLOSING: &str =
    "Small, consistent steps in your highest-priority areas create the most change. Revisit your wheel in a few weeks to see how far you have come.";
const SIGN_OFF: &str = "The Wheel of Life team";

/// A rendered results email, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub recipient: Address,
    pub recipient_name: Option<String>,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Render the results email for `recipient`, greeting `display_name` when given.
pub fn compose(
    result: &ScoredResult,
    recipient: &Address,
    display_name: Option<&str>,
) -> MailMessage {
    let display_name = display_name
        .map(str::trim)
        .filter(|name| !name.is_empty());
    let highlights = result.top(HIGHLIGHT_COUNT);

    MailMessage {
        recipient: recipient.clone(),
        recipient_name: display_name.map(str::to_string),
        subject: RESULTS_SUBJECT.to_string(),
        text_body: render_text(display_name, highlights),
        html_body: render_html(display_name, highlights),
    }
}

fn greeting(display_name: Option<&str>) -> String {
    match display_name {
        Some(name) => format!("Hi {name},"),
        None => "Hi there,".to_string(),
    }
}

fn score_line(entry: &ScoredCategory) -> String {
    format!(
        "Satisfaction {}/10 · Motivation {}/10 · Priority {}",
        entry.satisfaction, entry.motivation, entry.priority
    )
}

fn render_text(display_name: Option<&str>, highlights: &[ScoredCategory]) -> String {
    let mut body = String::new();
    body.push_str(&greeting(display_name));
    body.push_str("\n\n");
    body.push_str(INTRO);
    body.push_str("\n\n");

    for (rank, entry) in highlights.iter().enumerate() {
        body.push_str(&format!(
            "{}. {}\n   {}\n",
            rank + 1,
            entry.label,
            score_line(entry)
        ));
    }

    body.push('\n');
    body.push_str(CLOSING);
    body.push_str("\n\n");
    body.push_str(SIGN_OFF);
    body.push('\n');
    body
}

fn render_html(display_name: Option<&str>, highlights: &[ScoredCategory]) -> String {
    let mut html = String::new();
    html.push_str(&format!("<p>{}</p>\n", escape_html(&greeting(display_name))));
    html.push_str(&format!("<p>{}</p>\n<ol>\n", escape_html(INTRO)));

    for entry in highlights {
        html.push_str(&format!(
            "<li><strong>{}</strong><br>{}</li>\n",
            escape_html(entry.label),
            escape_html(&score_line(entry))
        ));
    }

    html.push_str("</ol>\n");
    html.push_str(&format!("<p>{}</p>\n", escape_html(CLOSING)));
    html.push_str(&format!("<p><em>{}</em></p>\n", escape_html(SIGN_OFF)));
    html
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
