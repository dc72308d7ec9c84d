//! HTML pages for the web UI.
//!
//! Markup is built with `format!`; there is no template engine. Everything
//! that originates from the user or the model goes through [`escape_html`]
//! before it lands in a page.

use atelier::{Campaign, MarketContext};

const STYLE: &str = "\
body { max-width: 46rem; margin: 2rem auto; padding: 0 1rem; \
font-family: system-ui, sans-serif; color: #1a1a2e; }
h1 { margin-bottom: 0.25rem; }
p.caption { color: #666; margin-top: 0; }
p.context { background: #eef4fb; border-radius: 6px; padding: 0.75rem; }
p.error { background: #fdecea; border-radius: 6px; padding: 0.75rem; color: #b71c1c; }
label { display: block; margin-top: 1rem; font-weight: 600; }
input, textarea, select { width: 100%; box-sizing: border-box; margin-top: 0.25rem; \
padding: 0.5rem; font: inherit; font-weight: 400; }
button { margin-top: 1.5rem; padding: 0.6rem 2rem; font: inherit; }
pre.markdown { white-space: pre-wrap; background: #f7f7f9; border-radius: 6px; \
padding: 1rem; line-height: 1.5; }";

fn layout(body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>Creative Agent</title>\n\
         <style>{STYLE}</style>\n\
         </head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

/// The brief form with the current market context line and an optional error
/// banner from a failed run.
pub(crate) fn form_page(ctx: &MarketContext, error: Option<&str>) -> String {
    let context_line = escape_html(&format!(
        "\u{1F4C5} {} | Current events: {}",
        ctx.context_note,
        ctx.cultural_events.join(", ")
    ));
    let banner = match error {
        Some(message) => format!("<p class=\"error\">{}</p>\n", escape_html(message)),
        None => String::new(),
    };
    let body = format!(
        "<h1>Creative Agent</h1>\n\
         <p class=\"caption\">AI-powered multi-step creative generator (Gemini) - Enhanced for KSA Market</p>\n\
         <p class=\"context\">{context_line}</p>\n\
         {banner}\
         <form method=\"post\" action=\"/generate\">\n\
         <label>Product\n\
         <input name=\"product\" placeholder=\"e.g., Cycls Smart Bottle\">\n\
         </label>\n\
         <label>Description\n\
         <textarea name=\"description\" rows=\"5\" placeholder=\"Briefly describe the product, features, or offer\"></textarea>\n\
         </label>\n\
         <label>Audience\n\
         <input name=\"audience\" placeholder=\"e.g., health-conscious millennials in Riyadh\">\n\
         </label>\n\
         <label>Tone\n\
         <input name=\"tone\" placeholder=\"e.g., friendly, inspiring, bold\">\n\
         </label>\n\
         <label>Language\n\
         <select name=\"language\">\n\
         <option>English</option>\n\
         <option>Arabic</option>\n\
         </select>\n\
         </label>\n\
         <button type=\"submit\">Generate</button>\n\
         </form>"
    );
    layout(&body)
}

/// The finished campaign. The Markdown document is shown verbatim in a
/// `<pre>` block; the JSON API carries the structured version.
pub(crate) fn result_page(campaign: &Campaign) -> String {
    let body = format!(
        "<h1>Creative Agent</h1>\n\
         <p class=\"caption\">Campaign for {}</p>\n\
         <pre class=\"markdown\">{}</pre>\n\
         <p><a href=\"/\">New brief</a></p>",
        escape_html(&campaign.brief.product),
        escape_html(&campaign.markdown)
    );
    layout(&body)
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
