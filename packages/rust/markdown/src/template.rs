//! The standalone right-to-left page an article is wrapped in.

/// Embedded stylesheet. Code blocks stay left-to-right inside the RTL page.
const STYLE: &str = r#"
    body {
      font-family: "Segoe UI", Tahoma, "Noto Naskh Arabic", Arial, sans-serif;
      line-height: 1.8;
      color: #222;
      background: #fafafa;
      max-width: 820px;
      margin: 0 auto;
      padding: 2rem 1.5rem;
    }
    h1, h2, h3 { color: #1a3d5c; line-height: 1.4; }
    h1 { border-bottom: 2px solid #1a3d5c; padding-bottom: 0.4rem; }
    a { color: #0b6bcb; }
    blockquote {
      margin: 1.2rem 0;
      padding: 0.6rem 1rem;
      border-right: 4px solid #2e8b57;
      background: #eef7f1;
      color: #234;
    }
    table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
    th, td { border: 1px solid #ccc; padding: 0.5rem 0.75rem; text-align: right; }
    th { background: #f0f3f6; }
    pre, code { direction: ltr; text-align: left; font-family: Consolas, monospace; }
    pre { background: #272822; color: #f8f8f2; padding: 1rem; overflow-x: auto; border-radius: 6px; }
    code { background: #f0f0f0; padding: 0.1rem 0.3rem; border-radius: 3px; }
    pre code { background: none; padding: 0; }
"#;

/// Wrap an HTML body fragment in the full page.
pub(crate) fn wrap_page(title: &str, body_html: &str) -> String {
    let title = html_escape::encode_text(title);
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"ar\" dir=\"rtl\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n\
         <style>{STYLE}</style>\n\
         </head>\n\
         <body>\n\
         <article>\n\
         {body_html}\
         </article>\n\
         </body>\n\
         </html>\n"
    )
}
