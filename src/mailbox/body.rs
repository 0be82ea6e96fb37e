// src/mailbox/body.rs
// =============================================================================
// This module reads a message body the way a mail client hands it to us:
// once as HTML, once as plain text.
//
// Why both?
// - Some clients and gateways sanitize one of them (strip hrefs from the HTML,
//   or drop comments where a template put its marker)
// - The resolver doesn't care which half the link is in, so we just glue
//   them together: html + "\n" + text
//
// Reading is forgiving: a half that can't be read becomes empty and we carry
// on with the other one. Only when both are empty is there "no body".
//
// When no text file is given we derive the text half from the HTML with
// `scraper`, like a mail client's plain-text view would.
// =============================================================================

use std::path::Path;

use scraper::Html;
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

/// The two renderings of one message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageBody {
    pub html: String,
    pub text: String,
}

impl MessageBody {
    // The resolver's input: html + "\n" + text.
    //
    // Returns None when neither half has any content.
    pub fn combined(&self) -> Option<String> {
        if self.html.is_empty() && self.text.is_empty() {
            return None;
        }
        Some(format!("{}\n{}", self.html, self.text))
    }
}

// Reads the HTML half, then the text half.
//
// Parameters:
//   html_path: file with the HTML body ("-" = stdin), if any
//   text_path: file with the plain-text body ("-" = stdin), if any
//
// Unreadable files are logged and treated as empty.
pub async fn read_message_body(html_path: Option<&Path>, text_path: Option<&Path>) -> MessageBody {
    let html = read_half(html_path, "html").await;

    let text = match text_path {
        Some(_) => read_half(text_path, "text").await,
        None if !html.is_empty() => {
            debug!("no text body given, deriving it from the html body");
            html_to_text(&html)
        }
        None => String::new(),
    };

    MessageBody { html, text }
}

async fn read_half(path: Option<&Path>, kind: &str) -> String {
    let Some(path) = path else {
        return String::new();
    };

    let result = if path == Path::new("-") {
        let mut content = String::new();
        let read = tokio::io::stdin().read_to_string(&mut content).await;
        read.map(|_| content)
    } else {
        tokio::fs::read_to_string(path).await
    };

    match result {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read {} body", kind);
            String::new()
        }
    }
}

// Turns an HTML document into its visible text, one text node per line.
//
// Example:
//   "<p>Hello <b>you</b></p>" -> "Hello\nyou"
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    document
        .root_element()
        .text()
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
