//! HTML shell of the payment single-page app.
//!
//! The server does not render payment pages. It serves one static shell and
//! passes what the app needs through `data-*` attributes on `<body>`.

use axum::response::Html;

/// Values handed to the single-page app.
#[derive(Debug, Clone, Default)]
pub struct SpaShell<'a> {
    pub media_url: &'a str,
    /// Set for polling providers so the app knows where to poll.
    pub transaction_status_url: Option<&'a str>,
}

impl<'a> SpaShell<'a> {
    pub fn new(media_url: &'a str) -> Self {
        Self {
            media_url,
            transaction_status_url: None,
        }
    }

    pub fn with_transaction_status_url(mut self, url: &'a str) -> Self {
        self.transaction_status_url = Some(url);
        self
    }

    pub fn render(&self) -> Html<String> {
        let media = escape_attr(self.media_url);
        let mut body_attrs = format!(" data-media-url=\"{}\"", media);
        if let Some(url) = self.transaction_status_url {
            body_attrs.push_str(&format!(
                " data-transaction-status-url=\"{}\"",
                escape_attr(url)
            ));
        }

        Html(format!(
            "<!DOCTYPE html>\n\
             <html>\n\
             <head>\n\
             <meta charset=\"utf-8\">\n\
             <title>Payment</title>\n\
             <link rel=\"stylesheet\" href=\"{media}spa/app.css\">\n\
             </head>\n\
             <body{body_attrs}>\n\
             <div id=\"app\"></div>\n\
             <script src=\"{media}spa/app.js\"></script>\n\
             </body>\n\
             </html>\n"
        ))
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_shell_has_no_status_url() {
        let Html(page) = SpaShell::new("/media/").render();
        assert!(page.contains("data-media-url=\"/media/\""));
        assert!(!page.contains("data-transaction-status-url"));
    }

    #[test]
    fn status_url_is_exposed_to_the_app() {
        let Html(page) = SpaShell::new("/media/")
            .with_transaction_status_url("/mozpay/provider/transaction/T1/status")
            .render();
        assert!(page.contains(
            "data-transaction-status-url=\"/mozpay/provider/transaction/T1/status\""
        ));
    }

    #[test]
    fn attribute_values_are_escaped() {
        assert_eq!(escape_attr("\"><script>&'"), "&quot;&gt;&lt;script&gt;&amp;&#x27;");
    }
}
