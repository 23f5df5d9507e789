//! Short functional email bodies. Every interpolated value is HTML-escaped.

use super::OutgoingEmail;

pub fn otp(to: &str, code: &str, ttl_minutes: i64) -> OutgoingEmail {
    let code = escape(code);
    OutgoingEmail {
        to: to.to_string(),
        subject: "Your password reset code".into(),
        html: format!(
            "<p>Your verification code is <strong>{code}</strong>.</p>\
             <p>It expires in {ttl_minutes} minutes.</p>"
        ),
    }
}

pub fn client_welcome(to: &str, greeting: &str, public_url: &str, reviews_url: &str) -> OutgoingEmail {
    let (greeting, public_url, reviews_url) = (escape(greeting), escape(public_url), escape(reviews_url));
    OutgoingEmail {
        to: to.to_string(),
        subject: "Your review page is ready".into(),
        html: format!(
            "<p>Hello {greeting},</p>\
             <p>Your public page: <a href=\"{public_url}\">{public_url}</a></p>\
             <p>Collected reviews: <a href=\"{reviews_url}\">{reviews_url}</a></p>"
        ),
    }
}

/// `renamed` adds a note that the business name, and with it the page address, changed.
pub fn client_updated(to: &str, greeting: &str, public_url: &str, reviews_url: &str, renamed: bool) -> OutgoingEmail {
    let (greeting, public_url, reviews_url) = (escape(greeting), escape(public_url), escape(reviews_url));
    let link_note = if renamed {
        format!("<p>Your business name changed. Your public page is now <a href=\"{public_url}\">{public_url}</a>.</p>")
    } else {
        format!("<p>Your public page: <a href=\"{public_url}\">{public_url}</a></p>")
    };
    OutgoingEmail {
        to: to.to_string(),
        subject: "Your account was updated".into(),
        html: format!(
            "<p>Hello {greeting},</p><p>Your account details were updated.</p>{link_note}\
             <p>Collected reviews: <a href=\"{reviews_url}\">{reviews_url}</a></p>"
        ),
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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
