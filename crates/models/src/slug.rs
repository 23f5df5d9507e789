//! URL slugs derived from client names.
//!
//! `slugify` is pure; uniqueness against stored rows is the service layer's job,
//! which probes [`candidate`] values in order.

/// Base used when a name contains nothing sluggable.
pub const FALLBACK_SLUG: &str = "client";

/// Longest base slug. Leaves room for a `-N` suffix inside `clients.slug` (varchar 255).
pub const MAX_BASE_LEN: usize = 240;

/// Lowercase, transliterate Latin accents, keep `[a-z0-9]`, and join words with `-`.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            push_word(&mut out, &mut pending_dash, ch);
        } else if let Some(ascii) = transliterate(ch) {
            for c in ascii.chars() {
                push_word(&mut out, &mut pending_dash, c);
            }
        } else if is_separator(ch) {
            pending_dash = true;
        }
    }

    // only ASCII is pushed, so any byte index is a char boundary
    out.truncate(MAX_BASE_LEN);
    let trimmed = out.trim_end_matches('-');
    if trimmed.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        trimmed.to_string()
    }
}

/// The `n`-th probe for `base`: `base`, `base-1`, `base-2`, ...
pub fn candidate(base: &str, n: u32) -> String {
    if n == 0 {
        base.to_string()
    } else {
        format!("{base}-{n}")
    }
}

fn push_word(out: &mut String, pending_dash: &mut bool, c: char) {
    if *pending_dash && !out.is_empty() {
        out.push('-');
    }
    *pending_dash = false;
    out.push(c);
}

fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '-' | '_' | '.' | '/' | '\\' | '&' | '+' | ',' | ':' | ';' | '|' | '@')
}

fn transliterate(ch: char) -> Option<&'static str> {
    let s = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ą' | 'ă' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => "e",
        'ğ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'ı' => "i",
        'ł' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ř' => "r",
        'ś' | 'š' | 'ş' => "s",
        'ß' => "ss",
        'ť' | 'ţ' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(s)
}
