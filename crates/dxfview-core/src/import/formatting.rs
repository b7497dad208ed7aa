//! Inline text formatting removal.
//!
//! MTEXT content embeds layout markup: `{...}` groups, `\H2.5;` height,
//! `\C1;` color, `\fArial|b0;` font switches, `\S1^2;` stacked fractions,
//! `\P` paragraph breaks and a handful of `%%x` specials. The canvas draws a
//! single plain string, so all of it is reduced to text.

use std::iter::Peekable;
use std::str::Chars;

/// Strip inline formatting codes and trim the result.
pub fn strip_formatting(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' | '}' => {}
            '\\' => decode_escape(&mut chars, &mut out),
            '%' if chars.peek() == Some(&'%') => {
                chars.next();
                decode_special(&mut chars, &mut out);
            }
            '\n' | '\r' | '\t' => out.push(' '),
            _ => out.push(ch),
        }
    }

    out.trim().to_string()
}

fn decode_escape(chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    let Some(code) = chars.next() else {
        return;
    };
    match code {
        'P' | 'X' => out.push(' '),
        '~' => out.push(' '),
        '\\' | '{' | '}' => out.push(code),
        'S' => {
            let stacked = take_until_semicolon(chars);
            out.extend(
                stacked
                    .chars()
                    .map(|c| if c == '^' || c == '#' { '/' } else { c }),
            );
        }
        'U' if chars.peek() == Some(&'+') => {
            chars.next();
            let hex: String = (0..4).filter_map(|_| chars.next()).collect();
            if let Some(decoded) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                out.push(decoded);
            }
        }
        // Codes carrying an argument terminated by ';'.
        'H' | 'h' | 'C' | 'c' | 'F' | 'f' | 'T' | 't' | 'Q' | 'q' | 'W' | 'w' | 'A' | 'a'
        | 'p' => {
            take_until_semicolon(chars);
        }
        // Toggles without an argument: underline, overline, strike-through, column break.
        'L' | 'l' | 'O' | 'o' | 'K' | 'k' | 'N' => {}
        other => out.push(other),
    }
}

fn decode_special(chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    match chars.next() {
        Some('c' | 'C') => out.push('Ø'),
        Some('d' | 'D') => out.push('°'),
        Some('p' | 'P') => out.push('±'),
        Some('%') => out.push('%'),
        Some('u' | 'U' | 'o' | 'O') => {}
        Some(other) => {
            out.push_str("%%");
            out.push(other);
        }
        None => out.push_str("%%"),
    }
}

fn take_until_semicolon(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut taken = String::new();
    for ch in chars.by_ref() {
        if ch == ';' {
            break;
        }
        taken.push(ch);
    }
    taken
}
