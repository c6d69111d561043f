//! Brazilian real formatting for amounts kept in cents.

/// Format cents as `R$ 1.234,56`.
pub fn format_brl(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}R$ {},{:02}", group_thousands(abs / 100), abs % 100)
}

/// Same as [`format_brl`] but shows `Grátis` for a zero amount.
pub fn format_price_or_free(cents: i64) -> String {
    if cents == 0 {
        "Grátis".to_string()
    } else {
        format_brl(cents)
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
