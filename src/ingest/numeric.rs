/// Parse locale-ambiguous numeric cell text.
///
/// Shop-floor exports in this domain write "3.135,60" for three thousand:
/// when both separators appear, `.` is thousands and `,` is the decimal
/// point. A lone `,` is also decimal. Anything else parses as-is.
///
/// Empty or malformed text yields `None`, never zero and never an error;
/// hand-edited exports routinely contain a few broken cells and one of them
/// must not abort a multi-thousand-row comparison.
pub fn parse_locale_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let normalized = if text.contains('.') && text.contains(',') {
        text.replace('.', "").replace(',', ".")
    } else if text.contains(',') {
        text.replace(',', ".")
    } else {
        text.to_string()
    };

    normalized.parse::<f64>().ok()
}
