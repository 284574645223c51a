//! Incoming message handling for the WhatsApp front end.

use log::info;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::day::detect_day;
use crate::time::TimeExtractor;

static PHONE_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \-()]").unwrap());

/// Normalize an Israeli phone number into a `whatsapp:+972…` address.
///
/// A leading `0` is replaced by `+972`; numbers without a `+` get `+972`
/// prepended. Returns `None` unless the result has 9 to 13 digits.
pub fn validate_israeli_number(number: &str) -> Option<String> {
    let mut number = PHONE_NOISE.replace_all(number, "").into_owned();
    if let Some(rest) = number.strip_prefix('0') {
        number = format!("+972{}", rest);
    } else if !number.starts_with('+') {
        number = format!("+972{}", number);
    }
    let digits = number.chars().filter(|c| c.is_ascii_digit()).count();
    if !(9..=13).contains(&digits) {
        return None;
    }
    Some(format!("whatsapp:{}", number))
}

/// Build the reply for one incoming message.
pub fn process_incoming_message(extractor: &TimeExtractor, body: &str, from_number: &str) -> String {
    info!("Incoming message from {}: {}", from_number, body);

    let mut reply = format!("היי! קיבלתי ממספר {} את: “{}” ✅", from_number, body);
    if let Some(time) = extractor.extract(body).time() {
        match detect_day(body) {
            Some(day) => reply.push_str(&format!("\nשעה: {} ({})", time, day.label())),
            None => reply.push_str(&format!("\nשעה: {}", time)),
        }
    }
    reply
}
