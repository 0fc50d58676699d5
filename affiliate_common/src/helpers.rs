use std::{fmt::Display, str::FromStr};

/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let value = match value {
        Some(v) => v,
        None => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Parse a numeric setting, returning the default if the value is missing or cannot be parsed.
///
/// The error message is returned alongside the default so that callers can log it in their own idiom.
pub fn parse_number_or_default<T>(value: Option<String>, default: T) -> (T, Option<String>)
where
    T: FromStr + Display,
    <T as FromStr>::Err: Display,
{
    match value {
        None => (default, None),
        Some(s) => match s.trim().parse::<T>() {
            Ok(v) => (v, None),
            Err(e) => {
                let msg = format!("'{s}' is not a valid value ({e}). Using the default, {default}");
                (default, Some(msg))
            },
        },
    }
}
