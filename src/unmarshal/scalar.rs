/*
** This file is a part of Typedxml (typed XML object marshalling)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Typedxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use time::Date;
use time::OffsetDateTime;
use time::PrimitiveDateTime;
use time::UtcOffset;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use crate::Error;
use crate::Value;

const DATE_TIME_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"),
    format_description!("[year]/[month]/[day] [hour]:[minute]:[second][optional [.[subsecond]]]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
    format_description!("[year]/[month]/[day] [hour]:[minute]"),
];

const DATE_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day]"),
    format_description!("[year]/[month]/[day]"),
];

/// Kinds of values read from element text.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum ScalarKind {
    Bool,
    Int,
    Long,
    Float,
    DateTime,
    Base64,
    String,
}

impl ScalarKind {
    pub(super) fn from_token(token: &str) -> Option<ScalarKind> {
        match token {
            "bool" => Some(ScalarKind::Bool),
            "int" => Some(ScalarKind::Int),
            "long" => Some(ScalarKind::Long),
            "float" => Some(ScalarKind::Float),
            "DateTime" => Some(ScalarKind::DateTime),
            "base64" => Some(ScalarKind::Base64),
            "unicode" | "str" | "string" => Some(ScalarKind::String),
            _ => None,
        }
    }

    /// Converts the text of element `tag`.
    ///
    /// Numbers that cannot be read give [Value::Null], bad dates and bad
    /// base64 are errors.
    pub(super) fn convert(self, tag: &str, text: &str) -> Result<Value, Error> {
        let trimmed = text.trim();
        let number = match self {
            ScalarKind::Bool => parse_bool(trimmed).map(Value::Bool),
            ScalarKind::Int => parse_integer(trimmed).map(|n| match i64::try_from(n) {
                Ok(i) => Value::Int(i),
                Err(_) => Value::Long(n),
            }),
            ScalarKind::Long => parse_integer(trimmed).map(Value::Long),
            ScalarKind::Float => parse_float(trimmed).map(Value::Float),
            ScalarKind::DateTime => {
                return parse_date_time(trimmed)
                    .map(Value::DateTime)
                    .ok_or_else(|| Error::BadDateTime {
                        tag: tag.to_string(),
                        text: trimmed.to_string(),
                    });
            }
            ScalarKind::Base64 => {
                let compact: String = text.split_ascii_whitespace().collect();
                return BASE64_STANDARD
                    .decode(compact)
                    .map(Value::Binary)
                    .map_err(|source| Error::BadBase64 {
                        tag: tag.to_string(),
                        source,
                    });
            }
            ScalarKind::String => return Ok(Value::String(trimmed.to_string())),
        };
        Ok(number.unwrap_or_else(|| {
            log::debug!("cannot read '{}' of <{}> as {:?}, using null", trimmed, tag, self);
            Value::Null
        }))
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "True" => Some(true),
        "False" => Some(false),
        _ => parse_integer(text).map(|n| n != 0),
    }
}

// Integer literals with an optional sign, radix prefix and long suffix.
fn parse_integer(text: &str) -> Option<i128> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let rest = rest.strip_suffix(['L', 'l']).unwrap_or(rest);
    let (radix, digits) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        Some("0o") | Some("0O") => (8, &rest[2..]),
        Some("0b") | Some("0B") => (2, &rest[2..]),
        _ => (10, rest),
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = u128::from_str_radix(digits, radix).ok()?;
    if negative {
        0i128.checked_sub_unsigned(magnitude)
    } else {
        i128::try_from(magnitude).ok()
    }
}

fn parse_float(text: &str) -> Option<f64> {
    if text.starts_with(['+', '-']) && text[1..].starts_with(['+', '-']) {
        return None;
    }
    match text.parse::<f64>() {
        Ok(x) => Some(x),
        Err(_) => parse_integer(text).map(|n| n as f64),
    }
}

// A trailing `GMT`, `UTC`, `GMT+2` or `GMT-5` zone.
fn parse_zone(text: &str) -> Option<UtcOffset> {
    let hours = text
        .strip_prefix("GMT")
        .or_else(|| text.strip_prefix("UTC"))?;
    if hours.is_empty() {
        return Some(UtcOffset::UTC);
    }
    let hours: i8 = hours.parse().ok()?;
    UtcOffset::from_hms(hours, 0, 0).ok()
}

pub(super) fn parse_date_time(text: &str) -> Option<OffsetDateTime> {
    if let Ok(dt) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(dt);
    }
    let (text, offset) = match text.rsplit_once(' ') {
        Some((rest, zone)) => match parse_zone(zone) {
            Some(offset) => (rest.trim_end(), offset),
            None => (text, UtcOffset::UTC),
        },
        None => (text, UtcOffset::UTC),
    };
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = PrimitiveDateTime::parse(text, *format) {
            return Some(dt.assume_offset(offset));
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = Date::parse(text, *format) {
            return Some(date.midnight().assume_offset(offset));
        }
    }
    None
}
