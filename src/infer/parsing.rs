use hifitime::{Epoch, Unit};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while_m_n},
    character::complete::{alpha1, char, multispace0, multispace1, one_of},
    combinator::{all_consuming, eof, map_opt, map_res, opt},
    number::complete::double,
    sequence::{preceded, terminated},
};
use once_cell::sync::Lazy;
use regex::Regex;

/// Anything that cannot be part of a number: currency signs, units, grouping spaces.
static NON_NUMERIC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\d\-.,eE]").expect("Failed to compile numeric cleanup regex"));

/// Parses a loosely formatted number.
///
/// Everything but digits, signs, separators and exponent markers is dropped first.
/// A comma is read as the decimal separator when no period is present, so `1,5` is
/// 1.5 while `1.234,5` is rejected as ambiguous.
pub fn try_parse_number(value: &str) -> Option<f64> {
    let mut cleaned = NON_NUMERIC_REGEX.replace_all(value, "").into_owned();
    if cleaned.contains(',') && !cleaned.contains('.') {
        cleaned = cleaned.replace(',', ".");
    }
    let parsed: IResult<&str, f64> = all_consuming(double).parse(cleaned.as_str());
    parsed.ok().map(|(_, number)| number)
}

/// Parses a date or date-time in any of the notations found in open data.
///
/// Covers ISO 8601 date-times, year-first and day-first calendar dates with an
/// optional time of day, year-month, statistical periods (`2023M03`, `2023Q1`,
/// `2023T1`, `2023S1`), bare years and month names followed by a year. Periods
/// resolve to their first day.
pub fn parse_datetime(value: &str) -> Option<Epoch> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Some(epoch) = parse_iso8601_datetime(value) {
        return Some(epoch);
    }

    let parsed: IResult<&str, Epoch> = alt((
        terminated(year_first_date, eof),
        terminated(day_first_date, eof),
        terminated(year_month, eof),
        terminated(statistical_period, eof),
        terminated(month_name_date, eof),
        terminated(bare_year, eof),
    ))
    .parse(value);
    parsed.ok().map(|(_, epoch)| epoch)
}

fn gregorian(year: i32, month: u8, day: u8, (hour, minute, second): (u8, u8, u8)) -> Option<Epoch> {
    Epoch::maybe_from_gregorian_utc(year, month, day, hour, minute, second, 0).ok()
}

fn year(input: &str) -> IResult<&str, i32> {
    map_res(take_while_m_n(4, 4, |c: char| c.is_ascii_digit()), |s: &str| {
        s.parse::<i32>()
    }).parse(input)
}

fn short_number(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(1, 2, |c: char| c.is_ascii_digit()), |s: &str| {
        s.parse::<u8>()
    }).parse(input)
}

fn time_of_day(input: &str) -> IResult<&str, (u8, u8, u8)> {
    let (input, (hour, _, minute, second)) = (
        short_number,
        char(':'),
        short_number,
        opt(preceded(char(':'), short_number)),
    )
        .parse(input)?;
    Ok((input, (hour, minute, second.unwrap_or(0))))
}

fn time_suffix(input: &str) -> IResult<&str, (u8, u8, u8)> {
    preceded(alt((multispace1, tag("T"))), time_of_day).parse(input)
}

/// `2023-01-31`, `2023/01/31`, optionally followed by a time.
fn year_first_date(input: &str) -> IResult<&str, Epoch> {
    map_opt(
        (
            year,
            one_of("-/"),
            short_number,
            one_of("-/"),
            short_number,
            opt(time_suffix),
        ),
        |(year, _, month, _, day, time)| gregorian(year, month, day, time.unwrap_or_default()),
    )
    .parse(input)
}

/// `31/01/2023`, `31-01-2023`, `31.01.2023`, optionally followed by a time.
fn day_first_date(input: &str) -> IResult<&str, Epoch> {
    map_opt(
        (
            short_number,
            one_of("/-."),
            short_number,
            one_of("/-."),
            year,
            opt(time_suffix),
        ),
        |(day, _, month, _, year, time)| gregorian(year, month, day, time.unwrap_or_default()),
    )
    .parse(input)
}

fn year_month(input: &str) -> IResult<&str, Epoch> {
    map_opt(
        (year, one_of("-/"), short_number),
        |(year, _, month)| gregorian(year, month, 1, Default::default()),
    )
    .parse(input)
}

/// Monthly, quarterly (Q or Spanish T for trimestre) and half-year periods.
fn statistical_period(input: &str) -> IResult<&str, Epoch> {
    map_opt(
        (year, one_of("MmQqTtSs"), short_number),
        |(year, unit, index)| {
            let month = match unit.to_ascii_uppercase() {
                'M' => index,
                'Q' | 'T' if (1..=4).contains(&index) => (index - 1) * 3 + 1,
                'S' if (1..=2).contains(&index) => (index - 1) * 6 + 1,
                _ => return None,
            };
            gregorian(year, month, 1, Default::default())
        },
    )
    .parse(input)
}

/// `January 2023`, `enero de 2023`, `ene-2023`.
fn month_name_date(input: &str) -> IResult<&str, Epoch> {
    map_opt(
        (
            alpha1,
            multispace0,
            opt(one_of("-/.")),
            multispace0,
            opt(terminated(tag_no_case("de"), multispace1)),
            year,
        ),
        |(name, _, _, _, _, year)| {
            month_from_name(name).and_then(|month| gregorian(year, month, 1, Default::default()))
        },
    )
    .parse(input)
}

fn bare_year(input: &str) -> IResult<&str, Epoch> {
    map_opt(year, |year| {
        if (1000..=2999).contains(&year) {
            gregorian(year, 1, 1, Default::default())
        } else {
            None
        }
    })
    .parse(input)
}

fn month_from_name(name: &str) -> Option<u8> {
    let month = match name.to_lowercase().as_str() {
        "january" | "jan" | "enero" | "ene" => 1,
        "february" | "feb" | "febrero" => 2,
        "march" | "mar" | "marzo" => 3,
        "april" | "apr" | "abril" | "abr" => 4,
        "may" | "mayo" => 5,
        "june" | "jun" | "junio" => 6,
        "july" | "jul" | "julio" => 7,
        "august" | "aug" | "agosto" | "ago" => 8,
        "september" | "sep" | "sept" | "septiembre" | "setiembre" => 9,
        "october" | "oct" | "octubre" => 10,
        "november" | "nov" | "noviembre" => 11,
        "december" | "dec" | "diciembre" | "dic" => 12,
        _ => return None,
    };
    Some(month)
}

fn convert_datetime_from_iso8601_to_hifitime(dt: iso8601::DateTime) -> Option<Epoch> {
    let iso8601::DateTime { date, time } = dt;
    let (year, month, day) = match date {
        iso8601::Date::YMD { year, month, day } => (year, month as u8, day as u8),
        iso8601::Date::Week { year, .. } | iso8601::Date::Ordinal { year, .. } => (year, 1, 1),
    };
    let iso8601::Time {
        hour,
        minute,
        second,
        millisecond,
        tz_offset_hours,
        tz_offset_minutes,
    } = time;

    let mut epoch = Epoch::maybe_from_gregorian_utc(
        year,
        month,
        day,
        hour as u8,
        minute as u8,
        second as u8,
        millisecond * 1_000_000_u32,
    )
    .ok()?;

    // Local time minus its offset gives UTC
    if tz_offset_hours != 0 {
        epoch -= Unit::Hour * tz_offset_hours as i64;
    }
    if tz_offset_minutes != 0 {
        epoch -= Unit::Minute * tz_offset_minutes as i64;
    }

    match date {
        iso8601::Date::YMD { .. } => {}
        iso8601::Date::Week { ww, d, .. } => {
            epoch += Unit::Day * (7 * (ww as i64 - 1) + (d as i64 - 1));
        }
        iso8601::Date::Ordinal { ddd, .. } => {
            epoch += Unit::Day * (ddd as i64 - 1);
        }
    };

    Some(epoch)
}

fn parse_iso8601_datetime(value: &str) -> Option<Epoch> {
    match iso8601::parsers::parse_datetime(value.as_bytes()) {
        Ok((rest, dt)) if rest.is_empty() => convert_datetime_from_iso8601_to_hifitime(dt),
        _ => None,
    }
}
