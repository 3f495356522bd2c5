//! Date helper functions

use chrono::{DateTime, Datelike, TimeZone, Timelike};

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTHS_PT_BR: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

const WEEKDAYS_EN: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const WEEKDAYS_PT_BR: [&str; 7] = [
    "segunda-feira",
    "terça-feira",
    "quarta-feira",
    "quinta-feira",
    "sexta-feira",
    "sábado",
    "domingo",
];

/// Month and weekday names for a language tag, English by default
fn names(locale: &str) -> (&'static [&'static str; 12], &'static [&'static str; 7]) {
    match locale.to_ascii_lowercase().as_str() {
        "pt-br" | "pt_br" | "pt" => (&MONTHS_PT_BR, &WEEKDAYS_PT_BR),
        _ => (&MONTHS_EN, &WEEKDAYS_EN),
    }
}

/// Format a date with date-fns style tokens
///
/// Supported tokens: `d dd M MM MMM MMMM y yy yyyy H HH h hh m mm s ss
/// EEE EEEE a`. Text inside single quotes is copied verbatim and `''`
/// stands for one literal quote.
///
/// # Examples
/// ```ignore
/// format_date(&date, "d MMM y", "pt-BR") // -> "25 mar 2021"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str, locale: &str) -> String {
    let (months, weekdays) = names(locale);
    let month = months[date.month0() as usize];
    let weekday = weekdays[date.weekday().num_days_from_monday() as usize];

    let chars: Vec<char> = format.chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            // `''` is a literal quote, inside or outside a quoted run
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            while i < chars.len() {
                match (chars[i], chars.get(i + 1)) {
                    ('\'', Some('\'')) => {
                        out.push('\'');
                        i += 2;
                    }
                    ('\'', _) => break,
                    (q, _) => {
                        out.push(q);
                        i += 1;
                    }
                }
            }
            i += 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            out.push(c);
            i += 1;
            continue;
        }

        let run = chars[i..].iter().take_while(|&&x| x == c).count();
        let hour12 = match date.hour() % 12 {
            0 => 12,
            h => h,
        };

        let token = match (c, run) {
            ('d', 1) => date.day().to_string(),
            ('d', _) => format!("{:02}", date.day()),
            ('M', 1) => date.month().to_string(),
            ('M', 2) => format!("{:02}", date.month()),
            ('M', 3) => month.chars().take(3).collect(),
            ('M', _) => month.to_string(),
            ('y', 2) => format!("{:02}", date.year() % 100),
            ('y', _) => date.year().to_string(),
            ('H', 1) => date.hour().to_string(),
            ('H', _) => format!("{:02}", date.hour()),
            ('h', 1) => hour12.to_string(),
            ('h', _) => format!("{:02}", hour12),
            ('m', 1) => date.minute().to_string(),
            ('m', _) => format!("{:02}", date.minute()),
            ('s', 1) => date.second().to_string(),
            ('s', _) => format!("{:02}", date.second()),
            ('E', 4) => weekday.to_string(),
            ('E', _) => weekday.chars().take(3).collect(),
            ('a', _) => (if date.hour() < 12 { "AM" } else { "PM" }).to_string(),
            _ => std::iter::repeat(c).take(run).collect(),
        };

        out.push_str(&token);
        i += run;
    }

    out
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2021, 3, 25, 19, 5, 0).unwrap();
        assert_eq!(format_date(&date, "d MMM y", "pt-BR"), "25 mar 2021");
        assert_eq!(format_date(&date, "d MMM y", "en"), "25 Mar 2021");
        assert_eq!(format_date(&date, "yyyy-MM-dd", "en"), "2021-03-25");
        assert_eq!(format_date(&date, "MMMM d, yyyy", "en"), "March 25, 2021");
        assert_eq!(format_date(&date, "hh:mm a", "en"), "07:05 PM");
    }

    #[test]
    fn test_quoted_literals() {
        let date = Utc.with_ymd_and_hms(2021, 3, 5, 0, 0, 0).unwrap();
        assert_eq!(
            format_date(&date, "d 'de' MMMM 'de' y", "pt-BR"),
            "5 de março de 2021"
        );
        assert_eq!(format_date(&date, "EEEE", "pt-BR"), "sexta-feira");
    }

    #[test]
    fn test_escaped_quote() {
        let date = Utc.with_ymd_and_hms(2021, 3, 5, 17, 0, 0).unwrap();
        assert_eq!(format_date(&date, "h''mm", "en"), "5'00");
        assert_eq!(format_date(&date, "h 'o''clock'", "en"), "5 o'clock");
    }

    #[test]
    fn test_timezone_shift() {
        let date = Utc.with_ymd_and_hms(2021, 3, 26, 1, 0, 0).unwrap();
        let local = date.with_timezone(&chrono_tz::America::Sao_Paulo);
        assert_eq!(format_date(&local, "d MMM y", "pt-BR"), "25 mar 2021");
    }

    #[test]
    fn test_date_xml() {
        let date = Utc.with_ymd_and_hms(2021, 3, 25, 19, 25, 28).unwrap();
        assert_eq!(date_xml(&date), "2021-03-25T19:25:28+00:00");
    }
}
