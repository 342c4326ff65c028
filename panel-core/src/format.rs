use chrono::{DateTime, Utc};

/// Дата для таблиц и карточек: `Jan 15, 2026`.
pub fn format_date(value: &DateTime<Utc>) -> String {
    value.format("%b %d, %Y").to_string()
}

/// Целое с разделителями тысяч: `1 234 567`.
pub fn format_number(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn date_uses_short_month() {
        let date = Utc
            .with_ymd_and_hms(2026, 1, 15, 10, 30, 0)
            .single()
            .expect("valid date");
        assert_eq!(format_date(&date), "Jan 15, 2026");
    }

    #[test]
    fn numbers_group_thousands() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1 000");
        assert_eq!(format_number(1_234_567), "1 234 567");
        assert_eq!(format_number(-45_000), "-45 000");
    }
}
