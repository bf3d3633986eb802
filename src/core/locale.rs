// Localized time and date phrasing.
//
// English is the default; Hindi replies use romanized sentences with the
// month name in Devanagari.

use crate::system::Language;
use chrono::{Datelike, NaiveDateTime};

const HINDI_MONTHS: [&str; 12] = [
    "जनवरी",
    "फ़रवरी",
    "मार्च",
    "अप्रैल",
    "मई",
    "जून",
    "जुलाई",
    "अगस्त",
    "सितंबर",
    "अक्टूबर",
    "नवंबर",
    "दिसंबर",
];

/// Hindi month name for a 1-based month number
pub fn hindi_month(month: u32) -> Option<&'static str> {
    let index = month.checked_sub(1)? as usize;
    HINDI_MONTHS.get(index).copied()
}

pub fn format_time(now: NaiveDateTime, language: Language) -> String {
    let clock = now.format("%I:%M %p");
    match language {
        Language::Hindi => format!("Abhi ka samay {} hai.", clock),
        Language::English => format!("The current time is {}.", clock),
    }
}

pub fn format_date(now: NaiveDateTime, language: Language) -> String {
    match language {
        Language::Hindi => {
            let english = now.format("%B").to_string();
            let month = hindi_month(now.month()).unwrap_or(english.as_str());
            format!("Aaj ki tarikh {} {} {} hai.", now.day(), month, now.year())
        }
        Language::English => format!("Today's date is {}.", now.format("%B %d, %Y")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_english_time() {
        let text = format_time(at(2025, 3, 9, 14, 5), Language::English);
        assert_eq!(text, "The current time is 02:05 PM.");
    }

    #[test]
    fn test_hindi_time() {
        let text = format_time(at(2025, 3, 9, 9, 30), Language::Hindi);
        assert_eq!(text, "Abhi ka samay 09:30 AM hai.");
    }

    #[test]
    fn test_english_date() {
        let text = format_date(at(2025, 3, 9, 14, 5), Language::English);
        assert_eq!(text, "Today's date is March 09, 2025.");
    }

    #[test]
    fn test_hindi_date() {
        let text = format_date(at(2025, 8, 15, 8, 0), Language::Hindi);
        assert_eq!(text, "Aaj ki tarikh 15 अगस्त 2025 hai.");
    }

    #[test]
    fn test_hindi_month_bounds() {
        assert_eq!(hindi_month(1), Some("जनवरी"));
        assert_eq!(hindi_month(12), Some("दिसंबर"));
        assert_eq!(hindi_month(0), None);
        assert_eq!(hindi_month(13), None);
    }
}
