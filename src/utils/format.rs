use chrono::{Local, NaiveDate};

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Human label for an inventory expiration date relative to `today`
pub fn expiry_label(expiration: Option<NaiveDate>, today: NaiveDate) -> String {
    let Some(date) = expiration else {
        return "-".to_string();
    };

    let days = (date - today).num_days();
    if days < 0 {
        format!("expired {}d ago", -days)
    } else if days == 0 {
        "expires today".to_string()
    } else if days == 1 {
        "expires tomorrow".to_string()
    } else {
        format!("{}d left", days)
    }
}

/// `expiry_label` against the current local date
pub fn expiry_label_today(expiration: Option<NaiveDate>) -> String {
    expiry_label(expiration, Local::now().date_naive())
}

/// Format a quantity with its unit, dropping a pointless trailing `.0`
pub fn format_quantity(quantity: f64, unit: &str) -> String {
    if quantity.fract() == 0.0 {
        format!("{}{}", quantity as i64, unit)
    } else {
        format!("{}{}", quantity, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi", 2), "Hi");
    }

    #[test]
    fn test_expiry_label() {
        let today = date(2025, 6, 15);
        assert_eq!(expiry_label(None, today), "-");
        assert_eq!(expiry_label(Some(date(2025, 6, 13)), today), "expired 2d ago");
        assert_eq!(expiry_label(Some(date(2025, 6, 15)), today), "expires today");
        assert_eq!(expiry_label(Some(date(2025, 6, 16)), today), "expires tomorrow");
        assert_eq!(expiry_label(Some(date(2025, 6, 20)), today), "5d left");
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(2.0, "piece"), "2piece");
        assert_eq!(format_quantity(1.5, "kg"), "1.5kg");
        assert_eq!(format_quantity(500.0, "ml"), "500ml");
    }
}
