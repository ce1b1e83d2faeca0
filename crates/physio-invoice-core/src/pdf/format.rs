//! Text formatting for rendered invoices: currency grouping, date styles,
//! invoice numbers, file names.

use chrono::NaiveDate;

/// Thousands-grouped rupee amount with no decimal places, en-IN style:
/// the last three digits group together, then pairs (1,00,000).
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut parts: Vec<&str> = Vec::new();
        let mut i = head.len();
        while i > 2 {
            parts.push(&head[i - 2..i]);
            i -= 2;
        }
        parts.push(&head[..i]);
        parts.reverse();
        format!("{},{}", parts.join(","), tail)
    };

    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// `dd/mm/yyyy`, or "-" when absent.
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%d/%m/%Y").to_string(),
        None => "-".to_string(),
    }
}

/// `dd Mon` (e.g. "05 Mar").
pub fn format_date_short(date: NaiveDate) -> String {
    date.format("%d %b").to_string()
}

/// `dd Mon yyyy` (e.g. "05 Mar 2024").
pub fn format_date_long(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

/// Abbreviated weekday name (e.g. "Tue").
pub fn weekday_short(date: NaiveDate) -> String {
    date.format("%a").to_string()
}

/// Invoice number derived from the current time: `INV-` plus the last eight
/// digits of the unix millisecond clock. Not persisted; a re-download gets
/// a fresh number.
pub fn invoice_number() -> String {
    let millis = chrono::Utc::now().timestamp_millis().to_string();
    let tail = &millis[millis.len().saturating_sub(8)..];
    format!("INV-{}", tail)
}

/// `Invoice_<patient-name-with-whitespace-as-underscores>_<bill-date>.pdf`
pub fn invoice_file_name(patient_name: &str, bill_date: NaiveDate) -> String {
    let name = patient_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("Invoice_{}_{}.pdf", name, bill_date.format("%Y-%m-%d"))
}

/// Greedy word wrap to a character limit per line. Words longer than the
/// limit get their own line rather than being split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_currency_grouping_en_in() {
        assert_eq!(format_currency(0.0), "0");
        assert_eq!(format_currency(800.0), "800");
        assert_eq!(format_currency(8000.0), "8,000");
        assert_eq!(format_currency(100000.0), "1,00,000");
        assert_eq!(format_currency(1234567.0), "12,34,567");
        assert_eq!(format_currency(12345678.0), "1,23,45,678");
    }

    #[test]
    fn test_currency_rounds_to_whole_rupees() {
        assert_eq!(format_currency(999.5), "1,000");
        assert_eq!(format_currency(999.4), "999");
    }

    #[test]
    fn test_currency_negative() {
        assert_eq!(format_currency(-8000.0), "-8,000");
    }

    #[test]
    fn test_date_styles() {
        let d = date("2024-03-05");
        assert_eq!(format_date(Some(d)), "05/03/2024");
        assert_eq!(format_date(None), "-");
        assert_eq!(format_date_short(d), "05 Mar");
        assert_eq!(format_date_long(d), "05 Mar 2024");
        assert_eq!(weekday_short(d), "Tue");
    }

    #[test]
    fn test_invoice_number_shape() {
        let number = invoice_number();
        assert!(number.starts_with("INV-"));
        assert_eq!(number.len(), 12);
        assert!(number[4..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_file_name_convention() {
        assert_eq!(
            invoice_file_name("Asha Verma", date("2024-03-10")),
            "Invoice_Asha_Verma_2024-03-10.pdf"
        );
        // Whitespace runs collapse to a single underscore.
        assert_eq!(
            invoice_file_name("  Asha   Verma ", date("2024-03-10")),
            "Invoice_Asha_Verma_2024-03-10.pdf"
        );
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(
            wrap_text("lower back pain with sciatica", 15),
            vec!["lower back pain", "with sciatica"]
        );
        assert_eq!(wrap_text("", 10), Vec::<String>::new());
        assert_eq!(wrap_text("unbreakablelongword", 5), vec!["unbreakablelongword"]);
    }
}
