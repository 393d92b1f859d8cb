use super::*;

#[test]
fn require_rejects_blank() {
    assert_eq!(require("name", ""), Err(ValidationError::Missing("name")));
    assert_eq!(require("name", "   "), Err(ValidationError::Missing("name")));
    assert!(require("name", "Ana").is_ok());
}

#[test]
fn parse_date_and_time() {
    let date = parse_date("date", "2024-02-29").unwrap();
    assert_eq!(date.day(), 29);
    assert!(matches!(parse_date("date", "29/02/2024"), Err(ValidationError::BadDate { field: "date", .. })));

    assert_eq!(parse_time("time", "08:05").unwrap().minute(), 5);
    assert_eq!(parse_time("time", "08:05:09").unwrap().second(), 9);
    assert!(matches!(parse_time("time", "8h"), Err(ValidationError::BadTime { .. })));
}

// =============================================================
// date_range
// =============================================================

#[test]
fn date_range_rejects_start_after_end() {
    let err = date_range("2024-02-01", "2024-01-31").unwrap_err();
    assert_eq!(
        err,
        ValidationError::RangeInverted { start: "2024-02-01".to_owned(), end: "2024-01-31".to_owned() }
    );
}

#[test]
fn date_range_accepts_ordered_equal_and_open_bounds() {
    assert!(date_range("2024-01-01", "2024-01-31").is_ok());
    assert!(date_range("2024-01-31", "2024-01-31").is_ok());
    assert!(date_range("", "2024-01-31").is_ok());
    assert!(date_range("2024-01-01", "").is_ok());
    assert!(date_range("", "").is_ok());
}

#[test]
fn date_range_rejects_malformed_bound() {
    assert!(matches!(date_range("2024-13-01", ""), Err(ValidationError::BadDate { field: "start date", .. })));
}

// =============================================================
// email
// =============================================================

#[test]
fn email_shape() {
    assert!(email("rh@empresa.com.br").is_ok());
    assert!(email("a@b.c").is_ok());
    for bad in ["", "ana", "ana@", "@b.c", "a@b", "a@.c", "a@b.", "a b@c.d", "a@b@c.d"] {
        assert_eq!(email(bad), Err(ValidationError::BadEmail), "{bad:?} should be rejected");
    }
}
