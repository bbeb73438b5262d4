//! Time related utils.

use crate::{Error, Result};

/// DateTime used by osskit, always in UTC.
pub type DateTime = chrono::DateTime<chrono::Utc>;

/// Create a new DateTime of now.
pub fn now() -> DateTime {
    chrono::Utc::now()
}

/// Format time into the HTTP date form used by the `Date` header:
/// `Tue, 01 Jan 2019 00:00:00 GMT`.
pub fn format_http_date(t: DateTime) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse an HTTP date like `Tue, 01 Jan 2019 00:00:00 GMT`.
pub fn parse_http_date(s: &str) -> Result<DateTime> {
    let t = chrono::DateTime::parse_from_rfc2822(s)
        .map_err(|e| Error::unexpected(format!("invalid http date: {s}")).with_source(e))?;
    Ok(t.with_timezone(&chrono::Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_http_date() {
        let t = chrono::Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_http_date(t), "Tue, 01 Jan 2019 00:00:00 GMT");
    }

    #[test]
    fn test_parse_http_date() -> Result<()> {
        let t = parse_http_date("Mon, 15 Aug 2022 16:50:12 GMT")?;
        assert_eq!(format_http_date(t), "Mon, 15 Aug 2022 16:50:12 GMT");
        Ok(())
    }
}
