//! CSV output format.

use std::io::Write;

use ranger_aggregate::RangeBar;
use ranger_types::{Tick, format_bar_time};

use crate::{FormatError, Formatter};

/// Column names of a bar archive.
pub const BAR_HEADER: [&str; 7] = ["datetime", "open", "high", "low", "close", "volume", "size"];

/// Column names of a tick file.
pub const TICK_HEADER: [&str; 3] = ["datetime", "last", "volume"];

/// CSV formatter.
///
/// Timestamps are written as `YYYY-MM-DD HH:MM:SS.ffffff` in UTC, and
/// decimals in their exact textual form.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    ///
    /// Disable it when appending to an existing archive.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    fn write_header<W: Write>(&self, writer: &mut W, columns: &[&str]) -> Result<(), FormatError> {
        if self.include_header {
            let mut delimiter = [0; 4];
            let delimiter = self.delimiter.encode_utf8(&mut delimiter);
            writeln!(writer, "{}", columns.join(delimiter))?;
        }
        Ok(())
    }
}

impl Formatter for CsvFormatter {
    fn write_bars<W: Write + Send>(
        &self,
        bars: &[RangeBar],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;
        self.write_header(&mut writer, &BAR_HEADER)?;

        for bar in bars {
            writeln!(
                writer,
                "{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}",
                format_bar_time(bar.open_time),
                bar.open,
                bar.high,
                bar.low,
                bar.close,
                bar.volume,
                bar.threshold
            )?;
        }

        writer.flush()?;
        Ok(())
    }

    fn write_ticks<W: Write + Send>(
        &self,
        ticks: &[Tick],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;
        self.write_header(&mut writer, &TICK_HEADER)?;

        for tick in ticks {
            writeln!(
                writer,
                "{}{d}{}{d}{}",
                format_bar_time(tick.timestamp),
                tick.price,
                tick.volume
            )?;
        }

        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};
    use rust_decimal::Decimal;
    use std::io::Cursor;

    fn create_test_bar() -> RangeBar {
        let open_time = Utc.with_ymd_and_hms(2024, 1, 15, 12, 30, 45).unwrap()
            + TimeDelta::milliseconds(2);
        RangeBar::new(
            open_time,
            Decimal::from(100),
            Decimal::from(105),
            Decimal::from(90),
            Decimal::from(90),
            Decimal::from_str_exact("3.5").unwrap(),
            Decimal::from(10),
        )
    }

    fn render(formatter: &CsvFormatter, bars: &[RangeBar]) -> String {
        let mut output = Cursor::new(Vec::new());
        formatter.write_bars(bars, &mut output).unwrap();
        String::from_utf8(output.into_inner()).unwrap()
    }

    #[test]
    fn test_csv_bars() {
        let result = render(&CsvFormatter::new(), &[create_test_bar()]);
        assert_eq!(
            result,
            "datetime,open,high,low,close,volume,size\n\
             2024-01-15 12:30:45.002000,100,105,90,90,3.5,10\n"
        );
    }

    #[test]
    fn test_csv_no_header() {
        let formatter = CsvFormatter::new().with_header(false);
        let result = render(&formatter, &[create_test_bar()]);
        assert!(!result.contains("datetime"));
        assert_eq!(result.lines().count(), 1);
    }

    #[test]
    fn test_csv_delimiter() {
        let formatter = CsvFormatter::new().with_delimiter(';');
        let result = render(&formatter, &[create_test_bar()]);
        assert!(result.starts_with("datetime;open;high;low;close;volume;size\n"));
        assert!(result.contains(";3.5;10"));
    }

    #[test]
    fn test_csv_ticks() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 15, 12, 30, 45).unwrap();
        let ticks = vec![Tick::new(
            timestamp,
            Decimal::from_str_exact("150010.5").unwrap(),
            Decimal::ONE,
        )];
        let mut output = Cursor::new(Vec::new());

        CsvFormatter::new().write_ticks(&ticks, &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert_eq!(
            result,
            "datetime,last,volume\n2024-01-15 12:30:45.000000,150010.5,1\n"
        );
    }

    #[test]
    fn test_empty_bars_write_header_only() {
        let result = render(&CsvFormatter::new(), &[]);
        assert_eq!(result, "datetime,open,high,low,close,volume,size\n");
    }
}
