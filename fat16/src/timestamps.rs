// Packed DOS date/time fields
// Date: bits 15-9 year since 1980, bits 8-5 month, bits 4-0 day
// Time: bits 15-11 hour, bits 10-5 minute, bits 4-0 seconds/2

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Calendar date decoded from a packed 16-bit FAT date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FatDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

/// Time of day decoded from a packed 16-bit FAT time (2-second resolution).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FatTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl FatDate {
    /// Extract calendar fields from the raw on-disk value.
    ///
    /// Pure bit extraction: zeroed or nonsensical dates decode without
    /// complaint, since boot sectors and directory slots routinely carry
    /// them.
    pub fn from_raw(raw: u16) -> Self {
        Self {
            year: ((raw >> 9) & 0x7F) + 1980,
            month: ((raw >> 5) & 0x0F) as u8,
            day: (raw & 0x1F) as u8,
        }
    }

    /// Pack calendar fields back into the on-disk form.
    pub fn to_raw(self) -> u16 {
        ((self.year - 1980) << 9) | ((self.month as u16) << 5) | self.day as u16
    }
}

impl FatTime {
    pub fn from_raw(raw: u16) -> Self {
        Self {
            hour: ((raw >> 11) & 0x1F) as u8,
            minute: ((raw >> 5) & 0x3F) as u8,
            second: ((raw & 0x1F) * 2) as u8,
        }
    }

    pub fn to_raw(self) -> u16 {
        ((self.hour as u16) << 11) | ((self.minute as u16) << 5) | (self.second as u16 / 2)
    }
}

/// Combine packed date and time into a `chrono` datetime, or `None` when the
/// stored bits do not name a real calendar instant (a zeroed date has month
/// and day 0, for instance).
pub fn fat_datetime_to_naive(date: u16, time: u16) -> Option<NaiveDateTime> {
    let d = FatDate::from_raw(date);
    let t = FatTime::from_raw(time);
    NaiveDate::from_ymd_opt(d.year as i32, d.month as u32, d.day as u32)?.and_hms_opt(
        t.hour as u32,
        t.minute as u32,
        t.second as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn date_round_trips() {
        let date = FatDate {
            year: 2021,
            month: 3,
            day: 15,
        };
        assert_eq!(FatDate::from_raw(date.to_raw()), date);
    }

    #[test]
    fn decodes_known_date() {
        // 2021 = 1980 + 41: (41 << 9) | (3 << 5) | 15
        let raw = (41 << 9) | (3 << 5) | 15;
        let date = FatDate::from_raw(raw);
        assert_eq!(date.year, 2021);
        assert_eq!(date.month, 3);
        assert_eq!(date.day, 15);
    }

    #[test]
    fn decodes_known_time() {
        // 14:30:42 stores 21 in the 2-second field
        let raw = (14 << 11) | (30 << 5) | 21;
        let time = FatTime::from_raw(raw);
        assert_eq!(time.hour, 14);
        assert_eq!(time.minute, 30);
        assert_eq!(time.second, 42);
    }

    #[test]
    fn time_round_trips() {
        let time = FatTime {
            hour: 23,
            minute: 59,
            second: 58,
        };
        assert_eq!(FatTime::from_raw(time.to_raw()), time);
    }

    #[test]
    fn naive_conversion_of_valid_datetime() {
        let date = FatDate {
            year: 2021,
            month: 3,
            day: 15,
        }
        .to_raw();
        let time = FatTime {
            hour: 14,
            minute: 30,
            second: 42,
        }
        .to_raw();

        let dt = fat_datetime_to_naive(date, time).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2021, 3, 15));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (14, 30, 42));
    }

    #[test]
    fn zeroed_fields_decode_but_do_not_convert() {
        let date = FatDate::from_raw(0);
        assert_eq!((date.year, date.month, date.day), (1980, 0, 0));
        assert!(fat_datetime_to_naive(0, 0).is_none());
    }
}
