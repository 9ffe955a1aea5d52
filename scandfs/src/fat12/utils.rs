// SPDX-License-Identifier: MIT

use time::OffsetDateTime;

/// Encodes a timestamp into the packed FAT date/time pair.
pub fn fat_datetime(dt: OffsetDateTime) -> (u16, u16) {
    let year = dt.year().clamp(1980, 2107) as u16;
    let date = ((year - 1980) << 9) | ((u8::from(dt.month()) as u16) << 5) | dt.day() as u16;
    let time =
        ((dt.hour() as u16) << 11) | ((dt.minute() as u16) << 5) | (dt.second() as u16 / 2);
    (date, time)
}

pub fn fat_datetime_now() -> (u16, u16) {
    fat_datetime(OffsetDateTime::now_utc())
}

/// Decodes a space-padded 8.3 short name.
pub fn decode_sfn(name: &[u8; 8], ext: &[u8; 3]) -> String {
    let base: String = name
        .iter()
        .take_while(|&&b| b != b' ')
        .map(|&b| b as char)
        .collect();
    let ext_s: String = ext
        .iter()
        .take_while(|&&b| b != b' ')
        .map(|&b| b as char)
        .collect();
    if ext_s.is_empty() {
        base
    } else {
        format!("{base}.{ext_s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_fat_datetime() {
        let (date, time) = fat_datetime(datetime!(1999-12-31 23:59:58 UTC));
        assert_eq!(date, ((1999 - 1980) << 9) | (12 << 5) | 31);
        assert_eq!(time, (23 << 11) | (59 << 5) | 29);
    }

    #[test]
    fn test_fat_datetime_clamps_epoch() {
        let (date, _) = fat_datetime(datetime!(1970-01-01 00:00:00 UTC));
        assert_eq!(date >> 9, 0);
    }

    #[test]
    fn test_decode_sfn() {
        assert_eq!(decode_sfn(b"HELLO   ", b"TXT"), "HELLO.TXT");
        assert_eq!(decode_sfn(b"NOEXT   ", b"   "), "NOEXT");
    }
}
