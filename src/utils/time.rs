//! # 时间工具函数
//!
//! 记录的 `createdAt` / `updatedAt` 以及备份文件名都只需要 UTC 时间戳，
//! 这里用标准库手动格式化，不引入额外的时间库。

use std::time::{SystemTime, UNIX_EPOCH};

/// 当前时间的 ISO 8601 字符串（`YYYY-MM-DDTHH:MM:SS.sssZ`，UTC）
pub fn now_iso8601() -> String {
    system_time_to_iso8601(SystemTime::now())
}

/// 当前 Unix 时间戳（毫秒）
pub fn unix_timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

/// 将 `SystemTime` 转换为 ISO 8601 格式字符串
///
/// 早于 Unix epoch 的时间返回 epoch 本身。
pub fn system_time_to_iso8601(time: SystemTime) -> String {
    match time.duration_since(UNIX_EPOCH) {
        Ok(duration) => {
            let total_secs = duration.as_secs();
            let millis = duration.subsec_millis();

            let days = total_secs / 86400;
            let time_of_day = total_secs % 86400;
            let hours = time_of_day / 3600;
            let minutes = (time_of_day % 3600) / 60;
            let seconds = time_of_day % 60;

            let (year, month, day) = days_to_date(days);

            format!(
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
                year, month, day, hours, minutes, seconds, millis
            )
        }
        Err(_) => "1970-01-01T00:00:00.000Z".to_string(),
    }
}

/// 将自 1970-01-01 以来的天数转换为 (年, 月, 日)
///
/// Howard Hinnant 的公历算法：http://howardhinnant.github.io/date_algorithms.html
fn days_to_date(days_since_epoch: u64) -> (u64, u64, u64) {
    let z = days_since_epoch + 719468;
    let era = z / 146097;
    let doe = z - era * 146097; // [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365; // [0, 399]
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
    let mp = (5 * doy + 2) / 153; // [0, 11]
    let d = doy - (153 * mp + 2) / 5 + 1; // [1, 31]
    let m = if mp < 10 { mp + 3 } else { mp - 9 }; // [1, 12]
    let y = if m <= 2 { y + 1 } else { y };

    (y, m, d)
}
