use chrono::NaiveTime;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Study,
    Leisure,
    Daily,
    Etc,
}

impl Category {
    /// Fixed order used for totals, charts and tie-breaking.
    pub const ALL: [Category; 4] = [
        Category::Study,
        Category::Leisure,
        Category::Daily,
        Category::Etc,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Category::Study => "study",
            Category::Leisure => "leisure",
            Category::Daily => "daily",
            Category::Etc => "etc",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Study => "공부",
            Category::Leisure => "일상",
            Category::Daily => "취미",
            Category::Etc => "휴식",
        }
    }

    pub fn items(self) -> &'static [&'static str] {
        match self {
            Category::Study => &["숙제하기", "예습 및 복습", "학교생활", "학원가기"],
            Category::Leisure => &["식사", "씻기", "집안일"],
            Category::Daily => &["TV시청", "게임", "독서", "운동", "자전거타기"],
            Category::Etc => &["가족과 함께", "수면", "산책", "친구와 함께"],
        }
    }

    pub fn index(self) -> usize {
        match self {
            Category::Study => 0,
            Category::Leisure => 1,
            Category::Daily => 2,
            Category::Etc => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    pub fn label(self) -> &'static str {
        match self {
            Meridiem::Am => "오전",
            Meridiem::Pm => "오후",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Meridiem::Am => Meridiem::Pm,
            Meridiem::Pm => Meridiem::Am,
        }
    }
}

/// A minute of the day in `[0, 1440)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    pub fn new(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour * 60 + minute))
        } else {
            None
        }
    }

    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Lenient form input: `"H"` or `"H:MM"` read on the given half of the
    /// day. Unreadable parts count as zero and values are clamped, so this
    /// never fails.
    pub fn parse_clock(text: &str, meridiem: Meridiem) -> Self {
        let (hour_part, minute_part) = match text.split_once(':') {
            Some((h, m)) => (h, m),
            None => (text, ""),
        };
        let mut hour = leading_number(hour_part).min(23);
        let minute = leading_number(minute_part).min(59);

        match meridiem {
            Meridiem::Pm if hour < 12 => hour += 12,
            Meridiem::Am if hour == 12 => hour = 0,
            _ => {}
        }
        Self(hour * 60 + minute)
    }

    /// Twelve-hour display such as `9:05 AM`.
    pub fn display_12h(self) -> String {
        NaiveTime::from_hms_opt(u32::from(self.hour()), u32::from(self.minute()), 0)
            .map(|t| t.format("%-I:%M %p").to_string())
            .unwrap_or_default()
    }
}

/// Digits at the start of `s` (after whitespace), saturating, 0 if none.
fn leading_number(s: &str) -> u16 {
    s.trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .fold(0u16, |acc, c| {
            acc.saturating_mul(10)
                .saturating_add(c.to_digit(10).unwrap_or(0) as u16)
        })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub id: u64,
    pub category: Category,
    pub label: String,
    pub start: MinuteOfDay,
    pub end: MinuteOfDay,
}

impl ScheduleEntry {
    /// Minutes from start to end, wrapping past midnight.
    pub fn duration_minutes(&self) -> u32 {
        let start = i32::from(self.start.minutes());
        let end = i32::from(self.end.minutes());
        let mut diff = end - start;
        if diff < 0 {
            diff += i32::from(MINUTES_PER_DAY);
        }
        diff as u32
    }

    /// Half-open interval intersection on raw minute values. Entries that
    /// cross midnight are not split, so they can slip past this check.
    pub fn overlaps(&self, start: MinuteOfDay, end: MinuteOfDay) -> bool {
        start < self.end && end > self.start
    }

    pub fn crosses_midnight(&self) -> bool {
        self.end < self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u16, m: u16) -> MinuteOfDay {
        MinuteOfDay::new(h, m).unwrap()
    }

    fn entry(start: MinuteOfDay, end: MinuteOfDay) -> ScheduleEntry {
        ScheduleEntry {
            id: 1,
            category: Category::Study,
            label: "숙제하기".to_string(),
            start,
            end,
        }
    }

    #[test]
    fn test_minute_of_day_bounds() {
        assert!(MinuteOfDay::new(23, 59).is_some());
        assert!(MinuteOfDay::new(24, 0).is_none());
        assert!(MinuteOfDay::new(0, 60).is_none());
        assert!(MinuteOfDay::from_minutes(1440).is_none());
    }

    #[test]
    fn test_parse_clock_hour_only_and_with_minutes() {
        assert_eq!(MinuteOfDay::parse_clock("9", Meridiem::Am), at(9, 0));
        assert_eq!(MinuteOfDay::parse_clock("9:30", Meridiem::Am), at(9, 30));
        assert_eq!(MinuteOfDay::parse_clock(" 7:05", Meridiem::Pm), at(19, 5));
    }

    #[test]
    fn test_parse_clock_noon_and_midnight() {
        assert_eq!(MinuteOfDay::parse_clock("12:00", Meridiem::Am), at(0, 0));
        assert_eq!(MinuteOfDay::parse_clock("12:15", Meridiem::Pm), at(12, 15));
        // Already in 24-hour form
        assert_eq!(MinuteOfDay::parse_clock("14:00", Meridiem::Pm), at(14, 0));
    }

    #[test]
    fn test_parse_clock_is_lenient() {
        assert_eq!(MinuteOfDay::parse_clock("", Meridiem::Am), at(0, 0));
        assert_eq!(MinuteOfDay::parse_clock("abc", Meridiem::Am), at(0, 0));
        assert_eq!(MinuteOfDay::parse_clock("99:99", Meridiem::Am), at(23, 59));
        assert_eq!(MinuteOfDay::parse_clock("8h:4x", Meridiem::Am), at(8, 4));
    }

    #[test]
    fn test_display_12h() {
        assert_eq!(at(9, 0).display_12h(), "9:00 AM");
        assert_eq!(at(0, 5).display_12h(), "12:05 AM");
        assert_eq!(at(13, 30).display_12h(), "1:30 PM");
    }

    #[test]
    fn test_duration_wraps_past_midnight() {
        assert_eq!(entry(at(9, 0), at(10, 30)).duration_minutes(), 90);
        let night = entry(at(22, 0), at(6, 0));
        assert!(night.crosses_midnight());
        assert_eq!(night.duration_minutes(), 480);
    }

    #[test]
    fn test_overlap_is_half_open() {
        let e = entry(at(9, 0), at(10, 0));
        assert!(e.overlaps(at(9, 30), at(10, 30)));
        assert!(e.overlaps(at(8, 0), at(9, 1)));
        assert!(!e.overlaps(at(10, 0), at(11, 0)));
        assert!(!e.overlaps(at(8, 0), at(9, 0)));
    }

    #[test]
    fn test_category_items_are_nonempty() {
        for category in Category::ALL {
            assert!(!category.items().is_empty(), "{}", category.key());
            assert_eq!(Category::ALL[category.index()], category);
        }
    }
}
