use crate::schedule::entry::{Category, MINUTES_PER_DAY, ScheduleEntry};

pub const HEAVY_MINUTES: u32 = 240;
pub const STUDY_SHORTFALL_MINUTES: u32 = 60;
/// Study shortfall advice only kicks in once the day has some shape.
pub const STUDY_SHORTFALL_MIN_ENTRIES: usize = 3;

pub const EMPTY_MESSAGE: &str = "아직 등록된 일정이 없습니다. 일정을 추가해 보세요!";
pub const PLACEHOLDER: &str = "분석 버튼을 클릭하면 AI가 일정을 분석하여 결과를 보여줍니다.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryTotals([u32; 4]);

impl CategoryTotals {
    pub fn get(&self, category: Category) -> u32 {
        self.0[category.index()]
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, u32)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    /// Largest total by strict comparison in category order, so ties go to
    /// the earlier category and an all-zero day reports study.
    pub fn max(&self) -> (Category, u32) {
        let mut best = (Category::Study, 0);
        for (category, minutes) in self.iter() {
            if minutes > best.1 {
                best = (category, minutes);
            }
        }
        best
    }
}

pub fn aggregate(entries: &[ScheduleEntry]) -> CategoryTotals {
    let mut totals = CategoryTotals::default();
    for entry in entries {
        totals.0[entry.category.index()] += entry.duration_minutes();
    }
    totals
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advice {
    StudyHeavy,
    LeisureHeavy,
    StudyShort,
    Balanced,
}

impl Advice {
    pub fn text(self) -> &'static str {
        match self {
            Advice::StudyHeavy => "공부에 많은 시간을 투자하고 있네요! 적절한 휴식도 중요합니다.",
            Advice::LeisureHeavy => {
                "여가 활동을 충분히 즐기고 계시네요. 균형 잡힌 일정 관리가 중요합니다."
            }
            Advice::StudyShort => "공부 시간이 부족한 것 같습니다. 학습 시간을 조금 더 확보해 보세요.",
            Advice::Balanced => "전반적으로 균형 잡힌 일정을 보내고 있습니다!",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Analysis {
    pub totals: CategoryTotals,
    pub top: Category,
    pub top_minutes: u32,
    pub advice: Advice,
}

impl Analysis {
    pub fn message(&self) -> String {
        format!(
            "오늘 가장 많은 시간을 할애한 활동은 \"{}\"입니다. ({})\n{}",
            self.top.display_name(),
            format_duration(self.top_minutes),
            self.advice.text()
        )
    }
}

/// `None` for an empty day.
pub fn analyze(entries: &[ScheduleEntry]) -> Option<Analysis> {
    if entries.is_empty() {
        return None;
    }
    let totals = aggregate(entries);
    let (top, top_minutes) = totals.max();
    let heavy = top_minutes > HEAVY_MINUTES;

    let advice = if heavy && top == Category::Study {
        Advice::StudyHeavy
    } else if heavy && top == Category::Leisure {
        Advice::LeisureHeavy
    } else if totals.get(Category::Study) < STUDY_SHORTFALL_MINUTES
        && entries.len() > STUDY_SHORTFALL_MIN_ENTRIES
    {
        Advice::StudyShort
    } else {
        Advice::Balanced
    };

    Some(Analysis {
        totals,
        top,
        top_minutes,
        advice,
    })
}

pub fn report(entries: &[ScheduleEntry]) -> String {
    match analyze(entries) {
        Some(analysis) => analysis.message(),
        None => EMPTY_MESSAGE.to_string(),
    }
}

/// `"1시간 30분"`, `"2시간"`, `"45분"`, `"0분"`.
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    match (hours, rest) {
        (0, m) => format!("{m}분"),
        (h, 0) => format!("{h}시간"),
        (h, m) => format!("{h}시간 {m}분"),
    }
}

/// Share of the whole day as a percentage rounded to one decimal.
pub fn share_of_day(minutes: u32) -> f64 {
    let pct = f64::from(minutes) * 100.0 / f64::from(MINUTES_PER_DAY);
    (pct * 10.0).round() / 10.0
}

/// For each hour of the day, the category covering most of it.
pub fn hourly_slots(entries: &[ScheduleEntry]) -> [Option<Category>; 24] {
    let mut slots = [None; 24];
    for (hour, slot) in slots.iter_mut().enumerate() {
        let from = hour as u32 * 60;
        let to = from + 60;
        let mut best: Option<(Category, u32)> = None;
        for entry in entries {
            let covered: u32 = segments(entry)
                .into_iter()
                .flatten()
                .map(|(s, e)| e.min(to).saturating_sub(s.max(from)))
                .sum();
            if covered > 0 && best.is_none_or(|(_, m)| covered > m) {
                best = Some((entry.category, covered));
            }
        }
        *slot = best.map(|(c, _)| c);
    }
    slots
}

/// The entry as at most two same-day `[start, end)` spans.
fn segments(entry: &ScheduleEntry) -> [Option<(u32, u32)>; 2] {
    let start = u32::from(entry.start.minutes());
    let end = u32::from(entry.end.minutes());
    if entry.crosses_midnight() {
        [Some((start, u32::from(MINUTES_PER_DAY))), Some((0, end))]
    } else {
        [Some((start, end)), None]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::entry::MinuteOfDay;

    fn entry(category: Category, start: (u16, u16), end: (u16, u16)) -> ScheduleEntry {
        ScheduleEntry {
            id: 0,
            category,
            label: category.items()[0].to_string(),
            start: MinuteOfDay::new(start.0, start.1).unwrap(),
            end: MinuteOfDay::new(end.0, end.1).unwrap(),
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(90), "1시간 30분");
        assert_eq!(format_duration(120), "2시간");
        assert_eq!(format_duration(45), "45분");
        assert_eq!(format_duration(0), "0분");
    }

    #[test]
    fn test_empty_day_message() {
        assert!(analyze(&[]).is_none());
        assert_eq!(report(&[]), EMPTY_MESSAGE);
    }

    #[test]
    fn test_study_and_hobby_report() {
        let entries = vec![
            entry(Category::Study, (9, 0), (10, 30)),
            entry(Category::Daily, (11, 0), (11, 30)),
        ];
        let totals = aggregate(&entries);
        assert_eq!(totals.get(Category::Study), 90);
        assert_eq!(totals.get(Category::Daily), 30);

        let analysis = analyze(&entries).unwrap();
        assert_eq!(analysis.top, Category::Study);
        assert_eq!(analysis.advice, Advice::Balanced);
        assert_eq!(
            analysis.message(),
            "오늘 가장 많은 시간을 할애한 활동은 \"공부\"입니다. (1시간 30분)\n전반적으로 균형 잡힌 일정을 보내고 있습니다!"
        );
    }

    #[test]
    fn test_overnight_entry_counts_wrapped_duration() {
        let entries = vec![entry(Category::Etc, (22, 0), (6, 0))];
        assert_eq!(aggregate(&entries).get(Category::Etc), 480);
        assert!(report(&entries).contains("\"휴식\"입니다. (8시간)"));
    }

    #[test]
    fn test_ties_go_to_earlier_category() {
        let entries = vec![
            entry(Category::Daily, (9, 0), (10, 0)),
            entry(Category::Leisure, (10, 0), (11, 0)),
        ];
        assert_eq!(aggregate(&entries).max(), (Category::Leisure, 60));
    }

    #[test]
    fn test_zero_length_day_reports_study() {
        let entries = vec![entry(Category::Daily, (9, 0), (9, 0))];
        assert_eq!(aggregate(&entries).max(), (Category::Study, 0));
    }

    #[test]
    fn test_advice_priority() {
        let heavy_study = vec![
            entry(Category::Study, (8, 0), (13, 0)),
            entry(Category::Leisure, (13, 0), (18, 0)),
        ];
        assert_eq!(analyze(&heavy_study).unwrap().advice, Advice::StudyHeavy);

        // Heavy leisure only counts when leisure is the top category.
        let study_on_top = vec![
            entry(Category::Study, (7, 0), (13, 0)),
            entry(Category::Leisure, (13, 0), (18, 0)),
        ];
        assert_eq!(analyze(&study_on_top).unwrap().advice, Advice::StudyHeavy);

        let hobby_on_top = vec![
            entry(Category::Daily, (6, 0), (12, 0)),
            entry(Category::Leisure, (12, 0), (17, 0)),
        ];
        assert_eq!(analyze(&hobby_on_top).unwrap().advice, Advice::Balanced);

        let heavy_leisure = vec![entry(Category::Leisure, (8, 0), (12, 1))];
        assert_eq!(analyze(&heavy_leisure).unwrap().advice, Advice::LeisureHeavy);

        let exactly_four_hours = vec![entry(Category::Leisure, (8, 0), (12, 0))];
        assert_eq!(analyze(&exactly_four_hours).unwrap().advice, Advice::Balanced);
    }

    #[test]
    fn test_study_shortfall_needs_more_than_three_entries() {
        let mut entries = vec![
            entry(Category::Daily, (9, 0), (10, 0)),
            entry(Category::Daily, (10, 0), (11, 0)),
            entry(Category::Etc, (11, 0), (12, 0)),
        ];
        assert_eq!(analyze(&entries).unwrap().advice, Advice::Balanced);
        entries.push(entry(Category::Study, (12, 0), (12, 30)));
        assert_eq!(analyze(&entries).unwrap().advice, Advice::StudyShort);
    }

    #[test]
    fn test_share_of_day_rounds_to_one_decimal() {
        assert_eq!(share_of_day(1440), 100.0);
        assert_eq!(share_of_day(90), 6.3);
        assert_eq!(share_of_day(0), 0.0);
    }

    #[test]
    fn test_hourly_slots_pick_dominant_category() {
        let entries = vec![
            entry(Category::Study, (9, 0), (9, 40)),
            entry(Category::Daily, (9, 40), (11, 0)),
            entry(Category::Etc, (23, 0), (1, 0)),
        ];
        let slots = hourly_slots(&entries);
        assert_eq!(slots[9], Some(Category::Study));
        assert_eq!(slots[10], Some(Category::Daily));
        assert_eq!(slots[11], None);
        assert_eq!(slots[23], Some(Category::Etc));
        assert_eq!(slots[0], Some(Category::Etc));
        assert_eq!(slots[1], None);
    }
}
