use std::time::Duration;

use tracing::{debug, info};

use crate::config::Config;
use crate::lesson::Effect;
use crate::schedule::analysis::{self, PLACEHOLDER};
use crate::schedule::day::{DayPlan, NewEntry, ScheduleError};
use crate::schedule::entry::{Category, Meridiem, MinuteOfDay};

/// Label used when the form is submitted without an item.
pub const FALLBACK_LABEL: &str = "기타";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlannerTimer {
    Analysis,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryTab {
    Form,
    List,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartTab {
    Clock,
    Chart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Category,
    Item,
    Start,
    End,
    Submit,
}

impl FormField {
    const ORDER: [FormField; 5] = [
        FormField::Category,
        FormField::Item,
        FormField::Start,
        FormField::End,
        FormField::Submit,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleForm {
    pub category: Option<Category>,
    pub item: Option<&'static str>,
    pub start_text: String,
    pub start_meridiem: Meridiem,
    pub end_text: String,
    pub end_meridiem: Meridiem,
    pub focus: FormField,
}

impl Default for ScheduleForm {
    fn default() -> Self {
        Self {
            category: None,
            item: None,
            start_text: String::new(),
            start_meridiem: Meridiem::Am,
            end_text: String::new(),
            end_meridiem: Meridiem::Am,
            focus: FormField::Category,
        }
    }
}

impl ScheduleForm {
    /// Step through "unset" followed by every category.
    pub fn cycle_category(&mut self, forward: bool) {
        let slots = Category::ALL.len() + 1;
        let current = self.category.map_or(0, |c| c.index() + 1);
        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };
        self.category = next.checked_sub(1).map(|i| Category::ALL[i]);
        self.item = None;
    }

    pub fn cycle_item(&mut self, forward: bool) {
        let Some(category) = self.category else {
            return;
        };
        let items = category.items();
        let slots = items.len() + 1;
        let current = self
            .item
            .and_then(|item| items.iter().position(|i| *i == item))
            .map_or(0, |i| i + 1);
        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };
        self.item = next.checked_sub(1).map(|i| items[i]);
    }

    pub fn toggle_meridiem(&mut self) {
        match self.focus {
            FormField::Start => self.start_meridiem = self.start_meridiem.toggle(),
            FormField::End => self.end_meridiem = self.end_meridiem.toggle(),
            _ => {}
        }
    }

    /// The text buffer under focus, if the focused field is a time.
    pub fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Start => Some(&mut self.start_text),
            FormField::End => Some(&mut self.end_text),
            _ => None,
        }
    }

    pub fn build(&self) -> NewEntry {
        let category = self.category.unwrap_or(Category::Etc);
        NewEntry {
            category,
            label: self.item.unwrap_or(FALLBACK_LABEL).to_string(),
            start: MinuteOfDay::parse_clock(&self.start_text, self.start_meridiem),
            end: MinuteOfDay::parse_clock(&self.end_text, self.end_meridiem),
        }
    }

    /// Clear the per-entry fields. Category and meridiems carry over.
    fn reset_after_submit(&mut self) {
        self.item = None;
        self.start_text.clear();
        self.end_text.clear();
        self.focus = FormField::Item;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlannerTimings {
    pub analysis: Duration,
}

impl PlannerTimings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            analysis: Duration::from_millis(config.analysis_delay_ms),
        }
    }
}

impl Default for PlannerTimings {
    fn default() -> Self {
        Self {
            analysis: Duration::from_millis(1500),
        }
    }
}

/// State of the schedule planner screen.
#[derive(Debug)]
pub struct SchedulePlanner {
    plan: DayPlan,
    pub form: ScheduleForm,
    pub entry_tab: EntryTab,
    pub chart_tab: ChartTab,
    pub list_selected: usize,
    analyzing: bool,
    result: Option<String>,
    /// Last rejection, shown until the next successful action.
    notice: Option<String>,
    timings: PlannerTimings,
}

impl SchedulePlanner {
    pub fn new(timings: PlannerTimings) -> Self {
        Self {
            plan: DayPlan::new(),
            form: ScheduleForm::default(),
            entry_tab: EntryTab::Form,
            chart_tab: ChartTab::Clock,
            list_selected: 0,
            analyzing: false,
            result: None,
            notice: None,
            timings,
        }
    }

    pub fn plan(&self) -> &DayPlan {
        &self.plan
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    pub fn result_text(&self) -> &str {
        self.result.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn submit_form(&mut self) -> Result<u64, ScheduleError> {
        let entry = self.form.build();
        match self.plan.add(entry) {
            Ok(id) => {
                self.notice = None;
                self.form.reset_after_submit();
                self.entry_tab = EntryTab::List;
                self.list_selected = self.plan.len().saturating_sub(1);
                Ok(id)
            }
            Err(err) => {
                self.notice = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn select_next(&mut self) {
        if !self.plan.is_empty() {
            self.list_selected = (self.list_selected + 1) % self.plan.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.plan.is_empty() {
            let len = self.plan.len();
            self.list_selected = (self.list_selected + len - 1) % len;
        }
    }

    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.plan.entries().get(self.list_selected).map(|e| e.id) else {
            return false;
        };
        self.plan.remove(id);
        if self.list_selected >= self.plan.len() {
            self.list_selected = self.plan.len().saturating_sub(1);
        }
        true
    }

    pub fn toggle_entry_tab(&mut self) {
        self.entry_tab = match self.entry_tab {
            EntryTab::Form => EntryTab::List,
            EntryTab::List => EntryTab::Form,
        };
    }

    pub fn toggle_chart_tab(&mut self) {
        self.chart_tab = match self.chart_tab {
            ChartTab::Clock => ChartTab::Chart,
            ChartTab::Chart => ChartTab::Clock,
        };
    }

    pub fn request_analysis(&mut self) -> Vec<Effect<PlannerTimer>> {
        if self.analyzing {
            return Vec::new();
        }
        debug!(entries = self.plan.len(), "analysis requested");
        self.analyzing = true;
        vec![Effect::Schedule {
            timer: PlannerTimer::Analysis,
            after: self.timings.analysis,
        }]
    }

    pub fn timer_fired(&mut self, timer: PlannerTimer) {
        match timer {
            PlannerTimer::Analysis if self.analyzing => {
                let text = analysis::report(self.plan.entries());
                info!(entries = self.plan.len(), "schedule analyzed");
                self.result = Some(text);
                self.analyzing = false;
            }
            PlannerTimer::Analysis => {}
        }
    }
}
