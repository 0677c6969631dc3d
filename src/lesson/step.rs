/// One-based position in a fixed sequence of narrative texts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepCounter {
    current: usize,
    total: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepAdvance {
    Advanced,
    /// Confirmed on the last step; the counter does not move.
    Finished,
}

impl StepCounter {
    pub fn new(total: usize) -> Self {
        Self {
            current: 1,
            total: total.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Zero-based index into the text table.
    pub fn index(&self) -> usize {
        self.current - 1
    }

    pub fn is_last(&self) -> bool {
        self.current == self.total
    }

    pub fn advance(&mut self) -> StepAdvance {
        if self.current < self.total {
            self.current += 1;
            StepAdvance::Advanced
        } else {
            StepAdvance::Finished
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_one() {
        let step = StepCounter::new(5);
        assert_eq!(step.current(), 1);
        assert_eq!(step.index(), 0);
        assert!(!step.is_last());
    }

    #[test]
    fn test_advances_until_last_then_finishes() {
        let mut step = StepCounter::new(3);
        assert_eq!(step.advance(), StepAdvance::Advanced);
        assert_eq!(step.advance(), StepAdvance::Advanced);
        assert!(step.is_last());
        assert_eq!(step.advance(), StepAdvance::Finished);
        assert_eq!(step.current(), 3);
    }

    #[test]
    fn test_zero_total_is_single_step() {
        let mut step = StepCounter::new(0);
        assert_eq!(step.total(), 1);
        assert_eq!(step.advance(), StepAdvance::Finished);
    }
}
