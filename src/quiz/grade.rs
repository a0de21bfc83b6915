use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grade {
    APlus,
    A,
    B,
    C,
    D,
}

impl Grade {
    pub fn from_percent(percent: u32) -> Self {
        match percent {
            100.. => Grade::APlus,
            80..=99 => Grade::A,
            60..=79 => Grade::B,
            40..=59 => Grade::C,
            _ => Grade::D,
        }
    }

    pub fn feedback(self) -> &'static str {
        match self {
            Grade::APlus => "Perfect! 🎉",
            Grade::A => "Great job!",
            Grade::B => "Good effort!",
            Grade::C => "Keep practicing!",
            Grade::D => "Try again!",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
    pub percent: u32,
    pub grade: Grade,
}

impl QuizResult {
    pub fn new(score: usize, total: usize) -> Self {
        let percent = if total == 0 {
            0
        } else {
            (100.0 * score as f64 / total as f64).round() as u32
        };
        Self {
            score,
            total,
            percent,
            grade: Grade::from_percent(percent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_exact() {
        assert_eq!(QuizResult::new(5, 5).grade, Grade::APlus);
        assert_eq!(QuizResult::new(4, 5).grade, Grade::A);
        assert_eq!(QuizResult::new(3, 5).grade, Grade::B);
        assert_eq!(QuizResult::new(2, 5).grade, Grade::C);
        assert_eq!(QuizResult::new(1, 5).grade, Grade::D);
        assert_eq!(QuizResult::new(0, 5).grade, Grade::D);
    }

    #[test]
    fn percent_is_rounded() {
        assert_eq!(QuizResult::new(2, 3).percent, 67);
        assert_eq!(QuizResult::new(1, 3).percent, 33);
        assert_eq!(QuizResult::new(1, 8).percent, 13);
        // 99.5 rounds up into A+
        assert_eq!(QuizResult::new(199, 200).percent, 100);
        assert_eq!(QuizResult::new(199, 200).grade, Grade::APlus);
    }

    #[test]
    fn perfect_run() {
        let result = QuizResult::new(10, 10);
        assert_eq!(result.percent, 100);
        assert_eq!(result.grade.to_string(), "A+");
        assert_eq!(result.grade.feedback(), "Perfect! 🎉");
    }

    #[test]
    fn empty_quiz_scores_zero() {
        let result = QuizResult::new(0, 0);
        assert_eq!(result.percent, 0);
        assert_eq!(result.grade, Grade::D);
    }
}
