use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grade {
    S,
    APlus,
    A,
    BPlus,
    B,
    CPlus,
    C,
    D,
    P,
    F,
    FE,
    I,
    WH,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GradeStatus {
    Passed,
    Failed,
    Withheld,
}

impl Grade {
    pub fn point(self) -> u32 {
        match self {
            Grade::S => 10,
            Grade::APlus => 9,
            Grade::A => 8,
            Grade::BPlus => 7,
            Grade::B => 6,
            Grade::CPlus => 5,
            Grade::C => 4,
            Grade::D => 3,
            Grade::P => 2,
            Grade::F | Grade::FE | Grade::I | Grade::WH => 0,
        }
    }

    pub fn status(self) -> GradeStatus {
        match self {
            Grade::F | Grade::FE | Grade::I => GradeStatus::Failed,
            Grade::WH => GradeStatus::Withheld,
            _ => GradeStatus::Passed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::S => "S",
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::D => "D",
            Grade::P => "P",
            Grade::F => "F",
            Grade::FE => "FE",
            Grade::I => "I",
            Grade::WH => "WH",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        let grade = match s.trim().to_uppercase().as_str() {
            "S" => Grade::S,
            "A+" => Grade::APlus,
            "A" => Grade::A,
            "B+" => Grade::BPlus,
            "B" => Grade::B,
            "C+" => Grade::CPlus,
            "C" => Grade::C,
            "D" => Grade::D,
            "P" => Grade::P,
            "F" => Grade::F,
            "FE" => Grade::FE,
            "I" => Grade::I,
            "WH" => Grade::WH,
            _ => return Err(AppError::UnknownGrade(s.to_string())),
        };
        Ok(grade)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseInput {
    pub grade: String,
    pub credits: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourseGrade {
    pub grade: Grade,
    pub credits: f64,
}

impl TryFrom<&CourseInput> for CourseGrade {
    type Error = AppError;

    fn try_from(input: &CourseInput) -> AppResult<Self> {
        if !input.credits.is_finite() || input.credits < 0.0 {
            return Err(AppError::InvalidCredits);
        }
        Ok(CourseGrade {
            grade: input.grade.parse()?,
            credits: input.credits,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GradeSummary {
    pub sgpa: f64,
    pub total_credits: f64,
    pub passed: usize,
    pub failed: usize,
    pub withheld: usize,
}

fn totals(courses: &[CourseGrade]) -> AppResult<(f64, f64)> {
    let (points, credits) = courses.iter().fold((0.0, 0.0), |(points, credits), c| {
        (points + f64::from(c.grade.point()) * c.credits, credits + c.credits)
    });
    if !points.is_finite() || !credits.is_finite() {
        return Err(AppError::InvalidCredits);
    }
    Ok((points, credits))
}

/// Credit-weighted grade point average, two decimals. Zero credits gives 0.0.
pub fn sgpa(courses: &[CourseGrade]) -> AppResult<f64> {
    let (points, credits) = totals(courses)?;
    if credits == 0.0 {
        return Ok(0.0);
    }
    Ok((points / credits * 100.0).round() / 100.0)
}

pub fn summarize(courses: &[CourseGrade]) -> AppResult<GradeSummary> {
    let (_, total_credits) = totals(courses)?;
    let count = |status: GradeStatus| courses.iter().filter(|c| c.grade.status() == status).count();
    Ok(GradeSummary {
        sgpa: sgpa(courses)?,
        total_credits,
        passed: count(GradeStatus::Passed),
        failed: count(GradeStatus::Failed),
        withheld: count(GradeStatus::Withheld),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(grade: Grade, credits: f64) -> CourseGrade {
        CourseGrade { grade, credits }
    }

    #[test]
    fn test_sgpa_weighted_by_credits() {
        let courses = [course(Grade::APlus, 4.0), course(Grade::B, 3.0)];
        assert_eq!(sgpa(&courses).unwrap(), 7.71);
    }

    #[test]
    fn test_sgpa_all_s_is_ten() {
        let courses = [course(Grade::S, 4.0), course(Grade::S, 3.0), course(Grade::S, 1.0)];
        assert_eq!(sgpa(&courses).unwrap(), 10.0);
    }

    #[test]
    fn test_sgpa_zero_credits() {
        assert_eq!(sgpa(&[]).unwrap(), 0.0);
        assert_eq!(sgpa(&[course(Grade::A, 0.0)]).unwrap(), 0.0);
    }

    #[test]
    fn test_parse_is_lenient_on_case_and_space() {
        assert_eq!(" a+ ".parse::<Grade>().unwrap(), Grade::APlus);
        assert_eq!("wh".parse::<Grade>().unwrap(), Grade::WH);
        assert!(matches!("Z".parse::<Grade>(), Err(AppError::UnknownGrade(_))));
    }

    #[test]
    fn test_status_table() {
        assert_eq!(Grade::P.status(), GradeStatus::Passed);
        assert_eq!(Grade::FE.status(), GradeStatus::Failed);
        assert_eq!(Grade::I.status(), GradeStatus::Failed);
        assert_eq!(Grade::WH.status(), GradeStatus::Withheld);
        assert_eq!(Grade::WH.point(), 0);
    }

    #[test]
    fn test_summary_counts() {
        let courses = [
            course(Grade::S, 4.0),
            course(Grade::F, 3.0),
            course(Grade::WH, 3.0),
            course(Grade::C, 2.0),
        ];
        let summary = summarize(&courses).unwrap();
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.withheld, 1);
        assert_eq!(summary.total_credits, 12.0);
        assert_eq!(summary.sgpa, 4.0);
    }

    #[test]
    fn test_negative_credits_rejected() {
        let input = CourseInput {
            grade: "A".to_string(),
            credits: -1.0,
        };
        assert!(matches!(
            CourseGrade::try_from(&input),
            Err(AppError::InvalidCredits)
        ));
    }

    #[test]
    fn test_overflowing_credit_total_rejected() {
        let courses = [course(Grade::A, 1e308), course(Grade::B, 1e308)];
        assert!(matches!(sgpa(&courses), Err(AppError::InvalidCredits)));
        assert!(matches!(summarize(&courses), Err(AppError::InvalidCredits)));
    }
}
