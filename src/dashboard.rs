use serde::Serialize;

#[derive(Serialize, Clone, Debug)]
pub struct PageHeader {
    pub brand: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
}

#[derive(Serialize, Clone, Debug)]
pub struct FacultyProfile {
    pub name: &'static str,
    pub role: &'static str,
    pub initials: &'static str,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Accent {
    Blue,
    Green,
    Red,
    Orange,
    Purple,
}

#[derive(Serialize, Clone, Debug)]
pub struct Kpi {
    pub title: &'static str,
    pub value: String,
    pub accent: Accent,
}

#[derive(Serialize, Clone, Debug)]
pub struct GradeBucket {
    pub grade: &'static str,
    pub students: u32,
}

#[derive(Serialize, Clone, Debug)]
pub struct PassFailSlice {
    pub name: &'static str,
    pub value: u32,
    pub color: &'static str,
}

#[derive(Serialize, Clone, Debug)]
pub struct Charts {
    pub grade_distribution: Vec<GradeBucket>,
    pub pass_fail: Vec<PassFailSlice>,
}

#[derive(Serialize, Clone, Debug)]
pub struct Insight {
    pub title: &'static str,
    pub value: &'static str,
    pub description: &'static str,
    pub accent: Accent,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Moderate,
    Tough,
}

impl Difficulty {
    pub fn from_fail_percent(fail_percent: u32) -> Difficulty {
        match fail_percent {
            0..=9 => Difficulty::Easy,
            10..=24 => Difficulty::Moderate,
            _ => Difficulty::Tough,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Moderate => "Moderate",
            Difficulty::Tough => "Tough",
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct SubjectResult {
    pub code: &'static str,
    pub name: &'static str,
    pub pass_percent: u32,
    pub fail_percent: u32,
    pub difficulty: Difficulty,
}

#[derive(Serialize, Clone, Debug)]
pub struct Filters {
    pub semesters: Vec<&'static str>,
    pub departments: Vec<&'static str>,
}

#[derive(Serialize, Clone, Debug)]
pub struct DashboardData {
    pub header: PageHeader,
    pub profile: FacultyProfile,
    pub kpis: Vec<Kpi>,
    pub charts: Charts,
    pub insights: Vec<Insight>,
    pub subjects: Vec<SubjectResult>,
    pub filters: Filters,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct PassFailSplit {
    pub pass_percent: f64,
    pub fail_percent: f64,
}

pub const SEMESTERS: [&str; 8] = [
    "Semester 1",
    "Semester 2",
    "Semester 3",
    "Semester 4",
    "Semester 5",
    "Semester 6",
    "Semester 7",
    "Semester 8",
];

pub const DEPARTMENTS: [&str; 4] = [
    "Civil Engineering",
    "Mechanical Engineering",
    "Electrical & Electronics Engineering",
    "Computer Science Engineering",
];

const TOTAL_STUDENTS: u32 = 156;
const PASSED: u32 = 136;
const FAILED: u32 = 20;
const ABSENTEES: u32 = 8;
const PERFECT_SCORERS: u32 = 12;

pub fn header() -> PageHeader {
    PageHeader {
        brand: "AI Result Analyzer",
        title: "Result Analysis Dashboard",
        subtitle: "S3 Computer Science Engineering – Regular Exam",
    }
}

pub fn profile() -> FacultyProfile {
    FacultyProfile {
        name: "Dr. Sujithra MS",
        role: "HOD, Computer Science",
        initials: "SM",
    }
}

pub fn pass_fail_split() -> PassFailSplit {
    let total = f64::from(PASSED + FAILED);
    let round1 = |x: f64| (x * 10.0).round() / 10.0;
    PassFailSplit {
        pass_percent: round1(f64::from(PASSED) * 100.0 / total),
        fail_percent: round1(f64::from(FAILED) * 100.0 / total),
    }
}

pub fn kpis() -> Vec<Kpi> {
    let split = pass_fail_split();
    vec![
        Kpi {
            title: "Total Students",
            value: TOTAL_STUDENTS.to_string(),
            accent: Accent::Blue,
        },
        Kpi {
            title: "Pass Percentage",
            value: format!("{:.1}%", split.pass_percent),
            accent: Accent::Green,
        },
        Kpi {
            title: "Fail Percentage",
            value: format!("{:.1}%", split.fail_percent),
            accent: Accent::Red,
        },
        Kpi {
            title: "Absentees",
            value: ABSENTEES.to_string(),
            accent: Accent::Orange,
        },
        Kpi {
            title: "10 SGPA / CGPA Students",
            value: PERFECT_SCORERS.to_string(),
            accent: Accent::Purple,
        },
    ]
}

pub fn charts() -> Charts {
    let grades = [("A+", 28), ("A", 42), ("B+", 35), ("B", 24), ("C", 7), ("F", 20)];
    Charts {
        grade_distribution: grades
            .iter()
            .map(|&(grade, students)| GradeBucket { grade, students })
            .collect(),
        pass_fail: vec![
            PassFailSlice {
                name: "Pass",
                value: PASSED,
                color: "#16a34a",
            },
            PassFailSlice {
                name: "Fail",
                value: FAILED,
                color: "#dc2626",
            },
        ],
    }
}

pub fn insights() -> Vec<Insight> {
    vec![
        Insight {
            title: "Top Performing Subject",
            value: "Data Structures (CS301)",
            description: "94% pass rate with avg. grade B+",
            accent: Accent::Green,
        },
        Insight {
            title: "Most Difficult Subject",
            value: "Discrete Mathematics (MA301)",
            description: "68% pass rate, requires attention",
            accent: Accent::Red,
        },
        Insight {
            title: "Performance Trend",
            value: "Improving",
            description: "+5.2% compared to last semester",
            accent: Accent::Blue,
        },
    ]
}

pub fn subjects() -> Vec<SubjectResult> {
    let rows = [
        ("CS301", "Data Structures", 94, 6),
        ("CS302", "Object Oriented Programming", 89, 11),
        ("CS303", "Computer Organization", 85, 15),
        ("MA301", "Discrete Mathematics", 68, 32),
        ("CS304", "Database Management Systems", 91, 9),
        ("CS305", "Operating Systems", 82, 18),
    ];
    rows.iter()
        .map(|&(code, name, pass_percent, fail_percent)| SubjectResult {
            code,
            name,
            pass_percent,
            fail_percent,
            difficulty: Difficulty::from_fail_percent(fail_percent),
        })
        .collect()
}

pub fn filters() -> Filters {
    Filters {
        semesters: SEMESTERS.to_vec(),
        departments: DEPARTMENTS.to_vec(),
    }
}

pub fn dashboard() -> DashboardData {
    DashboardData {
        header: header(),
        profile: profile(),
        kpis: kpis(),
        charts: charts(),
        insights: insights(),
        subjects: subjects(),
        filters: filters(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kpi_percentages_match_cards() {
        let kpis = kpis();
        assert_eq!(kpis.len(), 5);
        assert_eq!(kpis[0].value, "156");
        assert_eq!(kpis[1].value, "87.2%");
        assert_eq!(kpis[2].value, "12.8%");
        assert_eq!(kpis[3].value, "8");
        assert_eq!(kpis[4].value, "12");
    }

    #[test]
    fn test_grade_distribution_covers_every_student() {
        let charts = charts();
        let total: u32 = charts.grade_distribution.iter().map(|b| b.students).sum();
        assert_eq!(total, TOTAL_STUDENTS);

        let failed = charts
            .grade_distribution
            .iter()
            .find(|b| b.grade == "F")
            .map(|b| b.students);
        assert_eq!(failed, Some(FAILED));

        let pie: u32 = charts.pass_fail.iter().map(|s| s.value).sum();
        assert_eq!(pie, TOTAL_STUDENTS);
    }

    #[test]
    fn test_difficulty_derived_from_fail_rate() {
        let subjects = subjects();
        for subject in &subjects {
            assert_eq!(subject.pass_percent + subject.fail_percent, 100);
        }
        let labels: Vec<_> = subjects.iter().map(|s| s.difficulty.label()).collect();
        assert_eq!(
            labels,
            ["Easy", "Moderate", "Moderate", "Tough", "Easy", "Moderate"]
        );
        assert_eq!(Difficulty::from_fail_percent(9), Difficulty::Easy);
        assert_eq!(Difficulty::from_fail_percent(10), Difficulty::Moderate);
        assert_eq!(Difficulty::from_fail_percent(25), Difficulty::Tough);
    }

    #[test]
    fn test_insights_name_extreme_subjects() {
        let subjects = subjects();
        let easiest = subjects.iter().min_by_key(|s| s.fail_percent).unwrap();
        let toughest = subjects.iter().max_by_key(|s| s.fail_percent).unwrap();
        let insights = insights();
        assert!(insights[0].value.contains(easiest.code));
        assert!(insights[1].value.contains(toughest.code));
    }

    #[test]
    fn test_filters_include_defaults() {
        let filters = filters();
        assert_eq!(filters.semesters.len(), 8);
        assert!(filters.semesters.contains(&"Semester 3"));
        assert!(filters.departments.contains(&"Computer Science Engineering"));
    }
}
