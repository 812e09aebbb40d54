use csv::Writer;

use crate::dashboard;
use crate::error::{AppError, AppResult};

pub fn subjects_csv() -> AppResult<String> {
    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record(["Subject Code", "Subject Name", "Pass %", "Fail %", "Difficulty"])?;
    for subject in dashboard::subjects() {
        wtr.write_record([
            subject.code,
            subject.name,
            subject.pass_percent.to_string().as_str(),
            subject.fail_percent.to_string().as_str(),
            subject.difficulty.label(),
        ])?;
    }
    finish(wtr)
}

pub fn summary_csv() -> AppResult<String> {
    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record(["Metric", "Value"])?;
    let header = dashboard::header();
    wtr.write_record(["Exam", header.subtitle])?;
    for kpi in dashboard::kpis() {
        wtr.write_record([kpi.title, kpi.value.as_str()])?;
    }
    finish(wtr)
}

fn finish(wtr: Writer<Vec<u8>>) -> AppResult<String> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Io(std::io::Error::new(e.error().kind(), e.error().to_string())))?;
    String::from_utf8(bytes)
        .map_err(|e| AppError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
