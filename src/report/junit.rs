use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use std::path::Path;

use super::types::RunReport;
use crate::runner::ledger::{ScenarioRecord, ScenarioStatus};

/// Generate JUnit XML report string from a run report
pub fn generate_junit_xml(report: &RunReport) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let total_tests = report.records.len();
    let failures = report
        .records
        .iter()
        .filter(|r| !r.status.is_passed())
        .count();
    let total_duration: u64 = report.records.iter().map(|r| r.duration_ms).sum();

    // <testsuites>
    let mut suites_start = BytesStart::new("testsuites");
    suites_start.push_attribute(("name", "flowcheck-run"));
    suites_start.push_attribute(("tests", total_tests.to_string().as_str()));
    suites_start.push_attribute(("failures", failures.to_string().as_str()));
    suites_start.push_attribute((
        "time",
        (total_duration as f64 / 1000.0).to_string().as_str(),
    ));
    writer.write_event(Event::Start(suites_start))?;

    // One <testsuite> for the single scenario sequence
    let mut suite_start = BytesStart::new("testsuite");
    suite_start.push_attribute(("name", "ui-flows"));
    suite_start.push_attribute(("tests", total_tests.to_string().as_str()));
    suite_start.push_attribute(("failures", failures.to_string().as_str()));
    suite_start.push_attribute(("id", report.session_id.as_str()));
    suite_start.push_attribute((
        "time",
        (total_duration as f64 / 1000.0).to_string().as_str(),
    ));
    suite_start.push_attribute(("timestamp", report.generated_at.as_str()));
    writer.write_event(Event::Start(suite_start))?;

    for record in &report.records {
        write_test_case(&mut writer, record)?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    let result = writer.into_inner().into_inner();
    let xml = String::from_utf8(result)?;
    Ok(xml)
}

fn write_test_case<W: std::io::Write>(
    writer: &mut Writer<W>,
    record: &ScenarioRecord,
) -> Result<()> {
    let mut case_start = BytesStart::new("testcase");
    case_start.push_attribute(("name", record.label.as_str()));
    case_start.push_attribute(("classname", "flowcheck.flows"));
    case_start.push_attribute((
        "time",
        (record.duration_ms as f64 / 1000.0).to_string().as_str(),
    ));
    writer.write_event(Event::Start(case_start))?;

    if let ScenarioStatus::Failed { kind, error } = &record.status {
        let mut fail_start = BytesStart::new("failure");
        fail_start.push_attribute(("message", error.as_str()));
        fail_start.push_attribute(("type", kind.as_str()));
        writer.write_event(Event::Start(fail_start))?;
        writer.write_event(Event::Text(BytesText::new(error)))?;
        writer.write_event(Event::End(BytesEnd::new("failure")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}

/// Generate JUnit report, to stdout or a file
pub async fn generate(report: &RunReport, output: Option<&Path>) -> Result<()> {
    let xml = generate_junit_xml(report)?;
    if let Some(path) = output {
        std::fs::write(path, xml)?;
        println!("JUnit report saved to: {}", path.display());
    } else {
        println!("{}", xml);
    }
    Ok(())
}

/// Write the junit.xml artifact into the output directory
pub fn write_report(report: &RunReport, output_dir: &Path) -> Result<()> {
    let xml = generate_junit_xml(report)?;
    let path = output_dir.join("junit.xml");
    std::fs::write(&path, xml)?;
    println!("JUnit report saved to: {}", path.display());
    Ok(())
}
