use bauportal::workflows::document_check::{
    AnalysisReport, CompletenessReport, IssueSegment, Verdict,
};
use bauportal::workflows::geocode::GeocodedPlace;

pub(crate) fn render_report(report: &AnalysisReport) {
    println!("{}", report.kind.title());
    println!(
        "Status: {} ({})",
        report.verdict.status_text(),
        report.verdict.label()
    );

    println!("\nProjektdaten");
    for field in &report.overview {
        println!("- {}: {}", field.label, field.value);
    }

    println!("\nPrüfbericht vom {}", report.checked_on_label());
    for field in &report.summary {
        println!("- {}: {}", field.label, field.value);
    }

    if report.verdict == Verdict::Rejected {
        let segments = report.issue_segments();
        if segments.is_empty() {
            println!("\nKeine Details zu den Abweichungen vorhanden");
        } else {
            println!("\nFestgestellte Abweichungen");
            for segment in segments {
                match segment {
                    IssueSegment::Heading(heading) => println!("\n{heading}"),
                    IssueSegment::Bullet(bullet) => println!("  - {bullet}"),
                }
            }
        }
    }
}

pub(crate) fn render_completeness(report: &CompletenessReport) {
    println!("Vollständigkeitsprüfung");
    println!("Status: {}", report.state.label());

    if report.documents.is_empty() {
        println!("Keine Unterlagen gemeldet");
        return;
    }

    println!("\nErforderliche Unterlagen");
    for document in &report.documents {
        match document.action_needed.as_deref() {
            Some(action) if !document.is_satisfied() => {
                println!("- {}: {} ({})", document.name, document.status, action);
            }
            _ => println!("- {}: {}", document.name, document.status),
        }
    }
}

pub(crate) fn render_place(address: &str, place: &GeocodedPlace) {
    println!("Standort: {address}");
    println!("- Treffer: {}", place.display_name);
    println!("- Koordinaten: {:.4}, {:.4}", place.latitude, place.longitude);
}
