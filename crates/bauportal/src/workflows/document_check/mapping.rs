use super::descriptor::DocumentCheckKind;

/// Placeholder rendered for fields the backend did not extract.
pub const MISSING_FIELD_PLACEHOLDER: &str = "Nicht verfügbar";

/// Pairing of a backend `result_data` key with its German display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldLabel {
    pub(crate) backend_key: &'static str,
    pub(crate) label: &'static str,
}

const BPLAN_OVERVIEW: &[FieldLabel] = &[
    FieldLabel { backend_key: "Project title", label: "Projekttitel" },
    FieldLabel { backend_key: "Project type", label: "Projekttyp" },
    FieldLabel { backend_key: "Building class", label: "Gebäudeklasse" },
    FieldLabel { backend_key: "Building usage", label: "Nutzung des Gebäudes" },
    FieldLabel { backend_key: "Number of floors", label: "Anzahl der Stockwerke" },
];

const BPLAN_SUMMARY: &[FieldLabel] = &[
    FieldLabel { backend_key: "Project location", label: "Standort" },
    FieldLabel { backend_key: "Project type", label: "Projekttyp" },
    FieldLabel { backend_key: "Building class", label: "Gebäudeklasse" },
];

const FIRE_OVERVIEW: &[FieldLabel] = &[
    FieldLabel { backend_key: "Fire protection class", label: "Brandschutzklasse" },
    FieldLabel { backend_key: "Building height", label: "Gebäudehöhe" },
    FieldLabel { backend_key: "Escape route length", label: "Fluchtweglänge" },
];

const FIRE_SUMMARY: &[FieldLabel] = &[
    FieldLabel { backend_key: "Project location", label: "Standort" },
    FieldLabel { backend_key: "Fire protection class", label: "Brandschutzklasse" },
];

pub(crate) fn overview_labels(kind: DocumentCheckKind) -> &'static [FieldLabel] {
    match kind {
        DocumentCheckKind::BPlan | DocumentCheckKind::Completeness => BPLAN_OVERVIEW,
        DocumentCheckKind::FireProtection => FIRE_OVERVIEW,
    }
}

pub(crate) fn summary_labels(kind: DocumentCheckKind) -> &'static [FieldLabel] {
    match kind {
        DocumentCheckKind::BPlan | DocumentCheckKind::Completeness => BPLAN_SUMMARY,
        DocumentCheckKind::FireProtection => FIRE_SUMMARY,
    }
}

/// Collapse the inconsistent whitespace the backend puts into `result_data`
/// keys (`" Project type"` and `"Project type"` must match the same label).
pub(crate) fn normalize_key(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
pub(crate) fn normalize_key_for_tests(value: &str) -> String {
    normalize_key(value)
}
