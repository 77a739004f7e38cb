/// PEP status codes (the letter in the index table) and the detail-page
/// statuses each one allows. The empty code covers drafts.
pub const EXPECTED_STATUS: &[(&str, &[&str])] = &[
    ("A", &["Active", "Accepted"]),
    ("D", &["Deferred"]),
    ("F", &["Final"]),
    ("P", &["Provisional"]),
    ("R", &["Rejected"]),
    ("S", &["Superseded"]),
    ("W", &["Withdrawn"]),
    ("", &["Draft", "Active"]),
];

/// Allowed statuses for a status code, or `None` for an unknown code.
pub fn expected_statuses(code: &str) -> Option<&'static [&'static str]> {
    EXPECTED_STATUS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, statuses)| *statuses)
}

pub const WHATS_NEW_HEADER: [&str; 3] = ["Article link", "Title", "Editor, author"];
pub const LATEST_VERSIONS_HEADER: [&str; 3] = ["Documentation link", "Version", "Status"];
pub const PEP_HEADER: [&str; 2] = ["Status", "Count"];
