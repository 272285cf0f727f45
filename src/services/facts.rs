use std::collections::{HashMap, HashSet};

use crate::models::Appointment;

pub const NO_DATA_FACT: &str = "No appointment data available to generate facts.";

/// Five summary sentences computed locally from the records.
pub fn derive_facts(records: &[Appointment]) -> Vec<String> {
    if records.is_empty() {
        return vec![NO_DATA_FACT.to_string()];
    }

    let types: Vec<&str> = records
        .iter()
        .filter_map(|r| r.appt_type.as_deref())
        .filter(|t| !t.is_empty())
        .collect();
    let statuses: Vec<&str> = records
        .iter()
        .filter_map(|r| r.status.as_deref())
        .filter(|s| !s.is_empty())
        .collect();

    let unique_types = types.iter().collect::<HashSet<_>>().len();

    vec![
        format!("A total of {} appointments were analyzed.", records.len()),
        format!(
            "The most frequent appointment type is \"{}\".",
            most_common(&types).unwrap_or("N/A")
        ),
        format!(
            "The most common status for appointments is \"{}\".",
            most_common(&statuses).unwrap_or("N/A")
        ),
        format!("There are {unique_types} unique types of appointments recorded."),
        "This dashboard provides a snapshot of current appointment records.".to_string(),
    ]
}

/// Value with the highest count; ties go to the value seen first.
fn most_common<'a>(items: &[&'a str]) -> Option<&'a str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&'a str> = Vec::new();
    for &item in items {
        let count = counts.entry(item).or_insert(0);
        if *count == 0 {
            order.push(item);
        }
        *count += 1;
    }

    let mut best: Option<(&'a str, usize)> = None;
    for value in order {
        let count = counts[value];
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}
