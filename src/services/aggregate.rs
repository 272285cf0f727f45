use std::collections::HashMap;

use crate::models::{Appointment, AppointmentField, DistributionPoint};

/// Counts records per distinct value of `field`. Records without a value are skipped.
/// Points come out in first-seen order.
pub fn aggregate(records: &[Appointment], field: &AppointmentField) -> Vec<DistributionPoint> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut points: Vec<DistributionPoint> = Vec::new();

    for record in records {
        let Some(value) = record.field_value(field) else {
            continue;
        };
        match index.get(&value) {
            Some(&i) => points[i].value += 1,
            None => {
                index.insert(value.clone(), points.len());
                points.push(DistributionPoint { name: value, value: 1 });
            }
        }
    }

    points
}
