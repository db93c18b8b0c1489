use crate::models::{FilterConfig, StudentRecord};

/// Returns the records that satisfy every predicate in `config`, in roster order.
///
/// Both text fields are case-insensitive substring matches against
/// `"first last"`; the global search also looks at the email address.
pub fn filter_students<'a>(
    records: &'a [StudentRecord],
    config: &FilterConfig,
) -> Vec<&'a StudentRecord> {
    let search = config.global_search.to_lowercase();
    let name_search = config.name_filter.to_lowercase();

    records
        .iter()
        .filter(|record| {
            let full_name = record.full_name().to_lowercase();
            let email = record.email.to_lowercase();

            let matches_global = full_name.contains(&search) || email.contains(&search);
            let matches_name = full_name.contains(&name_search);
            let matches_grade = config.grade_filter.matches(record.grade_level);

            matches_global && matches_name && matches_grade
        })
        .collect()
}
