use crate::models::{AgeCategory, CategoryGender, Gender};

/// Sentinel returned whenever an athlete cannot be placed.
pub const UNCLASSIFIED: &str = "Unclassified";

/// Extracts the leading four-digit year of a date string such as
/// `2008-05-14`. Anything else yields `None`.
pub fn birth_year(birth_date: &str) -> Option<i32> {
    let year = birth_date.trim().get(..4)?;
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    year.parse().ok()
}

/// Age as of January 1st of `reference_year`. The birthday itself is ignored.
pub fn age_in(birth_date: Option<&str>, reference_year: i32) -> Option<i32> {
    birth_date
        .and_then(birth_year)
        .and_then(|year| reference_year.checked_sub(year))
}

/// Resolves the age category an athlete competes in.
///
/// Categories are searched in list order, first for an exact gender match
/// and then for a `MIXED` one. Missing or unreadable birth dates, empty
/// category lists and ages outside every range all resolve to
/// [`UNCLASSIFIED`].
pub fn resolve_age_category(
    birth_date: Option<&str>,
    gender: Gender,
    categories: &[AgeCategory],
    reference_year: i32,
) -> String {
    if categories.is_empty() {
        return UNCLASSIFIED.to_string();
    }

    let Some(age) = age_in(birth_date, reference_year) else {
        return UNCLASSIFIED.to_string();
    };

    let find = |scope: CategoryGender| {
        categories
            .iter()
            .find(|c| c.gender == scope && c.covers_age(age))
    };

    find(gender.category_code())
        .or_else(|| find(CategoryGender::Mixed))
        .map(|c| c.name.clone())
        .unwrap_or_else(|| UNCLASSIFIED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_categories() -> Vec<AgeCategory> {
        vec![
            AgeCategory::new("U-13 Kids (M)", 10, 12, CategoryGender::M),
            AgeCategory::new("U-15 Schoolboys (M)", 13, 14, CategoryGender::M),
            AgeCategory::new("U-18 Cadets (M)", 15, 17, CategoryGender::M),
            AgeCategory::new("U-21 Juniors (M)", 18, 20, CategoryGender::M),
            AgeCategory::new("Seniors (M)", 21, 125, CategoryGender::M),
            AgeCategory::new("U-18 Cadets (F)", 15, 17, CategoryGender::F),
            AgeCategory::new("U-21 Juniors (F)", 18, 20, CategoryGender::F),
            AgeCategory::new("Seniors (F)", 21, 125, CategoryGender::F),
        ]
    }

    #[test]
    fn test_birth_year_requires_leading_digits() {
        assert_eq!(birth_year("2008-05-14"), Some(2008));
        assert_eq!(birth_year("1999"), Some(1999));
        assert_eq!(birth_year("14/05/2008"), None);
        assert_eq!(birth_year("20x8-01-01"), None);
        assert_eq!(birth_year(""), None);
        assert_eq!(birth_year("200"), None);
    }

    #[test]
    fn test_category_changes_exactly_at_boundaries() {
        let categories = standard_categories();
        let resolve = |year| resolve_age_category(Some("2008-11-30"), Gender::Male, &categories, year);

        assert_eq!(resolve(2025), "U-18 Cadets (M)");
        assert_eq!(resolve(2026), "U-21 Juniors (M)");
        assert_eq!(resolve(2028), "U-21 Juniors (M)");
        assert_eq!(resolve(2029), "Seniors (M)");
    }

    #[test]
    fn test_exact_gender_wins_over_mixed() {
        let categories = vec![
            AgeCategory::new("Seniors (M)", 21, 125, CategoryGender::M),
            AgeCategory::new("Seniors (F)", 21, 125, CategoryGender::F),
            AgeCategory::new("Open (MIXED)", 18, 125, CategoryGender::Mixed),
        ];

        assert_eq!(
            resolve_age_category(Some("2004-01-01"), Gender::Male, &categories, 2025),
            "Seniors (M)"
        );
        assert_eq!(
            resolve_age_category(Some("2004-01-01"), Gender::Female, &categories, 2025),
            "Seniors (F)"
        );
        // 19 is only covered by the mixed bracket
        assert_eq!(
            resolve_age_category(Some("2006-01-01"), Gender::Female, &categories, 2025),
            "Open (MIXED)"
        );
    }

    #[test]
    fn test_mixed_listed_first_still_loses_to_exact_gender() {
        let categories = vec![
            AgeCategory::new("Open (MIXED)", 18, 125, CategoryGender::Mixed),
            AgeCategory::new("Seniors (F)", 21, 125, CategoryGender::F),
        ];
        assert_eq!(
            resolve_age_category(Some("2000"), Gender::Female, &categories, 2025),
            "Seniors (F)"
        );
    }

    #[test]
    fn test_first_listed_wins_among_overlaps() {
        let categories = vec![
            AgeCategory::new("Veterans A (M)", 30, 39, CategoryGender::M),
            AgeCategory::new("Veterans (M)", 30, 125, CategoryGender::M),
        ];
        assert_eq!(
            resolve_age_category(Some("1990-06-01"), Gender::Male, &categories, 2025),
            "Veterans A (M)"
        );
    }

    #[test]
    fn test_unclassified_inputs() {
        let categories = standard_categories();

        assert_eq!(
            resolve_age_category(Some("2008-01-01"), Gender::Male, &[], 2025),
            UNCLASSIFIED
        );
        assert_eq!(
            resolve_age_category(None, Gender::Male, &categories, 2025),
            UNCLASSIFIED
        );
        assert_eq!(
            resolve_age_category(Some(""), Gender::Male, &categories, 2025),
            UNCLASSIFIED
        );
        assert_eq!(
            resolve_age_category(Some("not a date"), Gender::Male, &categories, 2025),
            UNCLASSIFIED
        );
    }

    #[test]
    fn test_age_outside_every_range_is_unclassified() {
        let categories: Vec<AgeCategory> = standard_categories()
            .into_iter()
            .filter(|c| c.min_age >= 13)
            .collect();

        assert_eq!(
            resolve_age_category(Some("2015-03-03"), Gender::Male, &categories, 2025),
            UNCLASSIFIED
        );
        // no U-15 bracket for women in this table
        assert_eq!(
            resolve_age_category(Some("2011-03-03"), Gender::Female, &categories, 2025),
            UNCLASSIFIED
        );
    }

    #[test]
    fn test_extreme_reference_year_is_unclassified() {
        let categories = standard_categories();

        assert_eq!(age_in(Some("2000"), i32::MIN), None);
        assert_eq!(age_in(Some("2000"), i32::MAX), Some(i32::MAX - 2000));
        assert_eq!(
            resolve_age_category(Some("2000"), Gender::Male, &categories, i32::MIN),
            UNCLASSIFIED
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let categories = standard_categories();
        let first = resolve_age_category(Some("2001-07-07"), Gender::Female, &categories, 2025);
        let second = resolve_age_category(Some("2001-07-07"), Gender::Female, &categories, 2025);
        assert_eq!(first, second);
    }
}
