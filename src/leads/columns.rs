//! Column bookkeeping: the default Real Intent column set, required
//! identity columns, and the known/intent partition.

use std::collections::HashSet;

/// Columns every input file must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = ["first_name", "last_name", "email_1", "email_2", "email_3"];

/// Default columns of a Real Intent lead export. Anything else is an
/// intent column the user may map to tags.
pub const REAL_INTENT_COLUMNS: &[&str] = &[
    "first_name",
    "last_name",
    "email_1",
    "email_2",
    "email_3",
    "phone_1",
    "phone_1_dnc",
    "phone_2",
    "phone_2_dnc",
    "phone_3",
    "phone_3_dnc",
    "address",
    "city",
    "state",
    "zip_code",
    "zip4",
    "fips_state_code",
    "fips_county_code",
    "county_name",
    "latitude",
    "longitude",
    "age",
    "gender",
    "address_type",
    "cbsa",
    "census_tract",
    "census_block_group",
    "census_block",
    "scf",
    "dma",
    "msa",
    "congressional_district",
    "head_of_household",
    "birth_month_and_year",
    "prop_type",
    "n_household_children",
    "credit_range",
    "household_income",
    "household_net_worth",
    "home_owner_status",
    "marital_status",
    "occupation",
    "median_home_value",
    "education",
    "length_of_residence",
    "n_household_adults",
    "political_party",
    "health_beauty_products",
    "cosmetics",
    "jewelry",
    "investment_type",
    "investments",
    "pet_owner",
    "pets_affinity",
    "health_affinity",
    "diet_affinity",
    "fitness_affinity",
    "outdoors_affinity",
    "boating_sailing_affinity",
    "camping_hiking_climbing_affinity",
    "fishing_affinity",
    "hunting_affinity",
    "aerobics",
    "nascar",
    "scuba",
    "weight_lifting",
    "healthy_living_interest",
    "motor_racing",
    "foreign_travel",
    "self_improvement",
    "walking",
    "fitness",
    "ethnicity_detail",
    "ethnic_group",
    "md5",
    "insight",
    // produced by normalization
    "email",
];

/// Set of column names treated as default (non-intent) columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownColumns {
    names: HashSet<String>,
}

impl KnownColumns {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// The default Real Intent export columns.
    pub fn real_intent() -> Self {
        Self::new(REAL_INTENT_COLUMNS.iter().copied())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.names.contains(column)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Split `columns` into known and intent columns, keeping their order.
    /// The `tags` column is never an intent column.
    pub fn partition<'a, I>(&self, columns: I) -> ColumnPartition
    where
        I: IntoIterator<Item = &'a str>,
    {
        let (known, intent): (Vec<String>, Vec<String>) = columns
            .into_iter()
            .filter(|c| *c != crate::leads::record::TAGS)
            .map(str::to_string)
            .partition(|c| self.contains(c));
        ColumnPartition { known, intent }
    }
}

impl Default for KnownColumns {
    fn default() -> Self {
        Self::real_intent()
    }
}

/// Result of [`KnownColumns::partition`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPartition {
    pub known: Vec<String>,
    pub intent: Vec<String>,
}

/// Move `leading` names to the front of `columns` (in that order), keeping
/// the relative order of the rest. Names not in `columns` are skipped.
pub fn hoist(columns: &[String], leading: &[&str]) -> Vec<String> {
    leading
        .iter()
        .filter(|name| columns.iter().any(|c| c.as_str() == **name))
        .map(|name| name.to_string())
        .chain(
            columns
                .iter()
                .filter(|c| !leading.contains(&c.as_str()))
                .cloned(),
        )
        .collect()
}

/// Required columns absent from `columns`, in [`REQUIRED_COLUMNS`] order.
pub fn missing_required(columns: &[String]) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|req| !columns.iter().any(|c| c.as_str() == **req))
        .map(|req| req.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_set_has_every_export_column() {
        let known = KnownColumns::real_intent();
        assert_eq!(known.len(), 77);
        assert!(known.contains("email"));
        assert!(known.contains("insight"));
        assert!(!known.contains("wants_pool"));
    }

    #[test]
    fn partition_preserves_order() {
        let known = KnownColumns::real_intent();
        let p = known.partition(["email", "wants_pool", "city", "wants_garage", "tags"]);
        assert_eq!(p.known, cols(&["email", "city"]));
        assert_eq!(p.intent, cols(&["wants_pool", "wants_garage"]));
    }

    #[test]
    fn custom_set_changes_partition() {
        let known = KnownColumns::new(["email", "wants_pool"]);
        let p = known.partition(["email", "wants_pool", "city"]);
        assert_eq!(p.intent, cols(&["city"]));
    }

    #[test]
    fn hoist_moves_leading_and_skips_unknown() {
        let hoisted = hoist(
            &cols(&["city", "last_name", "first_name", "email"]),
            &["email", "tags", "first_name", "last_name"],
        );
        assert_eq!(hoisted, cols(&["email", "first_name", "last_name", "city"]));
    }

    #[test]
    fn missing_required_reports_in_fixed_order() {
        let missing = missing_required(&cols(&["email_3", "last_name", "email_1"]));
        assert_eq!(missing, cols(&["first_name", "email_2"]));
        assert!(missing_required(&cols(&REQUIRED_COLUMNS)).is_empty());
    }
}
