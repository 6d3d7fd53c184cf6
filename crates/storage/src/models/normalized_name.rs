/// Athlete name in a canonical form used to recognise the same person across
/// imports, so "Ana  Silva" and "silva ana" resolve to one record.
///
/// Each part is trimmed and inner whitespace collapsed; the two parts are then
/// ordered alphabetically (case-insensitive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAthleteName {
    first: String,
    second: String,
}

fn collapse_whitespace(part: &str) -> String {
    part.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl NormalizedAthleteName {
    /// # Examples
    ///
    /// ```
    /// use storage::models::NormalizedAthleteName;
    ///
    /// let a = NormalizedAthleteName::new(" Ana ", "Silva");
    /// let b = NormalizedAthleteName::new("silva", "ana");
    ///
    /// assert_eq!(a.key(), b.key());
    /// ```
    pub fn new(name1: &str, name2: &str) -> Self {
        let name1 = collapse_whitespace(name1);
        let name2 = collapse_whitespace(name2);

        if name1.to_lowercase() <= name2.to_lowercase() {
            Self {
                first: name1,
                second: name2,
            }
        } else {
            Self {
                first: name2,
                second: name1,
            }
        }
    }

    /// Case-insensitive lookup key.
    pub fn key(&self) -> String {
        format!("{}|{}", self.first.to_lowercase(), self.second.to_lowercase())
    }

    pub fn matches(&self, first_name: &str, last_name: &str) -> bool {
        Self::new(first_name, last_name).key() == self.key()
    }
}
