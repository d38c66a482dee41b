use std::fmt;

/// Reserved strings persisted in place of a real lookup result.
///
/// These are wire values: they appear verbatim in the JSON store, so their
/// spelling is part of the document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    /// Initial value for a freshly appended record.
    Unresolved,
    /// No exact match on the secondary source, or the lookup task failed.
    NotFound,
    /// Several exact matches and none of them carried an id.
    Ambiguous,
    /// Matched an entry (or fetched a player page) with no team/id attached.
    NoTeam,
}

impl Sentinel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Sentinel::Unresolved => "N/A",
            Sentinel::NotFound => "Not in FM24",
            Sentinel::Ambiguous => "Multiple Results",
            Sentinel::NoTeam => "Free Agent/No Team",
        }
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a single lookup concluded: a real value or a sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(String),
    Sentinel(Sentinel),
}

impl LookupOutcome {
    /// The string stored in the record field.
    pub fn into_value(self) -> String {
        match self {
            LookupOutcome::Found(v) => v,
            LookupOutcome::Sentinel(s) => s.as_str().to_string(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, LookupOutcome::Found(_))
    }
}

/// A field patch produced by one enrichment task.
///
/// The forward (name search) strategy patches the `FMRef ID` column; the
/// reverse (id lookup) strategy patches `FMRef Team`. Tasks return these by
/// value and the coordinator applies them after all tasks have finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    FmrefId(LookupOutcome),
    FmrefTeam(LookupOutcome),
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        match self {
            Resolution::FmrefId(o) | Resolution::FmrefTeam(o) => o.is_found(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_wire_strings() {
        assert_eq!(Sentinel::Unresolved.as_str(), "N/A");
        assert_eq!(Sentinel::NotFound.as_str(), "Not in FM24");
        assert_eq!(Sentinel::Ambiguous.as_str(), "Multiple Results");
        assert_eq!(Sentinel::NoTeam.as_str(), "Free Agent/No Team");
    }

    #[test]
    fn outcome_into_value() {
        assert_eq!(LookupOutcome::Found("91024".into()).into_value(), "91024");
        assert_eq!(
            LookupOutcome::Sentinel(Sentinel::Ambiguous).into_value(),
            "Multiple Results"
        );
    }
}
