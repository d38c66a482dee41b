use serde::{Deserialize, Serialize};

use crate::resolution::{Resolution, Sentinel};

/// One durable transfer record, serialized with the store's historical
/// column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    #[serde(rename = "Player")]
    pub player: String,

    #[serde(rename = "Transfermarkt ID")]
    pub transfermarkt_id: Option<String>,

    #[serde(rename = "Team Left")]
    pub team_left: Option<String>,

    #[serde(rename = "Team Joined")]
    pub team_joined: Option<String>,

    #[serde(rename = "Fee")]
    pub fee: Option<String>,

    /// Local wall-clock time the record was first seen, `%Y-%m-%d %H:%M:%S`.
    #[serde(rename = "Datetime Retrieved")]
    pub retrieved_at: String,

    /// FMRef id, or one of the [`Sentinel`] strings.
    #[serde(rename = "FMRef ID")]
    pub fmref_id: String,

    /// Affiliated team resolved by the reverse strategy. Absent until set.
    #[serde(rename = "FMRef Team", default, skip_serializing_if = "Option::is_none")]
    pub fmref_team: Option<String>,
}

impl TransferRecord {
    /// Whether the `FMRef ID` column still holds the unresolved sentinel.
    pub fn fmref_unresolved(&self) -> bool {
        self.fmref_id == Sentinel::Unresolved.as_str()
    }

    /// Whether the `FMRef Team` column is absent or still unresolved.
    pub fn team_unresolved(&self) -> bool {
        match &self.fmref_team {
            None => true,
            Some(t) => t == Sentinel::Unresolved.as_str(),
        }
    }

    /// Apply one enrichment result to this record.
    pub fn apply(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::FmrefId(outcome) => self.fmref_id = outcome.into_value(),
            Resolution::FmrefTeam(outcome) => self.fmref_team = Some(outcome.into_value()),
        }
    }
}

/// Fields a listing row can yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Player,
    TransfermarktId,
    TeamLeft,
    TeamJoined,
    Fee,
}

impl Field {
    pub const fn as_str(self) -> &'static str {
        match self {
            Field::Player => "player",
            Field::TransfermarktId => "transfermarkt id",
            Field::TeamLeft => "team left",
            Field::TeamJoined => "team joined",
            Field::Fee => "fee",
        }
    }
}

/// How much of a row the extractor managed to locate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completeness {
    Complete,
    Partial { missing: Vec<Field> },
}

/// One extracted listing row before change detection.
///
/// Every field is optional: missing markup resolves to `None`, never to an
/// error, and a row without a player name is still emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub player: Option<String>,
    pub transfermarkt_id: Option<String>,
    pub team_left: Option<String>,
    pub team_joined: Option<String>,
    pub fee: Option<String>,
}

impl RawRecord {
    /// Promote to a durable record with the unresolved sentinel.
    ///
    /// Returns `None` for a nameless row; those cannot participate in
    /// name-keyed deduplication.
    pub fn promote(self, retrieved_at: String) -> Option<TransferRecord> {
        let player = self.player?;
        Some(TransferRecord {
            player,
            transfermarkt_id: self.transfermarkt_id,
            team_left: self.team_left,
            team_joined: self.team_joined,
            fee: self.fee,
            retrieved_at,
            fmref_id: Sentinel::Unresolved.as_str().to_string(),
            fmref_team: None,
        })
    }
}

/// A raw row plus its completeness tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowExtraction {
    pub record: RawRecord,
    pub completeness: Completeness,
}

impl RowExtraction {
    pub fn missing_fields(&self) -> &[Field] {
        match &self.completeness {
            Completeness::Complete => &[],
            Completeness::Partial { missing } => missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolution::LookupOutcome;

    fn sample() -> TransferRecord {
        RawRecord {
            player: Some("Jude Bellingham".into()),
            transfermarkt_id: Some("581678".into()),
            team_left: Some("Borussia Dortmund".into()),
            team_joined: Some("Real Madrid".into()),
            fee: Some("€103.00m".into()),
        }
        .promote("2026-08-07 10:00:00".into())
        .unwrap()
    }

    #[test]
    fn serializes_with_store_column_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["Player"], "Jude Bellingham");
        assert_eq!(json["Transfermarkt ID"], "581678");
        assert_eq!(json["FMRef ID"], "N/A");
        // Absent until the reverse strategy writes it.
        assert!(json.get("FMRef Team").is_none());
    }

    #[test]
    fn nameless_row_does_not_promote() {
        let raw = RawRecord {
            team_joined: Some("Arsenal".into()),
            ..Default::default()
        };
        assert!(raw.promote("2026-08-07 10:00:00".into()).is_none());
    }

    #[test]
    fn apply_patches_the_right_column() {
        let mut rec = sample();
        rec.apply(Resolution::FmrefId(LookupOutcome::Found("91024".into())));
        assert_eq!(rec.fmref_id, "91024");
        assert!(rec.fmref_team.is_none());

        rec.apply(Resolution::FmrefTeam(LookupOutcome::Sentinel(Sentinel::NoTeam)));
        assert_eq!(rec.fmref_team.as_deref(), Some("Free Agent/No Team"));
    }

    #[test]
    fn deserializes_legacy_document_without_team_column() {
        let doc = r#"{
            "Player": "Ada Hegerberg",
            "Transfermarkt ID": "199244",
            "Team Left": null,
            "Team Joined": "Lyon",
            "Fee": "free transfer",
            "Datetime Retrieved": "2026-08-01 09:30:00",
            "FMRef ID": "N/A"
        }"#;
        let rec: TransferRecord = serde_json::from_str(doc).unwrap();
        assert!(rec.fmref_unresolved());
        assert!(rec.team_unresolved());
        assert!(rec.team_left.is_none());
    }
}
