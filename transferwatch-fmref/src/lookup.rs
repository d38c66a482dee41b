//! Search-result parsing, the disambiguation policy, and the two resolver
//! strategies.

use scraper::{Html, Selector};

use transferwatch_core::record::TransferRecord;
use transferwatch_core::resolution::{LookupOutcome, Resolution, Sentinel};
use transferwatch_core::traits::Resolver;

use crate::client::RenderClient;
use crate::error::FmrefError;

/// One entry on the search results page: a heading plus, when the player
/// has an in-game record, an id button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub fmref_id: Option<String>,
}

/// Walk the rendered search page and pair each `h2` heading with the first
/// `button.fm-id` that follows it (before the next heading).
pub fn parse_entries(html: &str) -> Vec<Candidate> {
    let doc = Html::parse_document(html);
    let sel = Selector::parse("h2, button.fm-id").unwrap();

    let mut entries: Vec<Candidate> = Vec::new();
    for el in doc.select(&sel) {
        if el.value().name() == "h2" {
            entries.push(Candidate {
                name: el.text().collect::<String>().trim().to_string(),
                fmref_id: None,
            });
        } else if let Some(last) = entries.last_mut() {
            if last.fmref_id.is_none() {
                let id = el.text().collect::<String>().trim().to_string();
                if !id.is_empty() {
                    last.fmref_id = Some(id);
                }
            }
        }
    }
    entries
}

/// Keep only entries whose displayed name equals the query exactly
/// (case-sensitive, whitespace-trimmed).
pub fn exact_matches(entries: &[Candidate], query: &str) -> Vec<Candidate> {
    let query = query.trim();
    entries.iter().filter(|c| c.name == query).cloned().collect()
}

/// Disambiguation policy over the exact matches:
/// none at all, a single match without an id, the first id among several
/// matches, or no id anywhere.
pub fn choose(matches: &[Candidate]) -> LookupOutcome {
    match matches {
        [] => LookupOutcome::Sentinel(Sentinel::NotFound),
        [only] => match &only.fmref_id {
            Some(id) => LookupOutcome::Found(id.clone()),
            None => LookupOutcome::Sentinel(Sentinel::NoTeam),
        },
        many => many
            .iter()
            .find_map(|c| c.fmref_id.clone())
            .map(LookupOutcome::Found)
            .unwrap_or(LookupOutcome::Sentinel(Sentinel::Ambiguous)),
    }
}

/// Affiliated team from a player detail page: the first link whose target
/// path mentions a team.
pub fn extract_team(html: &str) -> LookupOutcome {
    let doc = Html::parse_document(html);
    let sel = Selector::parse(r#"a[href*="team"]"#).unwrap();

    match doc.select(&sel).next() {
        Some(a) => {
            let name = a.text().collect::<String>().trim().to_string();
            if name.is_empty() {
                LookupOutcome::Sentinel(Sentinel::NoTeam)
            } else {
                LookupOutcome::Found(name)
            }
        }
        None => LookupOutcome::Sentinel(Sentinel::NoTeam),
    }
}

/// FMRef ids are purely numeric; anything else never has a detail page.
pub fn is_numeric(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_digit())
}

/// Forward strategy: player name -> FMRef id via the search page.
pub struct NameSearchResolver {
    client: RenderClient,
}

impl NameSearchResolver {
    pub fn new(client: RenderClient) -> Self {
        Self { client }
    }
}

impl Resolver for NameSearchResolver {
    type Error = FmrefError;

    fn label(&self) -> &'static str {
        "name search"
    }

    fn eligible(&self, record: &TransferRecord) -> bool {
        record.fmref_unresolved()
    }

    fn failure_resolution(&self) -> Resolution {
        Resolution::FmrefId(LookupOutcome::Sentinel(Sentinel::NotFound))
    }

    async fn resolve(&self, record: &TransferRecord) -> Result<Resolution, FmrefError> {
        let url = self.client.search_url(&record.player);
        let html = self.client.render(&url).await?;
        let matches = exact_matches(&parse_entries(&html), &record.player);
        Ok(Resolution::FmrefId(choose(&matches)))
    }
}

/// Reverse strategy: FMRef id -> affiliated team via the detail page.
pub struct TeamLookupResolver {
    client: RenderClient,
}

impl TeamLookupResolver {
    pub fn new(client: RenderClient) -> Self {
        Self { client }
    }
}

impl Resolver for TeamLookupResolver {
    type Error = FmrefError;

    fn label(&self) -> &'static str {
        "team lookup"
    }

    fn eligible(&self, record: &TransferRecord) -> bool {
        is_numeric(&record.fmref_id) && record.team_unresolved()
    }

    fn failure_resolution(&self) -> Resolution {
        Resolution::FmrefTeam(LookupOutcome::Sentinel(Sentinel::NoTeam))
    }

    async fn resolve(&self, record: &TransferRecord) -> Result<Resolution, FmrefError> {
        // A non-numeric id can never have a detail page; skip the network
        // round-trip entirely.
        if !is_numeric(&record.fmref_id) {
            return Ok(Resolution::FmrefTeam(LookupOutcome::Sentinel(
                Sentinel::NotFound,
            )));
        }

        let url = self.client.player_url(&record.fmref_id);
        let html = self.client.render(&url).await?;
        Ok(Resolution::FmrefTeam(extract_team(&html)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transferwatch_core::record::RawRecord;

    fn candidate(name: &str, id: Option<&str>) -> Candidate {
        Candidate {
            name: name.to_string(),
            fmref_id: id.map(String::from),
        }
    }

    fn record_with_id(id: &str) -> TransferRecord {
        let mut rec = RawRecord {
            player: Some("Test Player".into()),
            ..Default::default()
        }
        .promote("2026-08-07 12:00:00".into())
        .unwrap();
        rec.fmref_id = id.to_string();
        rec
    }

    #[test]
    fn parse_entries_pairs_headings_with_their_buttons() {
        let html = r#"
            <div class="result">
              <h2> Declan Rice </h2>
              <p>West Ham United</p>
              <button class="fm-id">85002</button>
            </div>
            <div class="result">
              <h2>Declan Rice</h2>
              <p>retired</p>
            </div>
        "#;
        let entries = parse_entries(html);
        assert_eq!(
            entries,
            vec![
                candidate("Declan Rice", Some("85002")),
                candidate("Declan Rice", None),
            ]
        );
    }

    #[test]
    fn exact_matching_is_trimmed_and_case_sensitive() {
        let entries = vec![
            candidate("Declan Rice", Some("1")),
            candidate("declan rice", Some("2")),
            candidate("Declan Riceford", Some("3")),
        ];
        let matches = exact_matches(&entries, "  Declan Rice ");
        assert_eq!(matches, vec![candidate("Declan Rice", Some("1"))]);
    }

    #[test]
    fn test_choose_zero_candidates() {
        assert_eq!(choose(&[]), LookupOutcome::Sentinel(Sentinel::NotFound));
    }

    #[test]
    fn test_choose_single_candidate_with_id() {
        let matches = vec![candidate("A", Some("91024"))];
        assert_eq!(choose(&matches), LookupOutcome::Found("91024".into()));
    }

    #[test]
    fn test_choose_single_candidate_without_id() {
        let matches = vec![candidate("A", None)];
        assert_eq!(choose(&matches), LookupOutcome::Sentinel(Sentinel::NoTeam));
    }

    #[test]
    fn test_choose_first_id_among_many() {
        let matches = vec![
            candidate("A", None),
            candidate("A", Some("7")),
            candidate("A", Some("8")),
        ];
        assert_eq!(choose(&matches), LookupOutcome::Found("7".into()));
    }

    #[test]
    fn test_choose_many_without_ids() {
        let matches = vec![candidate("A", None), candidate("A", None)];
        assert_eq!(choose(&matches), LookupOutcome::Sentinel(Sentinel::Ambiguous));
    }

    #[test]
    fn extract_team_takes_first_team_link() {
        let html = r#"
            <a href="/league/premier-league">Premier League</a>
            <a href="/team/arsenal">Arsenal</a>
            <a href="/team/chelsea">Chelsea</a>
        "#;
        assert_eq!(extract_team(html), LookupOutcome::Found("Arsenal".into()));
    }

    #[test]
    fn extract_team_without_link_is_no_team() {
        let html = "<p>No club affiliation.</p>";
        assert_eq!(extract_team(html), LookupOutcome::Sentinel(Sentinel::NoTeam));
    }

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric("91024"));
        assert!(!is_numeric("abc"));
        assert!(!is_numeric("91a24"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("N/A"));
    }

    #[tokio::test]
    async fn non_numeric_id_short_circuits_without_network() {
        // Service URL points nowhere; the resolver must answer before any
        // request is attempted.
        let client = RenderClient::new("http://127.0.0.1:9", None, "http://127.0.0.1:9").unwrap();
        let resolver = TeamLookupResolver::new(client);

        let outcome = resolver.resolve(&record_with_id("abc")).await.unwrap();
        assert_eq!(
            outcome,
            Resolution::FmrefTeam(LookupOutcome::Sentinel(Sentinel::NotFound))
        );
    }

    #[test]
    fn eligibility_per_strategy() {
        let client = RenderClient::new("http://127.0.0.1:9", None, "http://127.0.0.1:9").unwrap();
        let forward = NameSearchResolver::new(client);
        let client = RenderClient::new("http://127.0.0.1:9", None, "http://127.0.0.1:9").unwrap();
        let reverse = TeamLookupResolver::new(client);

        let unresolved = record_with_id("N/A");
        assert!(forward.eligible(&unresolved));
        assert!(!reverse.eligible(&unresolved));

        let numbered = record_with_id("91024");
        assert!(!forward.eligible(&numbered));
        assert!(reverse.eligible(&numbered));

        let mut teamed = record_with_id("91024");
        teamed.fmref_team = Some("Arsenal".into());
        assert!(!reverse.eligible(&teamed));
    }
}
