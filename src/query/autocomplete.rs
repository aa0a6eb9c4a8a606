use crate::error::Result;
use crate::index::SearchIndex;
use crate::types::User;
use indexmap::IndexMap;
use tantivy::collector::Count;
use tantivy::query::TermQuery;
use tantivy::schema::IndexRecordOption;
use tantivy::Term;

/// Cap on dictionary expansions per input token per segment, to keep the
/// candidate set bounded on pathological prefixes.
const MAX_EXPANSIONS: usize = 50;

/// Rank completions for `term` against the document bodies.
///
/// The input is tokenized with the body's exact (non-stemming) analyzer and
/// each token is expanded over the term dictionary, so candidates are the
/// surface forms actually indexed. Each candidate is scored by the number of
/// matching documents; ties keep dictionary encounter order. If the exact
/// input term appears among the ranked candidates it is moved to the front
/// regardless of its frequency rank.
///
/// `user` is accepted for parity with the query path but permission
/// filtering is deliberately a no-op here.
pub(crate) fn suggest(
    index: &SearchIndex,
    term: &str,
    limit: usize,
    _user: Option<&User>,
) -> Result<Vec<String>> {
    let fields = index.fields();
    let searcher = index.searcher()?;

    let mut analyzer = index.tantivy().tokenizer_for_field(fields.content_exact)?;
    let mut tokens: Vec<String> = Vec::new();
    let mut stream = analyzer.token_stream(term);
    while let Some(token) = stream.next() {
        tokens.push(token.text.clone());
    }

    // Candidate terms in first-encountered (dictionary) order.
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for segment in searcher.segment_readers() {
        let inverted = segment.inverted_index(fields.content_exact)?;
        for token in &tokens {
            let prefix = token.as_bytes();
            let mut upper = prefix.to_vec();
            upper.push(0xFF);

            let mut terms = inverted
                .terms()
                .range()
                .ge(prefix)
                .lt(&upper)
                .into_stream()?;
            let mut expanded = 0;
            while terms.advance() && expanded < MAX_EXPANSIONS {
                let candidate = String::from_utf8_lossy(terms.key()).into_owned();
                counts.entry(candidate).or_insert(0);
                expanded += 1;
            }
        }
    }

    // Matched-term frequency: how many documents each candidate occurs in.
    for (candidate, count) in counts.iter_mut() {
        let query = TermQuery::new(
            Term::from_field_text(fields.content_exact, candidate),
            IndexRecordOption::Basic,
        );
        *count = searcher.search(&query, &Count)?;
    }

    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .collect();
    // sort_by is stable, so equal counts keep their encounter order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let mut suggestions: Vec<String> = ranked
        .into_iter()
        .take(limit)
        .map(|(candidate, _)| candidate)
        .collect();

    if let Some(pos) = suggestions
        .iter()
        .position(|s| s.as_bytes() == term.as_bytes())
    {
        let exact = suggestions.remove(pos);
        suggestions.insert(0, exact);
    }

    Ok(suggestions)
}
