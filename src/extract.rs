//! Pulls the selectable address out of form-mail bodies.
//!
//! The mails carry a tab-separated table; the row we want looks like
//! `Ihre E-Mail-Adresse<TAB>alice@example.com`.

use crate::domain::email::MessageRecord;
use crate::error::SessionError;
use crate::mail::source::MailSource;

/// Value of the first line starting with `label` followed by a tab.
///
/// Later matching lines in the same body are ignored, even when the first
/// one holds only whitespace; such a body yields nothing.
pub fn extract_candidate(body: &str, label: &str) -> Option<String> {
    body.split('\n')
        .find_map(|line| {
            let rest = line.strip_prefix(label)?.strip_prefix('\t')?;
            let value = rest.split('\t').next().unwrap_or_default();
            Some(value.trim().to_string())
        })
        .filter(|v| !v.is_empty())
}

/// Candidates in source order. Duplicates are kept.
pub fn extract_candidates(records: &[MessageRecord], label: &str) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| extract_candidate(&r.body, label))
        .collect()
}

/// Fetch from `source` and extract, logging how much was kept.
pub fn candidates_from_source(
    source: &dyn MailSource,
    label: &str,
) -> Result<Vec<String>, SessionError> {
    let records = source.fetch_messages().map_err(SessionError::Mail)?;
    let candidates = extract_candidates(&records, label);
    log::info!(
        "{} candidate(s) from {} message(s)",
        candidates.len(),
        records.len()
    );
    for r in &records {
        log::trace!("message {:?}", r.title);
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABEL: &str = "Ihre E-Mail-Adresse";

    #[test]
    fn takes_field_after_tab_and_trims() {
        let body = "Anrede\tFrau\nIhre E-Mail-Adresse\t  alice@example.com \t(privat)\nPLZ\t12345";
        assert_eq!(
            extract_candidate(body, LABEL).as_deref(),
            Some("alice@example.com")
        );
    }

    #[test]
    fn absent_without_label_line() {
        assert_eq!(extract_candidate("Hallo\nWelt", LABEL), None);
        assert_eq!(extract_candidate("", LABEL), None);
    }

    #[test]
    fn label_must_be_followed_by_tab() {
        assert_eq!(extract_candidate("Ihre E-Mail-Adresse: a@b.c", LABEL), None);
        assert_eq!(extract_candidate("  Ihre E-Mail-Adresse\ta@b.c", LABEL), None);
    }

    #[test]
    fn only_first_match_counts() {
        let body = "Ihre E-Mail-Adresse\tfirst@example.com\nIhre E-Mail-Adresse\tsecond@example.com";
        assert_eq!(
            extract_candidate(body, LABEL).as_deref(),
            Some("first@example.com")
        );
    }

    #[test]
    fn trailing_carriage_return_is_trimmed() {
        assert_eq!(
            extract_candidate("Ihre E-Mail-Adresse\tbob@example.com\r\n", LABEL).as_deref(),
            Some("bob@example.com")
        );
    }

    #[test]
    fn blank_value_yields_nothing() {
        assert_eq!(extract_candidate("Ihre E-Mail-Adresse\t   \nx", LABEL), None);
        assert_eq!(extract_candidate("Ihre E-Mail-Adresse\t\tnote", LABEL), None);
        // a blank first match is not rescued by a later line
        let body = "Ihre E-Mail-Adresse\t \nIhre E-Mail-Adresse\tlate@example.com";
        assert_eq!(extract_candidate(body, LABEL), None);
    }

    #[test]
    fn blank_values_are_not_offered() {
        let records = vec![
            MessageRecord::new("1", "Ihre E-Mail-Adresse\t   \nx"),
            MessageRecord::new("2", "Ihre E-Mail-Adresse\ta@example.com"),
        ];
        assert_eq!(extract_candidates(&records, LABEL), vec!["a@example.com"]);
    }

    struct Canned(Vec<MessageRecord>);

    impl MailSource for Canned {
        fn fetch_messages(&self) -> anyhow::Result<Vec<MessageRecord>> {
            Ok(self.0.clone())
        }
    }

    struct Broken;

    impl MailSource for Broken {
        fn fetch_messages(&self) -> anyhow::Result<Vec<MessageRecord>> {
            Err(anyhow::anyhow!("connection refused"))
        }
    }

    #[test]
    fn source_errors_are_mail_errors() {
        assert!(matches!(
            candidates_from_source(&Broken, LABEL),
            Err(SessionError::Mail(_))
        ));
    }

    #[test]
    fn source_records_are_extracted() {
        let src = Canned(vec![
            MessageRecord::new("Abo", "Ihre E-Mail-Adresse\tz@example.com"),
            MessageRecord::new("Spam", "hello"),
        ]);
        assert_eq!(
            candidates_from_source(&src, LABEL).unwrap(),
            vec!["z@example.com"]
        );
    }

    #[test]
    fn candidates_keep_order_and_duplicates() {
        let records = vec![
            MessageRecord::new("1", "Ihre E-Mail-Adresse\tb@example.com"),
            MessageRecord::new("2", "unrelated newsletter"),
            MessageRecord::new("3", "Ihre E-Mail-Adresse\ta@example.com"),
            MessageRecord::new("4", "x\nIhre E-Mail-Adresse\tb@example.com\n"),
        ];
        assert_eq!(
            extract_candidates(&records, LABEL),
            vec!["b@example.com", "a@example.com", "b@example.com"]
        );
    }
}
