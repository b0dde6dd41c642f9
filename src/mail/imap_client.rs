use crate::config::ImapSettings;
use crate::domain::email::MessageRecord;
use crate::mail::decoders::{decode_subject, extract_body_text};
use crate::mail::source::MailSource;
use anyhow::{Context, Result, anyhow};
use native_tls::TlsConnector;

type ImapSession = imap::Session<native_tls::TlsStream<std::net::TcpStream>>;

pub struct ImapClient {
    settings: ImapSettings,
}

impl ImapClient {
    pub fn new(settings: ImapSettings) -> Self {
        Self { settings }
    }

    fn connect_and_login(&self) -> Result<ImapSession> {
        let s = &self.settings;
        log::debug!("connecting to {}:{}", s.host, s.port);
        let tls = TlsConnector::builder().build()?;
        let client = imap::connect((s.host.as_str(), s.port), s.host.as_str(), &tls)
            .with_context(|| format!("connecting to {}:{}", s.host, s.port))?;

        client
            .login(&s.username, &s.password)
            .map_err(|(e, _client)| anyhow!("IMAP login as {} failed: {e}", s.username))
    }

    fn fetch_with_session(&self, session: &mut ImapSession) -> Result<Vec<MessageRecord>> {
        let s = &self.settings;

        // EXAMINE keeps the mailbox read-only, no \Seen flags get set
        let mailbox = session
            .examine(&s.mailbox)
            .with_context(|| format!("examining {}", s.mailbox))?;
        log::debug!("{} has {} messages", s.mailbox, mailbox.exists);

        let uids: Vec<u32> = session
            .uid_search(&s.search)
            .with_context(|| format!("searching {:?}", s.search))?
            .into_iter()
            .collect();
        let page_uids = newest_uids(uids, s.limit);
        log::info!("fetching {} message(s) from {}", page_uids.len(), s.mailbox);

        let mut out = Vec::with_capacity(page_uids.len());
        for uid in page_uids {
            let fetches = session.uid_fetch(uid.to_string(), "(UID ENVELOPE BODY.PEEK[])")?;
            let f = match fetches.iter().next() {
                Some(x) => x,
                None => {
                    log::warn!("UID {uid} vanished before fetch");
                    continue;
                }
            };

            let title = f
                .envelope()
                .and_then(|env| env.subject)
                .map(decode_subject)
                .unwrap_or_else(|| "(no subject)".to_string());

            let body = match f.body() {
                Some(raw) => extract_body_text(raw),
                None => {
                    log::warn!("UID {uid} has no body; using empty text");
                    String::new()
                }
            };

            out.push(MessageRecord { title, body });
        }
        Ok(out)
    }
}

impl MailSource for ImapClient {
    fn fetch_messages(&self) -> Result<Vec<MessageRecord>> {
        let mut session = self.connect_and_login()?;
        let result = self.fetch_with_session(&mut session);
        if let Err(e) = session.logout() {
            log::debug!("IMAP logout failed: {e}");
        }
        result
    }
}

/// The `limit` highest UIDs, newest first.
fn newest_uids(mut uids: Vec<u32>, limit: usize) -> Vec<u32> {
    uids.sort_unstable_by(|a, b| b.cmp(a));
    uids.dedup();
    uids.truncate(limit);
    uids
}
