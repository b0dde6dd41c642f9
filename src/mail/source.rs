use anyhow::Result;

use crate::domain::email::MessageRecord;

pub trait MailSource {
    /// Most recent messages, newest first.
    fn fetch_messages(&self) -> Result<Vec<MessageRecord>>;
}
