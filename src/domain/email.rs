/// One message as handed to the candidate extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub title: String,
    pub body: String,
}

impl MessageRecord {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}
