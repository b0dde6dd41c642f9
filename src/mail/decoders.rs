pub fn decode_subject(raw: &[u8]) -> String {
    // mailparse expects a full "Key: value" header line
    let mut line = b"Subject: ".to_vec();
    line.extend_from_slice(raw);
    line.extend_from_slice(b"\r\n");

    match mailparse::parse_header(&line) {
        Ok((h, _idx)) => h.get_value(), // decodes RFC 2047
        Err(_) => String::from_utf8_lossy(raw).into_owned(),
    }
}

pub fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n")
}

/// Best readable text of a raw RFC 822 message.
pub fn extract_body_text(raw_rfc822: &[u8]) -> String {
    let text = match mailparse::parse_mail(raw_rfc822) {
        Ok(parsed) => extract_text_part(&parsed).unwrap_or_else(|| {
            parsed
                .get_body()
                .unwrap_or_else(|_| String::from_utf8_lossy(raw_rfc822).into_owned())
        }),
        Err(_) => String::from_utf8_lossy(raw_rfc822).into_owned(),
    };
    normalize_newlines(&text)
}

fn extract_text_part(p: &mailparse::ParsedMail) -> Option<String> {
    if let Some(plain) = find_part(p, "text/plain") {
        return plain.get_body().ok();
    }
    let html = find_part(p, "text/html")?.get_body().ok()?;
    html2text::from_read(html.as_bytes(), 200).ok()
}

fn find_part<'a>(
    p: &'a mailparse::ParsedMail<'a>,
    mimetype: &str,
) -> Option<&'a mailparse::ParsedMail<'a>> {
    if p.ctype.mimetype.eq_ignore_ascii_case(mimetype) {
        return Some(p);
    }
    p.subparts.iter().find_map(|sp| find_part(sp, mimetype))
}
