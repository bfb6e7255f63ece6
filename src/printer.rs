use crate::scanner::token::Token;

/// Output format for a scanned token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Format {
    #[default]
    Text,
    Json,
}

pub fn render(tokens: &[Token], format: Format) -> serde_json::Result<String> {
    match format {
        Format::Text => Ok(to_text(tokens)),
        Format::Json => to_json(tokens),
    }
}

/// One token per line, `KIND lexeme literal`.
pub fn to_text(tokens: &[Token]) -> String {
    let mut buf = String::new();
    for token in tokens {
        buf.push_str(&token.to_string());
        buf.push('\n');
    }
    buf
}

pub fn to_json(tokens: &[Token]) -> serde_json::Result<String> {
    let mut json = serde_json::to_string_pretty(tokens)?;
    json.push('\n');
    Ok(json)
}
