use std::collections::HashSet;

use crate::error::{Error, Result};

pub fn webhook_token(token: &str) -> Result<()> {
    const CHARS: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
    validate_charset("Token", token, CHARS).map_err(Error::InvalidToken)
}

fn validate_charset(
    description: &'static str,
    string: &str,
    charset: &'static [u8],
) -> std::result::Result<(), String> {
    if string.is_empty() {
        return Err(format!("{description} is empty"));
    }
    if string.bytes().all(|b| charset.contains(&b)) {
        return Ok(());
    }

    let set = string
        .bytes()
        .filter(|b| !charset.contains(b))
        .map(char::from)
        .collect::<HashSet<char>>();
    Err(format!("{description} contains invalid characters: {set:?}"))
}
