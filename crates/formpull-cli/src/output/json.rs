use formpull_core::error::FormpullError;
use serde::Serialize;

pub fn print<T: Serialize>(value: &T) -> Result<(), FormpullError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
