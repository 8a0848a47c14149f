use serde::Serialize;
use timecard_core::error::TimecardError;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), TimecardError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
