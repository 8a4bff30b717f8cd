//! Print the last few entries of the request log, oldest first.

use anyhow::Result;
use cbr_mock::{Config, RequestLog};

const TAIL: u32 = 5;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    let log = RequestLog::connect(&config).await?;

    let mut entries = log.recent(TAIL).await?;
    entries.reverse();

    println!("Last {} requests:", entries.len());
    for entry in entries {
        println!(
            "({}, {:?}, {:?}, {}, {})",
            entry.id,
            entry.date_req,
            entry.test_id,
            entry.response_code,
            entry.timestamp
        );
    }

    Ok(())
}
