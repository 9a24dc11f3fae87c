//! Synthetic burn payloads for exercising a webhook endpoint end to end

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};

use crate::domain::sentinels::INCINERATOR;

/// Placeholder signature used when none is supplied
pub const TEST_SIGNATURE: &str =
    "5h6xBEauJ3PK6SWCZ1PGjBvj8vDdWG3KpwATGy1ARAXFSDwt8GFXM7W5Ncn16wmqokgpiKRLuS83KUxyZyv2sUYv";
/// Fee payer placed at index 0 of the synthetic account list
const TEST_FEE_PAYER: &str = "11111111111111111111111111111111";

/// Build a webhook-shaped burn payload.
///
/// With a mint the logs carry a `mint:` line and the burn destination sits at
/// index 1 with a post-token balance; without one the logs only mention the
/// burn, which a log-pattern classifier treats as a partial match.
pub fn burn_test_payload(signature: &str, mint: Option<&str>) -> Value {
    let (logs, balances) = match mint {
        Some(mint) => (
            vec![
                "Program log: Instruction: Burn".to_string(),
                format!("Program log: mint: {}", mint),
            ],
            json!([{
                "accountIndex": 1,
                "mint": mint,
                "uiTokenAmount": { "uiAmountString": "1000", "amount": "1000000000", "decimals": 6 }
            }]),
        ),
        None => (
            vec!["Program log: Burn instruction detected".to_string()],
            json!([]),
        ),
    };

    json!({
        "transaction": {
            "signatures": [signature],
            "message": {
                "accountKeys": [TEST_FEE_PAYER, INCINERATOR],
                "instructions": []
            }
        },
        "meta": {
            "err": null,
            "logMessages": logs,
            "preBalances": [1_000_000_000u64, 0],
            "postBalances": [999_995_000u64, 0],
            "postTokenBalances": balances
        }
    })
}

/// POST a payload to a webhook endpoint; returns the status and body
pub async fn send_test_payload(url: &str, payload: &Value) -> Result<(u16, String), reqwest::Error> {
    let http = Client::builder().timeout(Duration::from_secs(10)).build()?;
    let response = http.post(url).json(payload).send().await?;
    let status = response.status().as_u16();
    let body = response.text().await?;
    Ok((status, body))
}
