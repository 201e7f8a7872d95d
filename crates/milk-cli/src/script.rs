//! Scripted ledger calls.
//!
//! A script is a JSON array of calls applied in order. Amounts are written
//! in token units (`"1.5"`) and scaled by the ledger's decimals; a deposit
//! may instead carry a raw hex `payload` to exercise the decoder.
//!
//! ```json
//! [
//!   { "op": "setup_role", "caller": "0xadad…", "role": "DEPOSITOR", "account": "0x01…" },
//!   { "op": "deposit", "caller": "0x01…", "recipient": "0x02…", "amount": "100000000" },
//!   { "op": "withdraw", "caller": "0x02…", "amount": "100000000" }
//! ]
//! ```

use std::{io::Write, path::Path};

use milk_ledger::{RoleGatedLedger, SupplyReport};
use milk_types::{
    AccountId, LoggedEvent, MilkError, Result, Role, encode_amount, parse_units,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// One scripted ledger call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Call {
    SetupRole {
        caller: AccountId,
        role: Role,
        account: AccountId,
    },
    RevokeRole {
        caller: AccountId,
        role: Role,
        account: AccountId,
    },
    Deposit {
        caller: AccountId,
        recipient: AccountId,
        #[serde(default)]
        amount: Option<String>,
        #[serde(default)]
        payload: Option<String>,
    },
    Withdraw {
        caller: AccountId,
        amount: String,
    },
    GameMint {
        caller: AccountId,
        recipient: AccountId,
        amount: String,
    },
    GameBurn {
        caller: AccountId,
        account: AccountId,
        amount: String,
    },
    GameTransferFrom {
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: String,
    },
    GameWithdraw {
        caller: AccountId,
        account: AccountId,
        amount: String,
    },
    Transfer {
        caller: AccountId,
        to: AccountId,
        amount: String,
    },
    Approve {
        caller: AccountId,
        spender: AccountId,
        amount: String,
    },
    TransferFrom {
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: String,
    },
}

impl Call {
    /// Operation name as written in the script.
    pub fn op(&self) -> &'static str {
        match self {
            Self::SetupRole { .. } => "setup_role",
            Self::RevokeRole { .. } => "revoke_role",
            Self::Deposit { .. } => "deposit",
            Self::Withdraw { .. } => "withdraw",
            Self::GameMint { .. } => "game_mint",
            Self::GameBurn { .. } => "game_burn",
            Self::GameTransferFrom { .. } => "game_transfer_from",
            Self::GameWithdraw { .. } => "game_withdraw",
            Self::Transfer { .. } => "transfer",
            Self::Approve { .. } => "approve",
            Self::TransferFrom { .. } => "transfer_from",
        }
    }

    /// Apply the call and return the events it emitted.
    pub fn apply(&self, ledger: &mut RoleGatedLedger) -> Result<Vec<LoggedEvent>> {
        let decimals = ledger.decimals();
        let start = ledger.events().len();

        match self {
            Self::SetupRole {
                caller,
                role,
                account,
            } => {
                ledger.setup_role(*caller, *role, *account)?;
            }
            Self::RevokeRole {
                caller,
                role,
                account,
            } => {
                ledger.revoke_role(*caller, *role, *account)?;
            }
            Self::Deposit {
                caller,
                recipient,
                amount,
                payload,
            } => {
                let bytes = deposit_payload(amount.as_deref(), payload.as_deref(), decimals)?;
                ledger.deposit(*caller, *recipient, &bytes)?;
            }
            Self::Withdraw { caller, amount } => {
                ledger.withdraw(*caller, parse_units(amount, decimals)?)?;
            }
            Self::GameMint {
                caller,
                recipient,
                amount,
            } => {
                ledger.game_mint(*caller, *recipient, parse_units(amount, decimals)?)?;
            }
            Self::GameBurn {
                caller,
                account,
                amount,
            } => {
                ledger.game_burn(*caller, *account, parse_units(amount, decimals)?)?;
            }
            Self::GameTransferFrom {
                caller,
                from,
                to,
                amount,
            } => {
                ledger.game_transfer_from(*caller, *from, *to, parse_units(amount, decimals)?)?;
            }
            Self::GameWithdraw {
                caller,
                account,
                amount,
            } => {
                ledger.game_withdraw(*caller, *account, parse_units(amount, decimals)?)?;
            }
            Self::Transfer { caller, to, amount } => {
                ledger.transfer(*caller, *to, parse_units(amount, decimals)?)?;
            }
            Self::Approve {
                caller,
                spender,
                amount,
            } => {
                ledger.approve(*caller, *spender, parse_units(amount, decimals)?);
            }
            Self::TransferFrom {
                caller,
                from,
                to,
                amount,
            } => {
                ledger.transfer_from(*caller, *from, *to, parse_units(amount, decimals)?)?;
            }
        }

        Ok(ledger.events()[start..].to_vec())
    }
}

/// Build the raw deposit payload from either a token amount or hex bytes.
fn deposit_payload(amount: Option<&str>, payload: Option<&str>, decimals: u8) -> Result<Vec<u8>> {
    match (amount, payload) {
        (Some(amount), None) => Ok(encode_amount(parse_units(amount, decimals)?).to_vec()),
        (None, Some(raw)) => hex::decode(raw.strip_prefix("0x").unwrap_or(raw)).map_err(|e| {
            MilkError::MalformedPayload {
                reason: format!("payload is not hex: {e}"),
            }
        }),
        _ => Err(MilkError::Configuration(
            "deposit needs exactly one of `amount` or `payload`".into(),
        )),
    }
}

/// Read a script file.
pub fn load_script(path: impl AsRef<Path>) -> Result<Vec<Call>> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| MilkError::Configuration(format!("invalid script: {e}")))
}

/// Outcome of a whole replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplaySummary {
    pub applied: usize,
    pub rejected: usize,
    pub supply: SupplyReport,
    pub log_digest: String,
}

/// Apply every call in order, writing one JSON line per call to `out`.
/// Rejected calls are reported and the replay continues.
pub fn replay(
    ledger: &mut RoleGatedLedger,
    calls: &[Call],
    out: &mut impl Write,
) -> Result<ReplaySummary> {
    let mut applied = 0;
    let mut rejected = 0;

    for (step, call) in calls.iter().enumerate() {
        let line = match call.apply(ledger) {
            Ok(events) => {
                applied += 1;
                json!({ "step": step, "op": call.op(), "ok": true, "events": events })
            }
            Err(err) => {
                rejected += 1;
                tracing::debug!(step, op = call.op(), error = %err, "Call rejected");
                json!({ "step": step, "op": call.op(), "ok": false, "error": err.to_string() })
            }
        };
        writeln!(out, "{line}")?;
    }

    ledger.verify_supply()?;
    let summary = ReplaySummary {
        applied,
        rejected,
        supply: ledger.supply_report(),
        log_digest: format!("0x{}", hex::encode(ledger.log_digest())),
    };
    tracing::info!(
        applied,
        rejected,
        total_supply = %summary.supply.total_supply,
        log_digest = %summary.log_digest,
        "Replay complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use milk_types::LedgerConfig;

    fn setup() -> (RoleGatedLedger, AccountId, AccountId, AccountId) {
        let admin = AccountId::from_seed(1);
        let depositor = AccountId::from_seed(2);
        let bob = AccountId::from_seed(3);
        let ledger =
            RoleGatedLedger::new(LedgerConfig::with_accounts(admin, AccountId::from_seed(0)))
                .unwrap();
        (ledger, admin, depositor, bob)
    }

    #[test]
    fn parses_tagged_calls() {
        let a = AccountId::from_seed(1);
        let json = format!(
            r#"[{{"op":"withdraw","caller":"{a}","amount":"1.5"}},
                {{"op":"setup_role","caller":"{a}","role":"CONTRACT","account":"{a}"}}]"#
        );
        let calls: Vec<Call> = serde_json::from_str(&json).unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].op(), "withdraw");
        assert_eq!(
            calls[1],
            Call::SetupRole {
                caller: a,
                role: Role::Contract,
                account: a
            }
        );
    }

    #[test]
    fn replay_reports_each_step_and_continues_after_rejection() {
        let (mut ledger, admin, depositor, bob) = setup();
        let calls = vec![
            Call::SetupRole {
                caller: admin,
                role: Role::Depositor,
                account: depositor,
            },
            Call::Deposit {
                caller: depositor,
                recipient: bob,
                amount: Some("100000000".into()),
                payload: None,
            },
            Call::Deposit {
                caller: bob,
                recipient: bob,
                amount: Some("1".into()),
                payload: None,
            },
            Call::Withdraw {
                caller: bob,
                amount: "100000000".into(),
            },
        ];

        let mut out = Vec::new();
        let summary = replay(&mut ledger, &calls, &mut out).unwrap();
        assert_eq!(summary.applied, 3);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.supply.total_supply, U256::ZERO);

        let lines: Vec<serde_json::Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1]["ok"], true);
        assert_eq!(lines[1]["events"][0]["event"]["kind"], "transfer");
        assert_eq!(lines[2]["ok"], false);
        assert!(
            lines[2]["error"]
                .as_str()
                .unwrap()
                .contains("is missing role")
        );
    }

    #[test]
    fn raw_payload_deposit_is_decoded() {
        let (mut ledger, admin, depositor, bob) = setup();
        ledger.setup_role(admin, Role::Depositor, depositor).unwrap();

        let good = Call::Deposit {
            caller: depositor,
            recipient: bob,
            amount: None,
            payload: Some(format!("0x{}", hex::encode(encode_amount(U256::from(42u64))))),
        };
        good.apply(&mut ledger).unwrap();
        assert_eq!(ledger.balance_of(bob), U256::from(42u64));

        let short = Call::Deposit {
            caller: depositor,
            recipient: bob,
            amount: None,
            payload: Some("0x0102".into()),
        };
        assert!(matches!(
            short.apply(&mut ledger),
            Err(MilkError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn deposit_needs_exactly_one_source() {
        assert!(deposit_payload(None, None, 18).is_err());
        assert!(deposit_payload(Some("1"), Some("00"), 18).is_err());
        assert_eq!(deposit_payload(Some("1"), None, 0).unwrap().len(), 32);
    }

    #[test]
    fn demo_script_replays() {
        let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
        let config = LedgerConfig::from_json_file(demos.join("ledger.json")).unwrap();
        let calls = load_script(demos.join("bridge_and_game.json")).unwrap();
        let mut ledger = RoleGatedLedger::new(config).unwrap();

        let summary = replay(&mut ledger, &calls, &mut std::io::sink()).unwrap();
        assert_eq!(summary.applied, 9);
        assert_eq!(summary.rejected, 3);
        assert_eq!(
            summary.supply.total_supply,
            parse_units("160000000", 18).unwrap()
        );
        assert_eq!(
            summary.supply.reserve_balance,
            parse_units("100000000", 18).unwrap()
        );
    }

    #[test]
    fn bad_script_is_configuration_error() {
        let err = serde_json::from_str::<Vec<Call>>(r#"[{"op":"teleport"}]"#);
        assert!(err.is_err());
        let err = load_script("/no/such/script.json").unwrap_err();
        assert!(matches!(err, MilkError::Io(_)));
    }
}
