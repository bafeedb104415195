//! Savings Token demo
//!
//! Replays the deployment walkthrough against an in-memory ledger: genesis
//! to a deployer, a transfer to a second account, a deposit from that
//! account, simulated waiting, and the withdrawal with interest.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use savings_token::{
    Address, Clock, LedgerEvent, ManualClock, SystemClock, TokenConfig, TokenProcessor,
    TokenState,
};

#[derive(Parser, Debug)]
#[command(name = "savings-token-demo", about = "Replay the Savings Token deployment walkthrough")]
struct Args {
    /// JSON file with `initial_supply` and `interest` overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// Amount the deployer sends to the second account
    #[arg(long, default_value_t = 1_000)]
    transfer: u64,

    /// Amount the second account deposits
    #[arg(long, default_value_t = 500)]
    deposit: u64,

    /// Simulated seconds between deposit and withdrawal
    #[arg(long, default_value_t = 300)]
    wait: u64,

    /// Print the event log as JSON lines
    #[arg(long)]
    json: bool,
}

/// [`LedgerEvent`] with hex-encoded addresses, as printed by `--json`
#[derive(Serialize)]
#[serde(tag = "event")]
enum EventJson {
    Transfer {
        from: String,
        to: String,
        amount: u64,
    },
    DepositMade {
        account: String,
        amount: u64,
    },
    Withdrawal {
        account: String,
        principal: u64,
        interest: u64,
    },
}

impl From<&LedgerEvent> for EventJson {
    fn from(event: &LedgerEvent) -> Self {
        match event {
            LedgerEvent::Transfer { from, to, amount } => Self::Transfer {
                from: hex::encode(from),
                to: hex::encode(to),
                amount: *amount,
            },
            LedgerEvent::DepositMade { account, amount } => Self::DepositMade {
                account: hex::encode(account),
                amount: *amount,
            },
            LedgerEvent::Withdrawal {
                account,
                principal,
                interest,
            } => Self::Withdrawal {
                account: hex::encode(account),
                principal: *principal,
                interest: *interest,
            },
        }
    }
}

#[derive(Serialize)]
struct EventLine {
    index: usize,
    #[serde(flatten)]
    event: EventJson,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<TokenConfig> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            TokenConfig::from_json_str(&raw)
                .with_context(|| format!("parsing config {}", path.display()))
        }
        None => Ok(TokenConfig::default()),
    }
}

fn account(label: &str) -> Address {
    let mut address = [0u8; 32];
    for (slot, byte) in address.iter_mut().zip(label.bytes()) {
        *slot = byte;
    }
    address
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;

    let deployer = account("deployer");
    let second = account("second");

    let clock = Arc::new(ManualClock::new(SystemClock.now()));
    let state = TokenState::genesis(deployer, &config)?;
    let token = TokenProcessor::new(state, clock.clone());
    info!(
        name = token.with_state(|s| s.name()),
        symbol = token.with_state(|s| s.symbol()),
        owner = %hex::encode(token.owner()),
        "token deployed"
    );

    info!(amount = args.transfer, "transferring to second account");
    token.transfer(deployer, second, args.transfer)?;
    info!(balance = token.balance_of(&second), "second account balance");

    info!(amount = args.deposit, "depositing from second account");
    token.deposit(second, args.deposit)?;

    clock.advance(args.wait);
    info!(seconds = args.wait, "time advanced");

    let withdrawal = token.withdraw(second)?;
    info!(
        principal = withdrawal.principal,
        interest = withdrawal.interest,
        balance = withdrawal.new_balance,
        "withdrawn with interest"
    );

    token.check_invariants()?;
    info!(
        total_supply = token.total_supply(),
        digest = %hex::encode(token.with_state(|s| s.state_digest())),
        "final state"
    );

    if args.json {
        for (index, event) in token.drain_events().iter().enumerate() {
            let line = EventLine {
                index,
                event: EventJson::from(event),
            };
            println!("{}", serde_json::to_string(&line)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_line_uses_hex_addresses() {
        let event = LedgerEvent::Transfer {
            from: account("deployer"),
            to: account("second"),
            amount: 1_000,
        };
        let line = EventLine {
            index: 1,
            event: EventJson::from(&event),
        };
        let json = serde_json::to_value(&line).unwrap();

        assert_eq!(json["index"], 1);
        assert_eq!(json["event"], "Transfer");
        assert_eq!(json["from"], hex::encode(account("deployer")));
        assert_eq!(json["to"].as_str().map(str::len), Some(64));
        assert_eq!(json["amount"], 1_000);
    }

    #[test]
    fn test_withdrawal_line_keeps_components() {
        let event = LedgerEvent::Withdrawal {
            account: account("second"),
            principal: 500,
            interest: 10,
        };
        let json = serde_json::to_value(EventJson::from(&event)).unwrap();

        assert_eq!(json["account"], hex::encode(account("second")));
        assert_eq!(json["principal"], 500);
        assert_eq!(json["interest"], 10);
    }
}
