//! Canonical event types emitted by the funding terminal contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/terminal/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the terminal contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A deposit was processed (`pay` topic).
    Pay,
    /// A withdrawal ran (`tap` topic).
    Tap,
    /// Tickets were redeemed or burned (`redeem` topic).
    Redeem,
    /// A project moved to another terminal (`migrate` topic).
    Migrate,
    /// A direct balance top-up (`add_bal` topic).
    AddToBalance,
    /// Reserved tickets were printed (`res_print` topic).
    PrintReserved,
    /// Premined tickets were printed (`pre_print` topic).
    PrintPremined,
    /// A payout split received its cut (`split_pay` topic).
    DistributePayoutSplit,
    /// A ticket split received its cut (`split_tik` topic).
    DistributeTicketSplit,
    /// A cycle was configured or queued (`configure` topic).
    Configure,
    /// A project was created or adopted (`project` topic).
    ProjectCreated,
    /// A terminal joined the migration allow-list (`allow_mig` topic).
    AllowMigration,
    /// The protocol fee changed (`set_fee` topic).
    SetFee,
    /// A price feed was registered (`price_set` topic).
    PriceFeedSet,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "pay" => Self::Pay,
            "tap" => Self::Tap,
            "redeem" => Self::Redeem,
            "migrate" => Self::Migrate,
            "add_bal" => Self::AddToBalance,
            "res_print" => Self::PrintReserved,
            "pre_print" => Self::PrintPremined,
            "split_pay" => Self::DistributePayoutSplit,
            "split_tik" => Self::DistributeTicketSplit,
            "configure" => Self::Configure,
            "project" => Self::ProjectCreated,
            "allow_mig" => Self::AllowMigration,
            "set_fee" => Self::SetFee,
            "price_set" => Self::PriceFeedSet,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pay => "pay",
            Self::Tap => "tap",
            Self::Redeem => "redeem",
            Self::Migrate => "migrate",
            Self::AddToBalance => "add_to_balance",
            Self::PrintReserved => "print_reserved",
            Self::PrintPremined => "print_premined",
            Self::DistributePayoutSplit => "distribute_payout_split",
            Self::DistributeTicketSplit => "distribute_ticket_split",
            Self::Configure => "configure",
            Self::ProjectCreated => "project_created",
            Self::AllowMigration => "allow_migration",
            Self::SetFee => "set_fee",
            Self::PriceFeedSet => "price_feed_set",
            Self::Unknown => "unknown",
        }
    }
}

/// A fully decoded terminal event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalEvent {
    pub event_type: String,
    pub project_id: Option<String>,
    /// The address that drove the state change (payer, holder, top-up
    /// sender, migration destination, ...).
    pub actor: Option<String>,
    pub beneficiary: Option<String>,
    /// Primary amount of the event: deposit, gross withdrawal, proceeds,
    /// printed tickets, or split cut.
    pub amount: Option<String>,
    /// Protocol fee extracted, for withdrawal events.
    pub fee: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_type: String,
    pub project_id: Option<String>,
    pub actor: Option<String>,
    pub beneficiary: Option<String>,
    pub amount: Option<String>,
    pub fee: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
