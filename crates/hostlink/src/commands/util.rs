//! Shared helpers for command handlers.

use std::fmt::Write as _;
use std::future::Future;

use chrono::{DateTime, Utc};
use tabled::Tabled;

use hostlink_core::{DnsRecord, VerificationStatus};

use crate::cli::GlobalOpts;
use crate::output;

/// One DNS record the user has to create.
#[derive(Tabled)]
pub struct DnsRow {
    #[tabled(rename = "Type")]
    pub kind: String,
    #[tabled(rename = "Host")]
    pub host: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "TTL")]
    pub ttl: u32,
}

impl From<&DnsRecord> for DnsRow {
    fn from(record: &DnsRecord) -> Self {
        Self {
            kind: record.kind.to_string(),
            host: record.host.clone(),
            value: record.value.clone(),
            ttl: record.ttl,
        }
    }
}

pub fn dns_table(records: &[DnsRecord]) -> String {
    let rows: Vec<DnsRow> = records.iter().map(DnsRow::from).collect();
    output::render_table(&rows)
}

pub fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// `Ownership / Routing / Verified` lines for detail views.
pub fn status_lines(out: &mut String, status: VerificationStatus, color: bool) {
    let _ = writeln!(
        out,
        "Ownership:  {}",
        output::check_mark(status.ownership_verified(), color)
    );
    let _ = writeln!(
        out,
        "Routing:    {}",
        output::check_mark(status.routing_verified(), color)
    );
    let _ = writeln!(
        out,
        "Verified:   {}",
        output::check_mark(status.fully_verified(), color)
    );
}

/// Await `fut` behind a spinner when the terminal allows one.
pub async fn with_spinner<F: Future>(global: &GlobalOpts, message: &str, fut: F) -> F::Output {
    let bar = output::spinner(global, message);
    let result = fut.await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    result
}
