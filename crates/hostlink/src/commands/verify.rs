//! `verify` handler.

use std::fmt::Write as _;

use hostlink_core::{DomainAttachmentService, VerifyOutcome, VerifyRequest};

use crate::cli::{GlobalOpts, VerifyArgs};
use crate::error::CliError;
use crate::output;

use super::util;

fn verify_detail(outcome: &VerifyOutcome, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Domain:     {}", outcome.domain());
    let _ = writeln!(
        out,
        "State:      {}",
        output::state_label(outcome.state(), color)
    );
    util::status_lines(&mut out, outcome.status(), color);

    match outcome {
        VerifyOutcome::MissingOwnershipRecord { required, .. } => {
            out.push_str("\nThe provider has not seen the ownership record yet. Create it:\n");
            out.push_str(&util::dns_table(std::slice::from_ref(required)));
        }
        VerifyOutcome::Checked {
            current_records,
            required_dns,
            ..
        } => {
            if !current_records.is_empty() {
                let _ = writeln!(out);
                if !current_records.a_values.is_empty() {
                    let _ = writeln!(out, "Resolves A:     {}", current_records.a_values.join(", "));
                }
                if !current_records.cnames.is_empty() {
                    let _ = writeln!(out, "Resolves CNAME: {}", current_records.cnames.join(", "));
                }
            }
            if let Some(records) = required_dns.as_deref().filter(|r| !r.is_empty()) {
                out.push_str("\nRequired DNS records:\n");
                out.push_str(&util::dns_table(records));
            }
        }
    }
    out
}

pub async fn handle(
    service: &DomainAttachmentService,
    args: VerifyArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let VerifyArgs {
        project_id,
        domain,
        replan,
    } = args;
    let request = VerifyRequest::new(project_id, domain).with_replan(replan);

    let outcome = util::with_spinner(global, "Checking DNS", service.verify(request)).await?;

    let color = output::should_color(global.color());
    let rendered = output::render_single(
        global.output(),
        &outcome,
        |o| verify_detail(o, color),
        |o| o.state().to_string(),
    )?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use hostlink_core::{AttachmentState, DnsRecord, ObservedRecords, VerificationStatus};

    use super::*;

    #[test]
    fn missing_record_detail_shows_the_txt_record() {
        let outcome = VerifyOutcome::MissingOwnershipRecord {
            project_id: "proj1".into(),
            domain: "example.com".into(),
            required: DnsRecord::txt("_vercel.example.com", "abc123"),
            status: VerificationStatus::new(false, true),
            state: AttachmentState::PendingOwnership,
        };
        let text = verify_detail(&outcome, false);
        assert!(text.contains("pending-ownership"));
        assert!(text.contains("_vercel.example.com"));
        assert!(text.contains("abc123"));
    }

    #[test]
    fn checked_detail_lists_resolved_records() {
        let outcome = VerifyOutcome::Checked {
            project_id: "proj1".into(),
            domain: "example.com".into(),
            status: VerificationStatus::new(true, true),
            state: AttachmentState::Verified,
            current_records: ObservedRecords {
                a_values: vec!["76.76.21.21".into()],
                cnames: Vec::new(),
            },
            required_dns: None,
        };
        let text = verify_detail(&outcome, false);
        assert!(text.contains("Resolves A:     76.76.21.21"));
        assert!(!text.contains("Required DNS"));
    }
}
