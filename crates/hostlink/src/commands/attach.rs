//! `attach` and `alias` handlers.

use std::fmt::Write as _;

use hostlink_core::{
    AliasOutcome, AliasRequest, AttachOutcome, AttachRequest, DomainAttachmentService,
};

use crate::cli::{AliasArgs, AttachArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

fn attach_detail(outcome: &AttachOutcome, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Domain:     {} ({})", outcome.domain, outcome.classification);
    let _ = writeln!(out, "Project:    {} ({})", outcome.project_id, outcome.project_name);
    let _ = writeln!(
        out,
        "State:      {}",
        output::state_label(outcome.state, color)
    );
    util::status_lines(&mut out, outcome.status, color);

    if outcome.status.fully_verified() {
        out.push_str("\nNo DNS changes needed.");
    } else {
        out.push_str("\nCreate these DNS records, then run `hostlink verify`:\n");
        out.push_str(&util::dns_table(&outcome.required_dns));
    }
    out
}

pub async fn handle(
    service: &DomainAttachmentService,
    args: AttachArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let AttachArgs {
        project_id,
        deployment_url,
        domain,
    } = args;
    let request = AttachRequest::new(project_id, deployment_url, domain);

    let outcome =
        util::with_spinner(global, "Registering domain", service.attach(request)).await?;

    let color = output::should_color(global.color());
    let rendered = output::render_single(
        global.output(),
        &outcome,
        |o| attach_detail(o, color),
        |o| {
            o.required_dns
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}

pub async fn handle_alias(
    service: &DomainAttachmentService,
    args: AliasArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let AliasArgs {
        project_id,
        deployment_url,
        domain,
    } = args;
    let request = AliasRequest::new(project_id, deployment_url, domain);

    let outcome = util::with_spinner(global, "Creating alias", service.alias(request)).await?;

    let rendered = output::render_single(
        global.output(),
        &outcome,
        |o: &AliasOutcome| {
            format!(
                "{} -> {} (deployment {}, alias {})",
                o.alias, o.deployment_url, o.deployment_id, o.alias_uid
            )
        },
        |o| o.alias_uid.clone(),
    )?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}
