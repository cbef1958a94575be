//! Read-only handlers: `get`, `list`, `classify`.

use std::fmt::Write as _;

use serde::Serialize;
use tabled::Tabled;

use hostlink_core::{DomainAttachmentService, DomainClass, DomainView, Hostname, classify};

use crate::cli::{ClassifyArgs, GetArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct DomainRow {
    #[tabled(rename = "Project")]
    project: String,
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Ownership")]
    ownership: String,
    #[tabled(rename = "Routing")]
    routing: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

fn domain_row(view: &DomainView, color: bool) -> DomainRow {
    DomainRow {
        project: view.project_id.clone(),
        domain: view.custom_domain.clone(),
        state: output::state_label(view.state, color),
        ownership: output::check_mark(view.status.ownership_verified(), color),
        routing: output::check_mark(view.status.routing_verified(), color),
        updated: util::timestamp(&view.updated_at),
    }
}

fn domain_detail(view: &DomainView, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Project:    {} ({})", view.project_id, view.project_name);
    let _ = writeln!(out, "Domain:     {}", view.custom_domain);
    let _ = writeln!(out, "Deployment: {}", view.deployment_url);
    let _ = writeln!(out, "State:      {}", output::state_label(view.state, color));
    util::status_lines(&mut out, view.status, color);
    let _ = writeln!(out, "Created:    {}", util::timestamp(&view.created_at));
    let _ = write!(out, "Updated:    {}", util::timestamp(&view.updated_at));

    if let Some(records) = view.required_dns.as_deref().filter(|r| !r.is_empty()) {
        out.push_str("\n\nPending DNS records:\n");
        out.push_str(&util::dns_table(records));
    }
    out
}

pub async fn handle_get(
    service: &DomainAttachmentService,
    args: &GetArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let view = service.get(&args.project_id).await?;

    let rendered = match view {
        Some(view) => {
            let color = output::should_color(global.color());
            output::render_single(
                global.output(),
                &view,
                |v| domain_detail(v, color),
                |v| v.custom_domain.clone(),
            )?
        }
        None => output::render_single(
            global.output(),
            &Option::<DomainView>::None,
            |_| format!("No domain attached to project '{}'", args.project_id),
            |_| String::new(),
        )?,
    };
    output::print_output(&rendered, global.quiet);
    Ok(())
}

pub async fn handle_list(
    service: &DomainAttachmentService,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let views = service.list().await?;

    let color = output::should_color(global.color());
    let rendered = output::render_list(
        global.output(),
        &views,
        |v| domain_row(v, color),
        |v| format!("{}\t{}", v.project_id, v.custom_domain),
    )?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}

/// Offline classification result.
#[derive(Serialize)]
struct Classification {
    domain: String,
    classification: DomainClass,
    routing: String,
}

pub fn handle_classify(args: &ClassifyArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let hostname = Hostname::parse(&args.domain)?;
    let class = classify(&hostname)?;
    let result = Classification {
        domain: hostname.to_string(),
        routing: class.routing_kind().to_string(),
        classification: class,
    };

    let rendered = output::render_single(
        global.output(),
        &result,
        |c| {
            format!(
                "{}: {} (route with {})",
                c.domain, c.classification, c.routing
            )
        },
        |c| c.classification.to_string(),
    )?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}
