//! Causal command implementation.

use anyhow::Result;
use bubble_multiway_ops::{BuildRequest, CausalResponse, ExportGraph, GraphKind, OpsContext};

use super::{print_render, write_exports, yes_no, CausalArgs};

/// Build the causal graph, print its statistics and write artifacts.
pub fn execute(ctx: &OpsContext, args: &CausalArgs) -> Result<CausalResponse> {
    let request = BuildRequest::new(args.input.selector()?);
    let response = ctx.build_causal(&request)?;

    let summary = &response.summary;
    println!("🔢 Input values: {:?}", response.input_values());
    println!("🔗 Causal graph");
    println!("{:─<50}", "");
    println!("   States:          {}", response.state_count);
    println!("   Events:          {}", summary.events);
    println!("   Causal edges:    {}", summary.causal_edges);
    println!("   DAG:             {}", yes_no(summary.is_dag));
    println!("   Root events:     {}", summary.root_events);
    println!("   Terminal events: {}", summary.terminal_events);

    write_exports(
        ctx,
        GraphKind::Causal,
        &request.input,
        &ExportGraph::from_causal(&response.graph),
        &args.output,
    )?;

    let hints = args.output.hints(ctx, GraphKind::Causal);
    for path in args.output.images() {
        print_render(&ctx.render_causal(&response, path, &hints)?);
    }

    Ok(response)
}
